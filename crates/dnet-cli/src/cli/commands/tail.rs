//! Headless follow mode: prints the message list whenever it changes.

use std::io::{Write, stdout};

use anyhow::{Context, Result};
use dnet_core::backend::{HttpBackend, MessageBackend};
use dnet_core::sync::Session;
use dnet_core::{config, logging};

pub async fn run(config: &config::Config, once: bool) -> Result<()> {
    logging::init_stderr(&config.log_level)?;
    let backend = HttpBackend::from_config(config)?;

    if once {
        let url = backend.messages_url().clone();
        let messages = backend
            .fetch_messages()
            .await
            .with_context(|| format!("fetch {url}"))?;
        return print_list(&messages);
    }

    let session = Session::new(backend, config.poll_interval());
    let mut changes = session.display().subscribe();
    session.start()?;

    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.context("listen for Ctrl+C")?;
                break;
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let messages = changes.borrow_and_update().clone();
                print_list(&messages)?;
            }
        }
    }

    session.stop();
    Ok(())
}

fn print_list(messages: &[String]) -> Result<()> {
    let mut out = stdout().lock();
    writeln!(out, "--- {} messages ---", messages.len())?;
    for message in messages {
        writeln!(out, "{message}")?;
    }
    out.flush()?;
    Ok(())
}
