//! One-shot send.

use anyhow::{Context, Result};
use dnet_core::backend::HttpBackend;
use dnet_core::sync::{Session, SubmitOutcome};
use dnet_core::{config, logging};

pub async fn run(config: &config::Config, message: &str) -> Result<()> {
    logging::init_stderr(&config.log_level)?;

    let backend = HttpBackend::from_config(config)?;
    let target = backend.send_url().clone();
    let session = Session::new(backend, config.poll_interval());
    session.draft().replace(message);

    match session
        .submit()
        .await
        .with_context(|| format!("send to {target}"))?
    {
        SubmitOutcome::Sent => println!("Sent."),
        SubmitOutcome::Skipped => println!("Nothing to send: message is empty."),
        SubmitOutcome::Busy => anyhow::bail!("A send is already in progress"),
    }
    Ok(())
}
