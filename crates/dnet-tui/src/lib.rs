//! Full-screen terminal view for the DisasterNet board client.

pub mod effects;
pub mod events;
pub mod render;
pub mod runtime;
pub mod scroll;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, Write, stderr};

use anyhow::Result;
use dnet_core::config::Config;
pub use runtime::TuiRuntime;

/// Runs the interactive board view until the user quits.
///
/// Must be called from within a multi-threaded tokio runtime: the event loop
/// blocks the calling thread while polling and sending run on the workers.
///
/// # Errors
/// Returns an error if stderr is not a terminal, the configuration is
/// invalid, or terminal I/O fails.
pub fn run_interactive(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!(
            "The board view requires a terminal.\n\
             Use `dnet tail` to follow messages or `dnet send <MESSAGE>` to post one."
        );
    }

    let mut runtime = TuiRuntime::new(config)?;
    runtime.run()?;
    drop(runtime);

    writeln!(stderr(), "Goodbye!")?;
    Ok(())
}
