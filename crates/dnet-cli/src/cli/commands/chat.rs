//! Chat command handler.

use anyhow::Result;
use dnet_core::config;

#[cfg(feature = "tui")]
pub fn run(config: &config::Config) -> Result<()> {
    // The view owns the terminal, so logs go to a file.
    let _log_guard =
        dnet_core::logging::init_file(&config::paths::logs_dir(), &config.log_level)?;
    tracing::info!(base_url = %config.base_url, "starting board view");
    dnet_tui::run_interactive(config)
}

#[cfg(not(feature = "tui"))]
pub fn run(_config: &config::Config) -> Result<()> {
    anyhow::bail!(
        "This build does not include the board view.\n\
         Use `dnet tail` to follow messages or `dnet send <MESSAGE>` to post one."
    )
}
