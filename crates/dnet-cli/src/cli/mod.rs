//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use dnet_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "dnet")]
#[command(version)]
#[command(about = "DisasterNet emergency message board client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base address of the message board backend (overrides config)
    #[arg(long, env = "DNET_BASE_URL", global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Poll interval in milliseconds (overrides config)
    #[arg(long, global = true, value_name = "MS")]
    poll_interval_ms: Option<u64>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open the interactive board view (default)
    Chat,
    /// Print the message list every time it changes
    Tail {
        /// Fetch the list once, print it, and exit
        #[arg(long)]
        once: bool,
    },
    /// Post a single message
    Send {
        /// The message text, sent as-is
        #[arg(value_name = "MESSAGE")]
        message: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        base_url,
        poll_interval_ms,
    } = cli;
    let load = || load_config(base_url.clone(), poll_interval_ms);

    // default to chat mode
    match command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&load()?),
        Commands::Tail { once } => commands::tail::run(&load()?, once).await,
        Commands::Send { message } => commands::send::run(&load()?, &message).await,

        // Not loaded here, so these work even when the file is broken.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}

fn load_config(base_url: Option<String>, poll_interval_ms: Option<u64>) -> Result<config::Config> {
    let mut config = config::Config::load().context("load config")?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(ms) = poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    Ok(config)
}
