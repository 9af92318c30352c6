//! TenantFlow CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use tenantflow::cli::commands::{cache, channel, envelope};
use tenantflow::cli::{Cli, Commands};
use tenantflow::domain::models::Config;
use tenantflow::infrastructure::config::ConfigLoader;
use tenantflow::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        tenantflow::cli::handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_path: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let log_config = LogConfig::try_from(&config.logging)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    match command {
        Commands::Cache(command) => cache::execute(command, &config.cache, json),
        Commands::Channel(command) => channel::execute(command, &config.messaging, json).await,
        Commands::Envelope(command) => envelope::execute(command, &config.messaging, json),
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
