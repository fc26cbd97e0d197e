//! Command implementations

mod config;
mod filter;
mod replay;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Filter(args) => filter::execute(args, config_path, cli.data, &output).await,
        Commands::Replay(args) => replay::execute(args, config_path, cli.data, &output).await,
        Commands::Config => config::execute(config_path, cli.data, &output),
    }
}
