mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG overrides, --verbose raises the default
    let directive = if cli.global.verbose {
        "aku=debug"
    } else {
        "aku=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Search(args) => {
            let config = Config::load_or_default(cli.global.config.as_deref())?;
            commands::search::run(args, &config)
        }
        Command::Objects { rom, out, index } => {
            commands::objects::run(rom, out.as_deref(), index.as_deref())
        }
        Command::Rooms { rom } => commands::rooms::run(rom),
    }
}
