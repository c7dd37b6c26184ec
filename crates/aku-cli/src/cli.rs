use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

/// aku - Castlevania III object corruption analyzer
#[derive(Debug, Parser)]
#[command(name = "aku", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Config file (defaults to aku.toml when present)
    #[arg(short, long, global = true, env = "AKU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search loaded ROMs for camera-offset corruptions of a RAM address
    Search(SearchArgs),

    /// Dump the object descriptor table of a ROM as CSV
    Objects {
        /// Path to the .nes file
        #[arg(value_name = "FILE")]
        rom: PathBuf,

        /// Write the CSV to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Only show one object index ($hex, 0x, % or decimal)
        #[arg(long, value_name = "N")]
        index: Option<String>,
    },

    /// List room pointers and where they point
    Rooms {
        /// Path to the .nes file
        #[arg(value_name = "FILE")]
        rom: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// ROM to search (repeat for several regions)
    #[arg(short, long = "rom", value_name = "FILE")]
    pub roms: Vec<PathBuf>,

    /// Target address in the US ROM
    #[arg(short, long, value_name = "ADDR")]
    pub us: Option<String>,

    /// Target address in the Japanese ROM
    #[arg(short, long, value_name = "ADDR")]
    pub jp: Option<String>,

    /// Acceptable values: "any", ">v", ">=v", "<v", "<=v" or a list
    #[arg(long, value_name = "VALUES", allow_hyphen_values = true)]
    pub values: Option<String>,

    /// Additional search as <regions>:<addr>[,...]=<values>, e.g. u:$32,j:$34=$0D,$0E
    #[arg(short, long = "target", value_name = "SPEC")]
    pub targets: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
