use clap::{Parser, ValueEnum};
use libris_config::LibrisConfig;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `lbr` binary.
#[derive(Debug, Parser)]
#[command(name = "lbr", version, about = "Libris - library circulation desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw (defaults to the configured format)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Colorize table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Ledger directory (overrides the configured one)
    #[arg(long, global = true)]
    pub ledger_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags for command handlers, falling back to
    /// the configuration where a flag was not given.
    #[must_use]
    pub fn global_flags(&self, config: &LibrisConfig) -> GlobalFlags {
        let format = self.format.unwrap_or_else(|| {
            OutputFormat::from_str(&config.general.format, true).unwrap_or(OutputFormat::Table)
        });
        GlobalFlags {
            format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            color: self.color,
            db: self.db.clone(),
            ledger_dir: self.ledger_dir.clone(),
        }
    }
}
