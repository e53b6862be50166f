// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;

/// Command-line arguments for `stagetree`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "stagetree",
    version,
    about = "Rebuild a pipeline's stage tree from its flow graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory holding saved engine documents
    /// (`<job>/<build>/build.json`, `<job>/<build>/nodes/<id>.json`).
    #[arg(long, value_name = "DIR")]
    pub dump_dir: PathBuf,

    /// Job name.
    #[arg(long, value_name = "NAME")]
    pub job: String,

    /// Build number.
    #[arg(long, value_name = "N")]
    pub build: u64,

    /// Engine base URL, used to derive log links.
    #[arg(long, value_name = "URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Path to the config file (TOML). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Fetch per-step detail before filtering (overrides `[enrich].enabled`).
    #[arg(long)]
    pub enrich: bool,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `STAGETREE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
