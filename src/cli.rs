// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `renderwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "renderwatch",
    version,
    about = "Track Katana render progress from stdout and plan GPU selection.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the job file (TOML).
    ///
    /// Default: `Renderwatch.toml` in the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = "Renderwatch.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RENDERWATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read renderer stdout and print progress/status/failure events.
    Monitor {
        /// Read from this log file instead of stdin.
        #[arg(long, value_name = "PATH")]
        input: Option<String>,
    },

    /// Resolve the GPU devices for this task and print the device mask.
    Gpus {
        /// Render thread slot; overrides `[worker].thread_index`.
        #[arg(long, value_name = "N")]
        thread_index: Option<u32>,
    },

    /// Print the full launch plan (arguments, environment, startup dir).
    Plan {
        /// Render thread slot; overrides `[worker].thread_index`.
        #[arg(long, value_name = "N")]
        thread_index: Option<u32>,
    },
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
