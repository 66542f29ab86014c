// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid frame range: start {start} is after end {end}")]
    InvalidFrameRange { start: i64, end: i64 },

    #[error("Invalid frame range: {start}-{end} holds more frames than can be counted")]
    FrameRangeTooLarge { start: i64, end: i64 },

    #[error("GPU affinity error: {0}")]
    GpuAffinity(String),

    #[error("Invalid device mask '{mask}': {reason}")]
    InvalidDeviceMask { mask: String, reason: String },

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Non-fatal failure while turning a matched line into progress.
///
/// These never abort a task: the monitor logs them and moves on to the next
/// line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressError {
    #[error("capture group {group} missing from '{rule}' match")]
    MissingCapture { rule: &'static str, group: usize },

    #[error("capture '{value}' is not a valid number: {reason}")]
    InvalidNumber { value: String, reason: String },

    #[error("block progress reported a total of zero blocks ({completed}/0)")]
    ZeroBlockTotal { completed: u64 },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, RenderwatchError>;
