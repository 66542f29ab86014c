// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Load a job file from a given path and return the raw `RawJobFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] to
/// also check the frame range and worker settings.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Parse a job description from TOML text.
pub fn load_from_str(contents: &str) -> Result<RawJobFile> {
    let raw: RawJobFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Load a job file from path and validate it.
///
/// This is the entry point the rest of the application uses.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}
