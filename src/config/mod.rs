// src/config/mod.rs

//! Job configuration for renderwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a job file from disk (`loader.rs`).
//! - Validate frame range and worker settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_from_str};
pub use model::{GpuSection, JobFile, JobSection, RawJobFile, WorkerSection};
