//! Configuration module for milestone.
//!
//! Handles generator settings, ingest files and environment variables.

mod ingest_file;
mod settings;

pub use ingest_file::IngestFile;
pub use settings::{expand_env_vars, GeneratorSettings, Settings, SettingsError};
