//! Ingest file: the datasets and ingest mode of one generation.
//!
//! ```toml
//! data_splits = [{ lower = 1, upper = 1 }, { lower = 2, upper = 3 }]
//!
//! [ingest_mode]
//! mode = "nontemporal_delta"
//! data_split_field = "data_split"
//!
//! [main]
//! database = "mydb"
//! name = "main"
//!
//! [staging]
//! kind = "table"
//! database = "mydb"
//! name = "staging"
//!
//! [[staging.schema.fields]]
//! name = "id"
//! type = "INT"
//! primary_key = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::settings::{expand_env_vars, SettingsError};
use crate::ingest_mode::{DataSplitRange, IngestMode};
use crate::planner::Datasets;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IngestFile {
    pub ingest_mode: IngestMode,

    #[serde(flatten)]
    pub datasets: Datasets,

    /// Ranges to generate one result each for; empty keeps placeholders.
    #[serde(default)]
    pub data_splits: Vec<DataSplitRange>,
}

impl IngestFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(&expand_env_vars(content)?)?)
    }
}
