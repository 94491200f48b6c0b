//! TOML-based configuration for milestone.
//!
//! Supports a config file (milestone.toml) with environment variable
//! expansion.
//!
//! Example configuration:
//! ```toml
//! [generator]
//! dialect = "snowflake"
//! case_conversion = "upper"
//! collect_statistics = true
//! enable_schema_evolution = false
//! batch_start_timestamp = "2000-01-01T00:00:00"
//! infinite_batch_id = 999999999
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::{CaseConversion, GeneratorOptions};
use crate::planner::PlannerOptions;
use crate::sql::{Capability, CapabilitySet, Dialect};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// SQL generation options.
    pub generator: GeneratorSettings,
}

/// Generation options as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Target dialect (ansi, snowflake, bigquery).
    pub dialect: Dialect,

    /// Identifier case folding (none, upper, lower).
    pub case_conversion: CaseConversion,

    /// Planner switches, flattened into `[generator]`.
    #[serde(flatten)]
    pub planner: PlannerOptions,

    /// Fixed batch start time for reproducible output.
    pub batch_start_timestamp: Option<NaiveDateTime>,

    /// Sink capabilities replacing the dialect's own.
    pub capabilities: Option<Vec<Capability>>,

    /// Quote identifiers in the generated SQL.
    pub quote_identifiers: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            case_conversion: CaseConversion::default(),
            planner: PlannerOptions::default(),
            batch_start_timestamp: None,
            capabilities: None,
            quote_identifiers: true,
        }
    }
}

impl GeneratorSettings {
    /// The library options these settings describe.
    pub fn to_options(&self) -> Result<GeneratorOptions, SettingsError> {
        if self.planner.batch_success_status.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "batch_success_status must not be empty".to_string(),
            ));
        }
        if self.planner.infinite_batch_id <= 0 {
            return Err(SettingsError::InvalidConfig(format!(
                "infinite_batch_id must be positive, got {}",
                self.planner.infinite_batch_id
            )));
        }
        Ok(GeneratorOptions {
            dialect: self.dialect,
            case_conversion: self.case_conversion,
            planner: self.planner.clone(),
            batch_start_timestamp: self.batch_start_timestamp,
            capabilities: self
                .capabilities
                .as_ref()
                .map(|caps| caps.iter().copied().collect::<CapabilitySet>()),
            unquoted_identifiers: !self.quote_identifiers,
        })
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = expand_env_vars(&fs::read_to_string(path)?)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. `explicit`, when given
    /// 2. Environment variable `MILESTONE_CONFIG`
    /// 3. `./milestone.toml`
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = env::var("MILESTONE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("milestone.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        Ok(Settings::default())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                // Lone `$`, keep it.
                result.push('$');
                continue;
            }
        }
        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
