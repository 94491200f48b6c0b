//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for sink differences.
//! Each dialect implements `SqlDialect` to handle its specific syntax:
//!
//! - Identifier quoting: `"` (ANSI/Snowflake), `` ` `` (BigQuery)
//! - Data type names: `INTEGER` vs `INT64`, `JSON` vs `VARIANT`
//! - Function names: `CURRENT_TIMESTAMP` vs `CURRENT_DATETIME`
//! - The capability list consulted by planners and visitors
//!
//! # Usage
//!
//! ```ignore
//! use milestone::sql::{Dialect, SqlDialect};
//!
//! let dialect = Dialect::Snowflake;
//! let quoted = dialect.quote_identifier("main");  // "main"
//! ```
//!
//! # Capabilities
//!
//! | Capability | ANSI | Snowflake | BigQuery |
//! |------------|------|-----------|----------|
//! | MERGE | ❌ | ✓ | ✓ |
//! | ADD COLUMN | ✓ | ✓ | ✓ |
//! | Implicit type conversion | ✓ | ✓ | ✓ |
//! | Explicit type conversion | ✓ | ✓ | ❌ |
//! | Data sizing changes | ✓ | ✓ | ✓ |
//! | Transform while COPY | ❌ | ✓ | ❌ |
//! | AVRO date/timestamp | ❌ | ✓ | ❌ |
//! | Iceberg tables | ❌ | ✓ | ❌ |
//! | Table tags | ❌ | ✓ | ❌ |
//! | DROP ... CASCADE | ✓ | ✓ | ❌ |
//!
//! Legend: ✓ = supported, ❌ = not supported

mod ansi;
mod bigquery;
pub mod capability;
pub mod helpers;
mod snowflake;

pub use ansi::Ansi;
pub use bigquery::BigQuery;
pub use capability::{capabilities_of, Capability, CapabilitySet};
pub use snowflake::Snowflake;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::logical::DataType;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// Implementations handle dialect-specific syntax differences.
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, statistic alias).
    ///
    /// - ANSI/Snowflake: `"identifier"`
    /// - BigQuery: `` `identifier` ``
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    /// Quote a string literal.
    ///
    /// All dialects use single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be renamed,
    /// or `None` to keep the original name.
    fn remap_function(&self, _name: &str) -> Option<&'static str> {
        None
    }

    // =========================================================================
    // Data Types
    // =========================================================================

    /// SQL name of a column type, or `None` when the dialect has no mapping.
    fn data_type_name(&self, data_type: DataType) -> Option<&'static str>;

    /// Whether the engine stores `staging` values in a `main` column
    /// without an explicit column change.
    fn supports_implicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        helpers::implicit_mapping_standard(main, staging)
    }

    /// Whether `ALTER COLUMN` can convert a `main` column to `staging`'s type.
    fn supports_explicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        helpers::explicit_mapping_standard(main, staging)
    }

    // =========================================================================
    // Temporal Literals
    // =========================================================================

    /// `chrono` format of the batch start timestamp literal.
    fn timestamp_format(&self) -> &'static str {
        "%Y-%m-%d %H:%M:%S%.6f"
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Features this sink supports.
    fn capabilities(&self) -> &'static [Capability];
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Ansi,
    Snowflake,
    BigQuery,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Ansi, Dialect::Snowflake, Dialect::BigQuery];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Ansi => &Ansi,
            Dialect::Snowflake => &Snowflake,
            Dialect::BigQuery => &BigQuery,
        }
    }

    /// Capabilities of this dialect, from the shared registry.
    pub fn capability_set(&self) -> &'static CapabilitySet {
        capabilities_of(*self)
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn data_type_name(&self, data_type: DataType) -> Option<&'static str> {
        self.dialect().data_type_name(data_type)
    }

    fn supports_implicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        self.dialect().supports_implicit_mapping(main, staging)
    }

    fn supports_explicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        self.dialect().supports_explicit_mapping(main, staging)
    }

    fn timestamp_format(&self) -> &'static str {
        self.dialect().timestamp_format()
    }

    fn capabilities(&self) -> &'static [Capability] {
        self.dialect().capabilities()
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown dialect '{}'", s))
    }
}
