//! BigQuery SQL dialect.
//!
//! BigQuery features:
//! - Backtick identifier quoting
//! - `MERGE` support
//! - `DATETIME` literals parsed with `PARSE_DATETIME`
//! - `DELETE` always requires a `WHERE` clause
//! - No `CASCADE` on `DROP TABLE`

use super::helpers;
use super::{Capability, SqlDialect};
use crate::logical::DataType;

/// BigQuery SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct BigQuery;

impl SqlDialect for BigQuery {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        match name {
            "CURRENT_TIMESTAMP" => Some("CURRENT_DATETIME"),
            _ => None,
        }
    }

    fn data_type_name(&self, data_type: DataType) -> Option<&'static str> {
        helpers::data_type_bigquery(data_type)
    }

    fn supports_implicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        helpers::implicit_mapping_widening(main, staging)
    }

    fn supports_explicit_mapping(&self, _main: DataType, _staging: DataType) -> bool {
        false
    }

    fn timestamp_format(&self) -> &'static str {
        "%Y-%m-%d %H:%M:%S"
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::Merge,
            Capability::AddColumn,
            Capability::ImplicitDataTypeConversion,
            Capability::DataSizingChanges,
        ]
    }
}
