//! ANSI SQL baseline.
//!
//! The reference sink: double-quoted identifiers, no `MERGE`, no staged files.
//! Other dialects inherit its visitor table and override what differs.

use super::helpers;
use super::{Capability, SqlDialect};
use crate::logical::DataType;

/// ANSI SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Ansi;

impl SqlDialect for Ansi {
    fn name(&self) -> &'static str {
        "ansi"
    }

    fn data_type_name(&self, data_type: DataType) -> Option<&'static str> {
        helpers::data_type_ansi(data_type)
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::AddColumn,
            Capability::ImplicitDataTypeConversion,
            Capability::ExplicitDataTypeConversion,
            Capability::DataSizingChanges,
            Capability::DropTableCascade,
        ]
    }
}
