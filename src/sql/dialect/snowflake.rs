//! Snowflake SQL dialect.
//!
//! Snowflake features:
//! - Double-quote identifier quoting (case-sensitive when quoted)
//! - `MERGE` support
//! - `COPY INTO` with transformations over staged files
//! - Managed Iceberg tables and object tags
//! - `VARIANT` for semi-structured data

use super::helpers;
use super::{Capability, SqlDialect};
use crate::logical::DataType;

/// Snowflake SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake;

impl SqlDialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn data_type_name(&self, data_type: DataType) -> Option<&'static str> {
        helpers::data_type_snowflake(data_type)
    }

    fn supports_implicit_mapping(&self, main: DataType, staging: DataType) -> bool {
        helpers::implicit_mapping_widening(main, staging)
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[
            Capability::Merge,
            Capability::AddColumn,
            Capability::ImplicitDataTypeConversion,
            Capability::ExplicitDataTypeConversion,
            Capability::DataSizingChanges,
            Capability::TransformWhileCopy,
            Capability::AvroDateTimestampSupport,
            Capability::IcebergTables,
            Capability::TableTags,
            Capability::DropTableCascade,
        ]
    }
}
