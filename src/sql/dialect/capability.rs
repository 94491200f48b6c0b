//! Sink capabilities.
//!
//! Each dialect declares the SQL features it supports. Planners and visitors
//! query a [`CapabilitySet`] instead of branching on the dialect, so a new
//! dialect only has to declare its list to change code paths.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{Dialect, SqlDialect};

/// A named SQL feature a sink may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// `MERGE INTO ... USING ... WHEN MATCHED`
    Merge,
    /// `ALTER TABLE ... ADD COLUMN`
    AddColumn,
    /// Column type changes the engine performs on its own.
    ImplicitDataTypeConversion,
    /// Column type changes that need an `ALTER COLUMN`.
    ExplicitDataTypeConversion,
    /// Widening of length / precision / scale.
    DataSizingChanges,
    /// Column transformations inside `COPY INTO ... FROM (SELECT ...)`.
    TransformWhileCopy,
    /// `TO_DATE` / `TO_TIMESTAMP` coercion of AVRO logical types.
    AvroDateTimestampSupport,
    /// `CREATE ICEBERG TABLE`
    IcebergTables,
    /// `WITH TAG (...)` on table creation.
    TableTags,
    /// `DROP TABLE ... CASCADE`
    DropTableCascade,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Merge => "MERGE",
            Capability::AddColumn => "ADD_COLUMN",
            Capability::ImplicitDataTypeConversion => "IMPLICIT_DATA_TYPE_CONVERSION",
            Capability::ExplicitDataTypeConversion => "EXPLICIT_DATA_TYPE_CONVERSION",
            Capability::DataSizingChanges => "DATA_SIZING_CHANGES",
            Capability::TransformWhileCopy => "TRANSFORM_WHILE_COPY",
            Capability::AvroDateTimestampSupport => "AVRO_DATE_TIMESTAMP_SUPPORT",
            Capability::IcebergTables => "ICEBERG_TABLES",
            Capability::TableTags => "TABLE_TAGS",
            Capability::DropTableCascade => "DROP_TABLE_CASCADE",
        };
        f.write_str(name)
    }
}

/// An immutable set of capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    inner: BTreeSet<Capability>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.inner.contains(&capability)
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.inner.insert(capability);
        self
    }

    pub fn without(mut self, capability: Capability) -> Self {
        self.inner.remove(&capability);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.inner.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

static REGISTRY: Lazy<HashMap<Dialect, CapabilitySet>> = Lazy::new(|| {
    Dialect::ALL
        .iter()
        .map(|d| (*d, d.dialect().capabilities().iter().copied().collect()))
        .collect()
});

/// Capabilities declared by a dialect.
pub fn capabilities_of(dialect: Dialect) -> &'static CapabilitySet {
    static EMPTY: Lazy<CapabilitySet> = Lazy::new(CapabilitySet::new);
    REGISTRY.get(&dialect).unwrap_or(&EMPTY)
}
