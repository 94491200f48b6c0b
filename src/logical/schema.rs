//! Column types and table schemas.
//!
//! A [`SchemaDefinition`] is the ordered list of typed [`Field`]s that make up
//! a dataset. Field names are unique within a schema; [`SchemaDefinition::validate`]
//! enforces that before any planning happens.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::planner::{PlannerError, PlannerResult};

/// Primitive SQL data type of a column.
///
/// The mapping to a concrete SQL type name is owned by the dialect
/// (see [`crate::sql::SqlDialect::data_type_name`]); a type a dialect
/// cannot express is a rendering error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Int,
    Integer,
    Bigint,
    Tinyint,
    Smallint,
    Number,
    Numeric,
    Decimal,
    Float,
    Double,
    Real,
    Boolean,
    Char,
    Varchar,
    String,
    Text,
    Date,
    Time,
    Datetime,
    Timestamp,
    TimestampNtz,
    TimestampTz,
    TimestampLtz,
    Json,
    Variant,
    Binary,
    Varbinary,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Int => "INT",
            DataType::Integer => "INTEGER",
            DataType::Bigint => "BIGINT",
            DataType::Tinyint => "TINYINT",
            DataType::Smallint => "SMALLINT",
            DataType::Number => "NUMBER",
            DataType::Numeric => "NUMERIC",
            DataType::Decimal => "DECIMAL",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Real => "REAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Char => "CHAR",
            DataType::Varchar => "VARCHAR",
            DataType::String => "STRING",
            DataType::Text => "TEXT",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Datetime => "DATETIME",
            DataType::Timestamp => "TIMESTAMP",
            DataType::TimestampNtz => "TIMESTAMP_NTZ",
            DataType::TimestampTz => "TIMESTAMP_TZ",
            DataType::TimestampLtz => "TIMESTAMP_LTZ",
            DataType::Json => "JSON",
            DataType::Variant => "VARIANT",
            DataType::Binary => "BINARY",
            DataType::Varbinary => "VARBINARY",
        }
    }

    /// Character types whose values are rendered as quoted literals.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            DataType::Char | DataType::Varchar | DataType::String | DataType::Text
        )
    }

    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            DataType::Int
                | DataType::Integer
                | DataType::Bigint
                | DataType::Tinyint
                | DataType::Smallint
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            DataType::Date
                | DataType::Time
                | DataType::Datetime
                | DataType::Timestamp
                | DataType::TimestampNtz
                | DataType::TimestampTz
                | DataType::TimestampLtz
        )
    }

    pub fn is_semi_structured(&self) -> bool {
        matches!(self, DataType::Json | DataType::Variant)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data type with its optional length (or precision) and scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
}

impl FieldType {
    pub fn of(data_type: DataType) -> Self {
        Self {
            data_type,
            length: None,
            scale: None,
        }
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl From<DataType> for FieldType {
    fn from(data_type: DataType) -> Self {
        FieldType::of(data_type)
    }
}

fn default_true() -> bool {
    true
}

/// A single column of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
}

impl Field {
    /// A nullable, non-key column.
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable: true,
            primary_key: false,
            unique: false,
        }
    }

    /// Mark as part of the primary key. Key columns are never nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn data_type(&self) -> DataType {
        self.field_type.data_type
    }
}

/// Ordered column list of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub fields: Vec<Field>,
}

impl SchemaDefinition {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn primary_keys(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// Fail on duplicate column names.
    pub fn validate(&self, dataset: &str) -> PlannerResult<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(PlannerError::DuplicateColumn {
                    dataset: dataset.to_string(),
                    column: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}
