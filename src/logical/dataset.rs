//! Dataset descriptors: tables, derived selections, staged files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::schema::{Field, SchemaDefinition};
use super::values::{FieldValue, FunctionName, Value};
use super::Selection;

/// How a column or table is qualified inside a statement.
///
/// `Alias` is an explicit alias chosen by the caller (`sink`, `stage`) and is
/// never case-folded. `Table` is a dataset referring to itself by its own name
/// (`batch_metadata as batch_metadata`) and folds with the table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    Alias(String),
    Table(String),
}

impl Qualifier {
    pub fn as_str(&self) -> &str {
        match self {
            Qualifier::Alias(s) | Qualifier::Table(s) => s,
        }
    }
}

/// A table identity without a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetReference {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl DatasetReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            database: None,
            group: None,
            name: name.into(),
            alias: None,
        }
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// The same table under a different alias.
    pub fn with_alias(&self, alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..self.clone()
        }
    }

    pub fn qualifier(&self) -> Qualifier {
        match &self.alias {
            Some(alias) => Qualifier::Alias(alias.clone()),
            None => Qualifier::Table(self.name.clone()),
        }
    }

    /// Column of this dataset, qualified by its alias.
    pub fn field(&self, name: impl Into<String>) -> Value {
        Value::Field(FieldValue {
            qualifier: Some(self.qualifier()),
            name: name.into(),
        })
    }
}

/// Iceberg table settings (Snowflake managed Iceberg).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcebergProperties {
    pub catalog: String,
    pub external_volume: String,
    pub base_location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableOrigin {
    #[default]
    Native,
    Iceberg(IcebergProperties),
}

/// Storage-level properties carried by a dataset definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetAdditionalProperties {
    #[serde(default)]
    pub table_origin: TableOrigin,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl DatasetAdditionalProperties {
    pub fn iceberg(properties: IcebergProperties) -> Self {
        Self {
            table_origin: TableOrigin::Iceberg(properties),
            tags: BTreeMap::new(),
        }
    }

    pub fn is_iceberg(&self) -> bool {
        matches!(self.table_origin, TableOrigin::Iceberg(_))
    }
}

/// A table identity plus its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    #[serde(flatten)]
    pub reference: DatasetReference,
    #[serde(default)]
    pub schema: SchemaDefinition,
    #[serde(default)]
    pub properties: DatasetAdditionalProperties,
}

impl DatasetDefinition {
    pub fn new(reference: DatasetReference, schema: SchemaDefinition) -> Self {
        Self {
            reference,
            schema,
            properties: DatasetAdditionalProperties::default(),
        }
    }

    pub fn with_properties(mut self, properties: DatasetAdditionalProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_fields(&self, fields: Vec<Field>) -> Self {
        Self {
            schema: SchemaDefinition::new(fields),
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn field(&self, name: impl Into<String>) -> Value {
        self.reference.field(name)
    }
}

/// File format of a staged-file source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileFormat {
    Csv,
    Json,
    Avro,
    Parquet,
}

impl FileFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Json => "JSON",
            FileFormat::Avro => "AVRO",
            FileFormat::Parquet => "PARQUET",
        }
    }

    /// Formats whose rows are a single semi-structured value addressed by path.
    pub fn is_semi_structured(&self) -> bool {
        !matches!(self, FileFormat::Csv)
    }
}

/// Where staged files live and how they are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFilesProperties {
    pub location: String,
    pub file_format: FileFormat,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub format_options: BTreeMap<String, String>,
}

/// A set of staged files read through a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFilesDataset {
    pub properties: StagedFilesProperties,
    pub schema: SchemaDefinition,
    #[serde(default)]
    pub alias: Option<String>,
}

impl StagedFilesDataset {
    pub const DEFAULT_ALIAS: &'static str = "legend_persistence_stage";

    pub fn alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(Self::DEFAULT_ALIAS)
    }

    pub fn reference(&self) -> StagedFilesDatasetReference {
        StagedFilesDatasetReference {
            location: self.properties.location.clone(),
            alias: self.alias().to_string(),
        }
    }
}

/// The `FROM` side of a staged-file read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFilesDatasetReference {
    pub location: String,
    pub alias: String,
}

/// A table-valued function used as a source.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalDataset {
    pub function: FunctionName,
    pub arguments: Vec<Value>,
    pub alias: String,
}

/// Anything that may appear in a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Reference(DatasetReference),
    /// A selection used as a table, `(SELECT ...) as alias`.
    Derived { selection: Box<Selection>, alias: String },
    StagedFiles(StagedFilesDatasetReference),
    Functional(FunctionalDataset),
}

impl From<DatasetReference> for Dataset {
    fn from(reference: DatasetReference) -> Self {
        Dataset::Reference(reference)
    }
}

impl From<&DatasetDefinition> for Dataset {
    fn from(definition: &DatasetDefinition) -> Self {
        Dataset::Reference(definition.reference.clone())
    }
}
