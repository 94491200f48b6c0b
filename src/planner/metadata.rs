//! The batch metadata table: one row per successful batch per main table.

use serde::{Deserialize, Serialize};

use crate::logical::{
    Create, DataType, DatasetDefinition, DatasetReference, Field, FieldType, FieldValue,
    FunctionName, Insert, Operation, SchemaDefinition, Selection, Value,
};

fn default_name() -> String {
    "batch_metadata".to_string()
}

/// Location and column names of the batch metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataDataset {
    pub database: Option<String>,
    pub group: Option<String>,
    pub name: String,
    pub table_name_field: String,
    pub batch_start_field: String,
    pub batch_end_field: String,
    pub batch_status_field: String,
    pub batch_id_field: String,
    pub staging_filters_field: String,
}

impl Default for MetadataDataset {
    fn default() -> Self {
        Self {
            database: None,
            group: None,
            name: default_name(),
            table_name_field: "table_name".to_string(),
            batch_start_field: "batch_start_ts_utc".to_string(),
            batch_end_field: "batch_end_ts_utc".to_string(),
            batch_status_field: "batch_status".to_string(),
            batch_id_field: "table_batch_id".to_string(),
            staging_filters_field: "staging_filters".to_string(),
        }
    }
}

impl MetadataDataset {
    /// The table referring to itself by name, `batch_metadata as batch_metadata`.
    pub fn reference(&self) -> DatasetReference {
        DatasetReference {
            database: self.database.clone(),
            group: self.group.clone(),
            name: self.name.clone(),
            alias: None,
        }
    }

    pub fn definition(&self) -> DatasetDefinition {
        DatasetDefinition::new(
            self.reference(),
            SchemaDefinition::new(vec![
                Field::new(
                    &self.table_name_field,
                    FieldType::of(DataType::Varchar).with_length(255),
                ),
                Field::new(&self.batch_start_field, DataType::Datetime),
                Field::new(&self.batch_end_field, DataType::Datetime),
                Field::new(
                    &self.batch_status_field,
                    FieldType::of(DataType::Varchar).with_length(32),
                ),
                Field::new(&self.batch_id_field, DataType::Integer),
                Field::new(&self.staging_filters_field, DataType::Json),
            ]),
        )
    }

    pub fn create(&self) -> Operation {
        Create::if_not_exists(self.definition())
    }

    /// `(SELECT COALESCE(MAX(table_batch_id),0)+1 FROM batch_metadata
    /// WHERE UPPER(table_name) = '<MAIN>')`
    pub fn next_batch_id(&self, main: &str) -> Value {
        let meta = self.reference();
        let max = Value::function(
            FunctionName::Max,
            vec![meta.field(&self.batch_id_field)],
        );
        let current = Value::function(FunctionName::Coalesce, vec![max, Value::Integer(0)]);
        let selection = Selection::of(vec![current.plus(Value::Integer(1))])
            .from(meta.clone())
            .filter(
                Value::function(FunctionName::Upper, vec![meta.field(&self.table_name_field)])
                    .equals(Value::string(main.to_uppercase())),
            );
        Value::subquery(selection)
    }

    /// Record a finished batch of `main`.
    pub fn ingest(&self, main: &str, status: &str) -> Operation {
        let fields = [
            &self.table_name_field,
            &self.batch_id_field,
            &self.batch_start_field,
            &self.batch_end_field,
            &self.batch_status_field,
        ]
        .into_iter()
        .map(|name| Value::Field(FieldValue::bare(name.as_str())))
        .collect();
        Operation::Insert(Insert {
            target: self.reference(),
            fields,
            source: Selection::of(vec![
                Value::DatasetName(main.to_string()),
                self.next_batch_id(main),
                Value::BatchStartTimestamp,
                Value::BatchEndTimestamp,
                Value::string(status),
            ]),
        })
    }
}
