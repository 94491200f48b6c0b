//! Per-table lock rows for concurrent-safe ingestion.
//!
//! The lock table holds one row per main table. Initializing inserts it once;
//! acquiring touches `last_used_ts_utc` inside the ingest transaction so that
//! concurrent writers serialize on the row.

use serde::{Deserialize, Serialize};

use crate::logical::{
    Condition, Create, DataType, DatasetDefinition, DatasetReference, Field, FieldValue, Insert,
    Operation, SchemaDefinition, Selection, Update, Value,
};

const LOCK_SUFFIX: &str = "_legend_persistence_lock";

fn default_insert_ts() -> String {
    "insert_ts_utc".to_string()
}

fn default_last_used_ts() -> String {
    "last_used_ts_utc".to_string()
}

fn default_table_name() -> String {
    "table_name".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockInfoDataset {
    #[serde(flatten)]
    pub reference: DatasetReference,
    #[serde(default = "default_insert_ts")]
    pub insert_ts_field: String,
    #[serde(default = "default_last_used_ts")]
    pub last_used_ts_field: String,
    #[serde(default = "default_table_name")]
    pub table_name_field: String,
}

impl LockInfoDataset {
    pub fn new(reference: DatasetReference) -> Self {
        Self {
            reference: DatasetReference {
                alias: None,
                ..reference
            },
            insert_ts_field: default_insert_ts(),
            last_used_ts_field: default_last_used_ts(),
            table_name_field: default_table_name(),
        }
    }

    /// `<main>_legend_persistence_lock`, next to main.
    pub fn for_main(main: &DatasetReference) -> Self {
        Self::new(DatasetReference {
            database: main.database.clone(),
            group: main.group.clone(),
            name: format!("{}{}", main.name, LOCK_SUFFIX),
            alias: None,
        })
    }

    pub fn definition(&self) -> DatasetDefinition {
        DatasetDefinition::new(
            self.reference.clone(),
            SchemaDefinition::new(vec![
                Field::new(&self.insert_ts_field, DataType::Datetime),
                Field::new(&self.last_used_ts_field, DataType::Datetime),
                Field::new(&self.table_name_field, DataType::Varchar).unique(),
            ]),
        )
    }

    pub fn create(&self) -> Operation {
        Create::if_not_exists(self.definition())
    }

    /// Insert the lock row unless one exists.
    pub fn initialize(&self, main: &str) -> Operation {
        let absent = Condition::exists(Selection::all_from(self.reference.clone())).negate();
        Operation::Insert(Insert {
            target: self.reference.clone(),
            fields: vec![
                Value::Field(FieldValue::bare(self.insert_ts_field.as_str())),
                Value::Field(FieldValue::bare(self.table_name_field.as_str())),
            ],
            source: Selection::of(vec![
                Value::BatchStartTimestamp,
                Value::DatasetName(main.to_string()),
            ])
            .filter(absent),
        })
    }

    /// Touch the lock row.
    pub fn acquire(&self) -> Operation {
        Operation::Update(Update {
            dataset: self.reference.clone(),
            assignments: vec![(
                self.reference.field(&self.last_used_ts_field),
                Value::BatchStartTimestamp,
            )],
            condition: None,
        })
    }
}
