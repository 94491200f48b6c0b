//! Top-level statements of a logical plan.

use std::collections::BTreeMap;

use super::conditions::Condition;
use super::dataset::{
    Dataset, DatasetAdditionalProperties, DatasetDefinition, DatasetReference, FileFormat,
};
use super::schema::Field;
use super::values::Value;
use super::Selection;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create(Create),
    Alter(Alter),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(Merge),
    Copy(Copy),
    Drop(Drop),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Create {
    pub dataset: DatasetDefinition,
    pub if_not_exists: bool,
}

impl Create {
    pub fn if_not_exists(dataset: DatasetDefinition) -> Operation {
        Operation::Create(Create {
            dataset,
            if_not_exists: true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterOperation {
    AddColumn,
    ChangeDatatype,
    NullableColumn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alter {
    pub dataset: DatasetReference,
    pub properties: DatasetAdditionalProperties,
    pub operation: AlterOperation,
    pub field: Field,
}

impl Alter {
    pub fn of(dataset: &DatasetDefinition, operation: AlterOperation, field: Field) -> Operation {
        Operation::Alter(Alter {
            dataset: dataset.reference.clone(),
            properties: dataset.properties.clone(),
            operation,
            field,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub target: DatasetReference,
    /// Unqualified target columns.
    pub fields: Vec<Value>,
    pub source: Selection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub dataset: DatasetReference,
    pub assignments: Vec<(Value, Value)>,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub dataset: DatasetReference,
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub dataset: DatasetReference,
    pub if_exists: bool,
    pub cascade: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeClause {
    MatchedDelete {
        condition: Option<Condition>,
    },
    MatchedUpdate {
        condition: Option<Condition>,
        assignments: Vec<(Value, Value)>,
    },
    NotMatchedInsert {
        condition: Option<Condition>,
        fields: Vec<Value>,
        values: Vec<Value>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub target: DatasetReference,
    pub source: Dataset,
    pub on: Condition,
    pub clauses: Vec<MergeClause>,
}

/// File selection and parsing options of a `COPY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub file_format: FileFormat,
    pub format_options: BTreeMap<String, String>,
    pub files: Vec<String>,
    pub patterns: Vec<String>,
    pub on_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Copy {
    pub target: DatasetReference,
    pub fields: Vec<Value>,
    pub source: Selection,
    pub load_options: LoadOptions,
}
