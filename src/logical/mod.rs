//! Dialect-agnostic logical plan.
//!
//! Planners produce a [`LogicalPlan`]: an ordered list of [`Operation`]s built
//! from datasets, values and conditions. Nothing here knows about SQL text;
//! the [`crate::physical`] layer turns each operation into a physical plan
//! by visiting it node by node through [`LogicalNode`].

pub mod conditions;
pub mod dataset;
pub mod operations;
pub mod schema;
pub mod values;

pub use conditions::{ComparisonOp, Condition, InList};
pub use dataset::{
    Dataset, DatasetAdditionalProperties, DatasetDefinition, DatasetReference, FileFormat,
    FunctionalDataset, IcebergProperties, Qualifier, StagedFilesDataset,
    StagedFilesDatasetReference, StagedFilesProperties, TableOrigin,
};
pub use operations::{
    Alter, AlterOperation, Copy, Create, Delete, Drop, Insert, LoadOptions, Merge, MergeClause,
    Operation, Update,
};
pub use schema::{DataType, Field, FieldType, SchemaDefinition};
pub use values::{
    ArithmeticOp, CastFunction, DigestUdf, DistinctFunction, FieldValue, FunctionImpl,
    FunctionName, StagedFilesFieldValue, Value,
};

/// `SELECT <values> [FROM <source>] [WHERE <condition>]`
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub values: Vec<Value>,
    pub source: Option<Dataset>,
    pub condition: Option<Condition>,
}

impl Selection {
    pub fn of(values: Vec<Value>) -> Self {
        Self {
            values,
            source: None,
            condition: None,
        }
    }

    /// `SELECT * FROM <source>`
    pub fn all_from(source: impl Into<Dataset>) -> Self {
        Self::of(vec![Value::All]).from(source)
    }

    pub fn from(mut self, source: impl Into<Dataset>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn filter_opt(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }
}

/// Ordered list of statements, each compiled to one SQL string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogicalPlan {
    pub operations: Vec<Operation>,
}

impl LogicalPlan {
    pub fn new(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn of(operation: Operation) -> Self {
        Self {
            operations: vec![operation],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Fine-grained kind of a logical node, used as the visitor dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    // Operations
    Create,
    Alter,
    Insert,
    Update,
    Delete,
    Merge,
    Copy,
    Drop,
    // Datasets
    DatasetReference,
    DerivedDataset,
    StagedFilesDatasetReference,
    FunctionalDataset,
    DatasetAdditionalProperties,
    Field,
    Selection,
    // Values
    FieldValue,
    StringValue,
    DatasetName,
    NumericalValue,
    BooleanValue,
    NullValue,
    DateTimeValue,
    BatchStartTimestamp,
    BatchEndTimestamp,
    Function,
    CastFunction,
    DigestUdf,
    DistinctFunction,
    StagedFilesFieldValue,
    MetadataFileNameField,
    MetadataRowNumberField,
    SelectValue,
    Arithmetic,
    All,
    Alias,
    // Conditions
    And,
    Or,
    Not,
    Exists,
    Comparison,
    In,
    IsNull,
    // Clauses
    Assignment,
    MergeClause,
    LoadOptions,
}

/// A borrowed view of any node in a logical plan.
#[derive(Debug, Clone, Copy)]
pub enum LogicalNode<'a> {
    Operation(&'a Operation),
    Dataset(&'a Dataset),
    Reference(&'a DatasetReference),
    Properties(&'a DatasetAdditionalProperties),
    Field(&'a Field),
    Selection(&'a Selection),
    Value(&'a Value),
    Condition(&'a Condition),
    Assignment(&'a Value, &'a Value),
    MergeClause(&'a MergeClause),
    LoadOptions(&'a LoadOptions),
}

impl<'a> LogicalNode<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            LogicalNode::Operation(op) => match op {
                Operation::Create(_) => NodeKind::Create,
                Operation::Alter(_) => NodeKind::Alter,
                Operation::Insert(_) => NodeKind::Insert,
                Operation::Update(_) => NodeKind::Update,
                Operation::Delete(_) => NodeKind::Delete,
                Operation::Merge(_) => NodeKind::Merge,
                Operation::Copy(_) => NodeKind::Copy,
                Operation::Drop(_) => NodeKind::Drop,
            },
            LogicalNode::Dataset(ds) => match ds {
                Dataset::Reference(_) => NodeKind::DatasetReference,
                Dataset::Derived { .. } => NodeKind::DerivedDataset,
                Dataset::StagedFiles(_) => NodeKind::StagedFilesDatasetReference,
                Dataset::Functional(_) => NodeKind::FunctionalDataset,
            },
            LogicalNode::Reference(_) => NodeKind::DatasetReference,
            LogicalNode::Properties(_) => NodeKind::DatasetAdditionalProperties,
            LogicalNode::Field(_) => NodeKind::Field,
            LogicalNode::Selection(_) => NodeKind::Selection,
            LogicalNode::Value(value) => match value {
                Value::Field(_) => NodeKind::FieldValue,
                Value::String(_) => NodeKind::StringValue,
                Value::DatasetName(_) => NodeKind::DatasetName,
                Value::Integer(_) | Value::Double(_) => NodeKind::NumericalValue,
                Value::Boolean(_) => NodeKind::BooleanValue,
                Value::Null => NodeKind::NullValue,
                Value::DateTime(_) => NodeKind::DateTimeValue,
                Value::BatchStartTimestamp => NodeKind::BatchStartTimestamp,
                Value::BatchEndTimestamp => NodeKind::BatchEndTimestamp,
                Value::Function(_) => NodeKind::Function,
                Value::Cast(_) => NodeKind::CastFunction,
                Value::DigestUdf(_) => NodeKind::DigestUdf,
                Value::Distinct(_) => NodeKind::DistinctFunction,
                Value::StagedFilesField(_) => NodeKind::StagedFilesFieldValue,
                Value::MetadataFileName => NodeKind::MetadataFileNameField,
                Value::MetadataRowNumber => NodeKind::MetadataRowNumberField,
                Value::Select(_) => NodeKind::SelectValue,
                Value::Arithmetic { .. } => NodeKind::Arithmetic,
                Value::All => NodeKind::All,
                Value::Aliased { .. } => NodeKind::Alias,
            },
            LogicalNode::Condition(cond) => match cond {
                Condition::And(_) => NodeKind::And,
                Condition::Or(_) => NodeKind::Or,
                Condition::Not(_) => NodeKind::Not,
                Condition::Exists(_) => NodeKind::Exists,
                Condition::Comparison { .. } => NodeKind::Comparison,
                Condition::In { .. } => NodeKind::In,
                Condition::IsNull { .. } => NodeKind::IsNull,
            },
            LogicalNode::Assignment(..) => NodeKind::Assignment,
            LogicalNode::MergeClause(_) => NodeKind::MergeClause,
            LogicalNode::LoadOptions(_) => NodeKind::LoadOptions,
        }
    }
}

impl<'a> From<&'a Operation> for LogicalNode<'a> {
    fn from(op: &'a Operation) -> Self {
        LogicalNode::Operation(op)
    }
}

impl<'a> From<&'a Value> for LogicalNode<'a> {
    fn from(value: &'a Value) -> Self {
        LogicalNode::Value(value)
    }
}

impl<'a> From<&'a Condition> for LogicalNode<'a> {
    fn from(cond: &'a Condition) -> Self {
        LogicalNode::Condition(cond)
    }
}

impl<'a> From<&'a Dataset> for LogicalNode<'a> {
    fn from(ds: &'a Dataset) -> Self {
        LogicalNode::Dataset(ds)
    }
}

impl<'a> From<&'a Selection> for LogicalNode<'a> {
    fn from(sel: &'a Selection) -> Self {
        LogicalNode::Selection(sel)
    }
}
