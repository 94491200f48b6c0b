//! ANSI base visitors.

mod conditions;
mod datasets;
mod operations;
mod values;

pub use conditions::*;
pub use datasets::*;
pub use operations::*;
pub use values::*;

use crate::logical::NodeKind;
use crate::physical::VisitorRegistry;
use crate::sql::Dialect;

pub fn register(registry: &mut VisitorRegistry) {
    let d = Dialect::Ansi;
    registry
        // operations
        .register(NodeKind::Create, d, &CreateVisitor)
        .register(NodeKind::Alter, d, &AlterVisitor)
        .register(NodeKind::Insert, d, &InsertVisitor)
        .register(NodeKind::Update, d, &UpdateVisitor)
        .register(NodeKind::Delete, d, &DeleteVisitor)
        .register(NodeKind::Merge, d, &MergeVisitor)
        .register(NodeKind::MergeClause, d, &MergeClauseVisitor)
        .register(NodeKind::Drop, d, &DropVisitor)
        // datasets
        .register(NodeKind::DatasetReference, d, &DatasetReferenceVisitor)
        .register(NodeKind::DerivedDataset, d, &DerivedDatasetVisitor)
        .register(NodeKind::FunctionalDataset, d, &FunctionalDatasetVisitor)
        .register(NodeKind::DatasetAdditionalProperties, d, &DatasetAdditionalPropertiesVisitor)
        .register(NodeKind::Field, d, &FieldVisitor)
        .register(NodeKind::Selection, d, &SelectionVisitor)
        // values
        .register(NodeKind::FieldValue, d, &FieldValueVisitor)
        .register(NodeKind::StringValue, d, &StringValueVisitor)
        .register(NodeKind::DatasetName, d, &DatasetNameVisitor)
        .register(NodeKind::NumericalValue, d, &NumericalValueVisitor)
        .register(NodeKind::BooleanValue, d, &BooleanValueVisitor)
        .register(NodeKind::NullValue, d, &NullValueVisitor)
        .register(NodeKind::DateTimeValue, d, &DateTimeValueVisitor)
        .register(NodeKind::BatchStartTimestamp, d, &BatchStartTimestampVisitor)
        .register(NodeKind::BatchEndTimestamp, d, &BatchEndTimestampVisitor)
        .register(NodeKind::Function, d, &FunctionVisitor)
        .register(NodeKind::CastFunction, d, &CastFunctionVisitor)
        .register(NodeKind::DistinctFunction, d, &DistinctFunctionVisitor)
        .register(NodeKind::SelectValue, d, &SelectValueVisitor)
        .register(NodeKind::Arithmetic, d, &ArithmeticVisitor)
        .register(NodeKind::All, d, &AllVisitor)
        .register(NodeKind::Alias, d, &AliasVisitor)
        // conditions
        .register(NodeKind::And, d, &LogicalConnectiveVisitor)
        .register(NodeKind::Or, d, &LogicalConnectiveVisitor)
        .register(NodeKind::Not, d, &NotVisitor)
        .register(NodeKind::Exists, d, &ExistsVisitor)
        .register(NodeKind::Comparison, d, &ComparisonVisitor)
        .register(NodeKind::In, d, &InVisitor)
        .register(NodeKind::IsNull, d, &IsNullVisitor)
        .register(NodeKind::Assignment, d, &AssignmentVisitor);
}
