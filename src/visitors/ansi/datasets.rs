use tracing::warn;

use crate::logical::{Dataset, DatasetReference, FieldType, LogicalNode, TableOrigin};
use crate::physical::{
    LogicalPlanVisitor, SqlNode, TransformResult, VisitorContext, VisitorResult,
};
use crate::sql::Capability;
use crate::visitors::unexpected;

pub struct DatasetReferenceVisitor;

impl DatasetReferenceVisitor {
    fn table(reference: &DatasetReference) -> SqlNode {
        SqlNode::Table {
            database: reference.database.clone(),
            schema: reference.group.clone(),
            name: reference.name.clone(),
            alias: reference.qualifier(),
        }
    }
}

impl LogicalPlanVisitor for DatasetReferenceVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        match node {
            LogicalNode::Reference(reference)
            | LogicalNode::Dataset(Dataset::Reference(reference)) => {
                Ok(VisitorResult::leaf(Self::table(reference)))
            }
            _ => Err(unexpected("DatasetReferenceVisitor", node)),
        }
    }
}

pub struct DerivedDatasetVisitor;

impl LogicalPlanVisitor for DerivedDatasetVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Dataset(Dataset::Derived { selection, alias }) = node else {
            return Err(unexpected("DerivedDatasetVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::DerivedTable {
                alias: alias.clone(),
            },
            vec![LogicalNode::Selection(selection.as_ref())],
        ))
    }
}

pub struct FunctionalDatasetVisitor;

impl LogicalPlanVisitor for FunctionalDatasetVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Dataset(Dataset::Functional(functional)) = node else {
            return Err(unexpected("FunctionalDatasetVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::FunctionTable {
                function: functional.function.as_str().to_string(),
                alias: functional.alias.clone(),
            },
            functional.arguments.iter().map(LogicalNode::Value).collect(),
        ))
    }
}

/// Iceberg origin needs `IcebergTables`; tags are dropped with a warning on
/// sinks without `TableTags`.
pub struct DatasetAdditionalPropertiesVisitor;

impl LogicalPlanVisitor for DatasetAdditionalPropertiesVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Properties(properties) = node else {
            return Err(unexpected("DatasetAdditionalPropertiesVisitor", node));
        };
        let iceberg = match &properties.table_origin {
            TableOrigin::Native => None,
            TableOrigin::Iceberg(iceberg) => {
                ctx.require(Capability::IcebergTables, "Iceberg table")?;
                Some(iceberg.clone())
            }
        };
        let tags = if properties.tags.is_empty() {
            Vec::new()
        } else if ctx.supports(Capability::TableTags) {
            properties
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        } else {
            warn!(
                dialect = %ctx.dialect,
                count = properties.tags.len(),
                "sink does not support table tags; skipping"
            );
            Vec::new()
        };
        if iceberg.is_none() && tags.is_empty() {
            return Ok(VisitorResult::default());
        }
        Ok(VisitorResult::leaf(SqlNode::TableProperties { iceberg, tags }))
    }
}

/// Column definition inside `CREATE`/`ALTER`.
pub struct FieldVisitor;

impl FieldVisitor {
    /// `VARCHAR`, `VARCHAR(64)`, `DECIMAL(10,2)`
    pub(crate) fn type_string(
        field_type: &FieldType,
        ctx: &VisitorContext,
    ) -> TransformResult<String> {
        let name = ctx.type_name(field_type.data_type)?;
        Ok(match (field_type.length, field_type.scale) {
            (Some(length), Some(scale)) => format!("{}({},{})", name, length, scale),
            (Some(length), None) => format!("{}({})", name, length),
            _ => name.to_string(),
        })
    }
}

impl LogicalPlanVisitor for FieldVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Field(field) = node else {
            return Err(unexpected("FieldVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::ColumnDefinition {
            name: field.name.clone(),
            data_type: Self::type_string(&field.field_type, ctx)?,
            nullable: field.nullable,
            primary_key: field.primary_key,
            unique: field.unique,
        }))
    }
}

pub struct SelectionVisitor;

impl LogicalPlanVisitor for SelectionVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Selection(selection) = node else {
            return Err(unexpected("SelectionVisitor", node));
        };
        let mut children: Vec<_> = selection.values.iter().map(LogicalNode::Value).collect();
        children.extend(selection.source.as_ref().map(LogicalNode::Dataset));
        children.extend(selection.condition.as_ref().map(LogicalNode::Condition));
        Ok(VisitorResult::with_children(SqlNode::Select, children))
    }
}
