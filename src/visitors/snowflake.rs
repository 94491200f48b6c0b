//! Snowflake overrides: `COPY INTO` from staged files, staged-file columns,
//! file lineage pseudo-columns, digest UDFs and `SET DATA TYPE` alters.

use crate::logical::{
    AlterOperation, DataType, Dataset, FileFormat, LogicalNode, NodeKind, Operation,
    StagedFilesFieldValue, Value,
};
use crate::physical::{
    AlterAction, LogicalPlanVisitor, SqlNode, TransformResult, VisitorContext, VisitorRegistry,
    VisitorResult,
};
use crate::sql::{Capability, Dialect};
use crate::visitors::ansi::AlterVisitor;
use crate::visitors::unexpected;

pub fn register(registry: &mut VisitorRegistry) {
    let d = Dialect::Snowflake;
    registry
        .register(NodeKind::Alter, d, &SnowflakeAlterVisitor)
        .register(NodeKind::Copy, d, &CopyVisitor)
        .register(NodeKind::LoadOptions, d, &LoadOptionsVisitor)
        .register(NodeKind::StagedFilesDatasetReference, d, &StagedFilesDatasetReferenceVisitor)
        .register(NodeKind::StagedFilesFieldValue, d, &StagedFilesFieldValueVisitor)
        .register(NodeKind::MetadataFileNameField, d, &MetadataFieldVisitor)
        .register(NodeKind::MetadataRowNumberField, d, &MetadataFieldVisitor)
        .register(NodeKind::DigestUdf, d, &DigestUdfVisitor);
}

/// Type changes use `ALTER COLUMN "c" SET DATA TYPE <type>`.
pub struct SnowflakeAlterVisitor;

impl LogicalPlanVisitor for SnowflakeAlterVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Alter(alter)) = node else {
            return Err(unexpected("SnowflakeAlterVisitor", node));
        };
        let action = match alter.operation {
            AlterOperation::AddColumn => AlterAction::AddColumn,
            AlterOperation::ChangeDatatype => AlterAction::SetDataType,
            AlterOperation::NullableColumn => AlterAction::DropNotNull,
        };
        Ok(VisitorResult::with_children(
            SqlNode::AlterTable { action },
            AlterVisitor::children(alter),
        ))
    }
}

pub struct CopyVisitor;

impl LogicalPlanVisitor for CopyVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Copy(copy)) = node else {
            return Err(unexpected("CopyVisitor", node));
        };
        ctx.require(Capability::TransformWhileCopy, "Copy")?;
        let mut children = vec![LogicalNode::Reference(&copy.target)];
        children.extend(copy.fields.iter().map(LogicalNode::Value));
        children.push(LogicalNode::Selection(&copy.source));
        children.push(LogicalNode::LoadOptions(&copy.load_options));
        Ok(VisitorResult::with_children(SqlNode::Copy, children))
    }
}

pub struct LoadOptionsVisitor;

impl LogicalPlanVisitor for LoadOptionsVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::LoadOptions(options) = node else {
            return Err(unexpected("LoadOptionsVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::CopyOptions {
            file_format: options.file_format.as_str().to_string(),
            format_options: options
                .format_options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            files: options.files.clone(),
            patterns: options.patterns.clone(),
            on_error: options.on_error.clone(),
        }))
    }
}

pub struct StagedFilesDatasetReferenceVisitor;

impl LogicalPlanVisitor for StagedFilesDatasetReferenceVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Dataset(Dataset::StagedFiles(reference)) = node else {
            return Err(unexpected("StagedFilesDatasetReferenceVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::StagedFilesTable {
            location: reference.location.clone(),
            alias: reference.alias.clone(),
        }))
    }
}

/// `alias.$N` for delimited files, `alias.$1:path` for semi-structured rows.
pub struct StagedFilesFieldValueVisitor;

impl StagedFilesFieldValueVisitor {
    /// Conversion applied to the raw staged value, if any.
    fn conversion(field: &StagedFilesFieldValue, ctx: &VisitorContext) -> Option<&'static str> {
        let data_type = field.field_type.data_type;
        match field.file_format {
            FileFormat::Csv if data_type.is_semi_structured() => Some("PARSE_JSON"),
            FileFormat::Avro if ctx.supports(Capability::AvroDateTimestampSupport) => {
                match data_type {
                    DataType::Date => Some("TO_DATE"),
                    dt if dt.is_temporal() && dt != DataType::Time => Some("TO_TIMESTAMP"),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl LogicalPlanVisitor for StagedFilesFieldValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::StagedFilesField(field)) = node else {
            return Err(unexpected("StagedFilesFieldValueVisitor", node));
        };
        let path = if field.file_format.is_semi_structured() {
            field.element_path.clone()
        } else {
            None
        };
        Ok(VisitorResult::leaf(SqlNode::StagedColumn {
            qualifier: field.dataset_alias.clone(),
            position: field.column_number,
            path,
            function: Self::conversion(field, ctx).map(str::to_string),
        }))
    }
}

/// `METADATA$FILENAME` and `METADATA$FILE_ROW_NUMBER`.
pub struct MetadataFieldVisitor;

impl LogicalPlanVisitor for MetadataFieldVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let name = match node {
            LogicalNode::Value(Value::MetadataFileName) => "METADATA$FILENAME",
            LogicalNode::Value(Value::MetadataRowNumber) => "METADATA$FILE_ROW_NUMBER",
            _ => return Err(unexpected("MetadataFieldVisitor", node)),
        };
        Ok(VisitorResult::leaf(SqlNode::PseudoColumn(name.to_string())))
    }
}

pub struct DigestUdfVisitor;

impl LogicalPlanVisitor for DigestUdfVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::DigestUdf(udf)) = node else {
            return Err(unexpected("DigestUdfVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::DigestUdf {
                udf_name: udf.udf_name.clone(),
            },
            udf.arguments.iter().map(LogicalNode::Value).collect(),
        ))
    }
}
