//! BigQuery overrides: `DELETE` always carries a `WHERE`, datetime literals
//! are parsed with `PARSE_DATETIME`.

use crate::logical::{FunctionName, LogicalNode, NodeKind, Value};
use crate::physical::{
    LogicalPlanVisitor, SqlNode, TransformResult, VisitorContext, VisitorRegistry, VisitorResult,
};
use crate::sql::{Dialect, SqlDialect};
use crate::visitors::ansi::DeleteVisitor;
use crate::visitors::unexpected;

pub fn register(registry: &mut VisitorRegistry) {
    let d = Dialect::BigQuery;
    registry
        .register(NodeKind::Delete, d, &BigQueryDeleteVisitor)
        .register(NodeKind::DateTimeValue, d, &ParsedDatetimeVisitor)
        .register(NodeKind::BatchStartTimestamp, d, &ParsedDatetimeVisitor);
}

pub struct BigQueryDeleteVisitor;

impl LogicalPlanVisitor for BigQueryDeleteVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        DeleteVisitor::build(node, true)
    }
}

/// `PARSE_DATETIME('%Y-%m-%d %H:%M:%S','2000-01-01 00:00:00')`
pub struct ParsedDatetimeVisitor;

impl LogicalPlanVisitor for ParsedDatetimeVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let value = match node {
            LogicalNode::Value(Value::DateTime(value)) => value.clone(),
            LogicalNode::Value(Value::BatchStartTimestamp) => ctx.batch_start_literal(),
            _ => return Err(unexpected("ParsedDatetimeVisitor", node)),
        };
        Ok(VisitorResult::leaf(SqlNode::DatetimeLiteral {
            value,
            parse: Some((
                FunctionName::ParseDatetime.as_str().to_string(),
                ctx.dialect.timestamp_format().to_string(),
            )),
        }))
    }
}
