use crate::logical::{FunctionName, LogicalNode, Value};
use crate::physical::{
    LogicalPlanVisitor, SqlNode, TransformError, TransformResult, VisitorContext, VisitorResult,
};
use crate::visitors::unexpected;

use super::FieldVisitor;

pub struct FieldValueVisitor;

impl LogicalPlanVisitor for FieldValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Field(field)) = node else {
            return Err(unexpected("FieldValueVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::Column {
            qualifier: field.qualifier.clone(),
            name: field.name.clone(),
        }))
    }
}

pub struct StringValueVisitor;

impl LogicalPlanVisitor for StringValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::String(s)) = node else {
            return Err(unexpected("StringValueVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::StringLiteral(s.clone())))
    }
}

pub struct DatasetNameVisitor;

impl LogicalPlanVisitor for DatasetNameVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::DatasetName(name)) = node else {
            return Err(unexpected("DatasetNameVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::NameLiteral(name.clone())))
    }
}

pub struct NumericalValueVisitor;

impl LogicalPlanVisitor for NumericalValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        match node {
            LogicalNode::Value(Value::Integer(n)) => {
                Ok(VisitorResult::leaf(SqlNode::IntegerLiteral(*n)))
            }
            LogicalNode::Value(Value::Double(f)) if f.is_finite() => {
                Ok(VisitorResult::leaf(SqlNode::FloatLiteral(*f)))
            }
            LogicalNode::Value(Value::Double(f)) => Err(TransformError::Internal(format!(
                "cannot render non-finite number {}",
                f
            ))),
            _ => Err(unexpected("NumericalValueVisitor", node)),
        }
    }
}

pub struct BooleanValueVisitor;

impl LogicalPlanVisitor for BooleanValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Boolean(b)) = node else {
            return Err(unexpected("BooleanValueVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::BooleanLiteral(*b)))
    }
}

pub struct NullValueVisitor;

impl LogicalPlanVisitor for NullValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Null) = node else {
            return Err(unexpected("NullValueVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::Null))
    }
}

/// Datetime literals render as plain strings.
pub struct DateTimeValueVisitor;

impl LogicalPlanVisitor for DateTimeValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::DateTime(value)) = node else {
            return Err(unexpected("DateTimeValueVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::DatetimeLiteral {
            value: value.clone(),
            parse: None,
        }))
    }
}

pub struct BatchStartTimestampVisitor;

impl LogicalPlanVisitor for BatchStartTimestampVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::BatchStartTimestamp) = node else {
            return Err(unexpected("BatchStartTimestampVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::DatetimeLiteral {
            value: ctx.batch_start_literal(),
            parse: None,
        }))
    }
}

pub struct BatchEndTimestampVisitor;

impl LogicalPlanVisitor for BatchEndTimestampVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::BatchEndTimestamp) = node else {
            return Err(unexpected("BatchEndTimestampVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::Function {
            name: FunctionName::CurrentTimestamp.as_str().to_string(),
        }))
    }
}

pub struct FunctionVisitor;

impl LogicalPlanVisitor for FunctionVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Function(function)) = node else {
            return Err(unexpected("FunctionVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Function {
                name: function.name.as_str().to_string(),
            },
            function.arguments.iter().map(LogicalNode::Value).collect(),
        ))
    }
}

pub struct CastFunctionVisitor;

impl LogicalPlanVisitor for CastFunctionVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Cast(cast)) = node else {
            return Err(unexpected("CastFunctionVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Cast {
                data_type: FieldVisitor::type_string(&cast.field_type, ctx)?,
            },
            vec![LogicalNode::Value(cast.value.as_ref())],
        ))
    }
}

pub struct DistinctFunctionVisitor;

impl LogicalPlanVisitor for DistinctFunctionVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Distinct(distinct)) = node else {
            return Err(unexpected("DistinctFunctionVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Distinct,
            vec![LogicalNode::Value(distinct.value.as_ref())],
        ))
    }
}

pub struct SelectValueVisitor;

impl LogicalPlanVisitor for SelectValueVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Select(selection)) = node else {
            return Err(unexpected("SelectValueVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::ScalarSubquery,
            vec![LogicalNode::Selection(selection.as_ref())],
        ))
    }
}

pub struct ArithmeticVisitor;

impl LogicalPlanVisitor for ArithmeticVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Arithmetic { op, left, right }) = node else {
            return Err(unexpected("ArithmeticVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Arithmetic { op: *op },
            vec![
                LogicalNode::Value(left.as_ref()),
                LogicalNode::Value(right.as_ref()),
            ],
        ))
    }
}

pub struct AllVisitor;

impl LogicalPlanVisitor for AllVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::All) = node else {
            return Err(unexpected("AllVisitor", node));
        };
        Ok(VisitorResult::leaf(SqlNode::Star))
    }
}

pub struct AliasVisitor;

impl LogicalPlanVisitor for AliasVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Value(Value::Aliased { value, alias }) = node else {
            return Err(unexpected("AliasVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Alias {
                alias: alias.clone(),
            },
            vec![LogicalNode::Value(value.as_ref())],
        ))
    }
}
