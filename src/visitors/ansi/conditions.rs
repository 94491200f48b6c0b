use crate::logical::{Condition, InList, LogicalNode};
use crate::physical::{
    LogicalPlanVisitor, SqlNode, TransformError, TransformResult, VisitorContext, VisitorResult,
};
use crate::visitors::unexpected;

/// `AND` and `OR` share one visitor; every operand is parenthesized on render.
pub struct LogicalConnectiveVisitor;

impl LogicalPlanVisitor for LogicalConnectiveVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let (sql, operands) = match node {
            LogicalNode::Condition(Condition::And(operands)) => (SqlNode::And, operands),
            LogicalNode::Condition(Condition::Or(operands)) => (SqlNode::Or, operands),
            _ => return Err(unexpected("LogicalConnectiveVisitor", node)),
        };
        if operands.is_empty() {
            return Err(TransformError::Internal(format!(
                "{:?} without operands",
                node.kind()
            )));
        }
        Ok(VisitorResult::with_children(
            sql,
            operands.iter().map(LogicalNode::Condition).collect(),
        ))
    }
}

pub struct NotVisitor;

impl LogicalPlanVisitor for NotVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Condition(Condition::Not(inner)) = node else {
            return Err(unexpected("NotVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Not,
            vec![LogicalNode::Condition(inner.as_ref())],
        ))
    }
}

pub struct ExistsVisitor;

impl LogicalPlanVisitor for ExistsVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Condition(Condition::Exists(selection)) = node else {
            return Err(unexpected("ExistsVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Exists,
            vec![LogicalNode::Selection(selection.as_ref())],
        ))
    }
}

pub struct ComparisonVisitor;

impl LogicalPlanVisitor for ComparisonVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Condition(Condition::Comparison { op, left, right }) = node else {
            return Err(unexpected("ComparisonVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Comparison { op: *op },
            vec![LogicalNode::Value(left), LogicalNode::Value(right)],
        ))
    }
}

pub struct InVisitor;

impl LogicalPlanVisitor for InVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Condition(Condition::In {
            value,
            list,
            negated,
        }) = node
        else {
            return Err(unexpected("InVisitor", node));
        };
        let mut children = vec![LogicalNode::Value(value)];
        match list {
            InList::Values(values) => children.extend(values.iter().map(LogicalNode::Value)),
            InList::Selection(selection) => {
                children.push(LogicalNode::Selection(selection.as_ref()))
            }
        }
        Ok(VisitorResult::with_children(
            SqlNode::In { negated: *negated },
            children,
        ))
    }
}

pub struct IsNullVisitor;

impl LogicalPlanVisitor for IsNullVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Condition(Condition::IsNull { value, negated }) = node else {
            return Err(unexpected("IsNullVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::IsNull { negated: *negated },
            vec![LogicalNode::Value(value)],
        ))
    }
}

/// `column = value` inside `UPDATE ... SET` and `WHEN MATCHED THEN UPDATE SET`.
pub struct AssignmentVisitor;

impl LogicalPlanVisitor for AssignmentVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Assignment(column, value) = node else {
            return Err(unexpected("AssignmentVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::Assignment,
            vec![LogicalNode::Value(column), LogicalNode::Value(value)],
        ))
    }
}
