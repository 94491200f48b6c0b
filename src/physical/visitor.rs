//! Visitor trait and the `(NodeKind, Dialect)` dispatch table.

use std::collections::HashMap;

use super::context::VisitorContext;
use super::node::SqlNode;
use super::{TransformError, TransformResult};
use crate::logical::{LogicalNode, NodeKind};
use crate::sql::Dialect;

/// What a visitor produced for one logical node.
#[derive(Debug, Default)]
pub struct VisitorResult<'a> {
    /// Physical node to attach under the current parent. `None` attaches the
    /// children directly to the current parent.
    pub node: Option<SqlNode>,
    /// Logical nodes to visit next, in order, under `node`.
    pub children: Vec<LogicalNode<'a>>,
}

impl<'a> VisitorResult<'a> {
    pub fn leaf(node: SqlNode) -> Self {
        Self {
            node: Some(node),
            children: Vec::new(),
        }
    }

    pub fn with_children(node: SqlNode, children: Vec<LogicalNode<'a>>) -> Self {
        Self {
            node: Some(node),
            children,
        }
    }

    /// Contribute nothing but the children.
    pub fn passthrough(children: Vec<LogicalNode<'a>>) -> Self {
        Self {
            node: None,
            children,
        }
    }
}

/// Turns one kind of logical node into a physical node for one dialect.
pub trait LogicalPlanVisitor: Send + Sync {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>>;
}

/// Dispatch table. Dialects register only what differs from ANSI.
#[derive(Default)]
pub struct VisitorRegistry {
    visitors: HashMap<(NodeKind, Dialect), &'static dyn LogicalPlanVisitor>,
}

impl VisitorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: NodeKind,
        dialect: Dialect,
        visitor: &'static dyn LogicalPlanVisitor,
    ) -> &mut Self {
        self.visitors.insert((kind, dialect), visitor);
        self
    }

    /// The dialect's own visitor, else the ANSI base entry.
    pub fn lookup(
        &self,
        kind: NodeKind,
        dialect: Dialect,
    ) -> TransformResult<&'static dyn LogicalPlanVisitor> {
        self.visitors
            .get(&(kind, dialect))
            .or_else(|| self.visitors.get(&(kind, Dialect::Ansi)))
            .copied()
            .ok_or(TransformError::NoVisitor { kind, dialect })
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}
