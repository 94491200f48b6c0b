//! Drives visitation of a logical plan and renders each statement.

use tracing::{debug, trace};

use super::context::VisitorContext;
use super::plan::{NodeId, PhysicalPlan};
use super::render::Renderer;
use super::visitor::VisitorRegistry;
use super::TransformResult;
use crate::logical::{LogicalNode, LogicalPlan, Operation, Selection};

/// Compiles logical plans to SQL text for one dialect.
pub struct RelationalTransformer<'r> {
    registry: &'r VisitorRegistry,
    context: VisitorContext,
}

impl<'r> RelationalTransformer<'r> {
    pub fn new(registry: &'r VisitorRegistry, context: VisitorContext) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &VisitorContext {
        &self.context
    }

    /// One SQL string per operation, in plan order.
    pub fn generate(&self, plan: &LogicalPlan) -> TransformResult<Vec<String>> {
        plan.operations
            .iter()
            .map(|op| self.generate_operation(op))
            .collect()
    }

    pub fn generate_operation(&self, operation: &Operation) -> TransformResult<String> {
        let plan = self.transform(operation)?;
        self.render(&plan)
    }

    /// A standalone `SELECT`, as used by statistics queries.
    pub fn generate_selection(&self, selection: &Selection) -> TransformResult<String> {
        let mut plan = PhysicalPlan::new();
        self.visit(LogicalNode::Selection(selection), None, &mut plan)?;
        self.render(&plan)
    }

    fn render(&self, plan: &PhysicalPlan) -> TransformResult<String> {
        Renderer::new(plan, self.context.dialect, self.context.quote_identifiers).render()
    }

    /// Build the physical plan of a single operation.
    pub fn transform(&self, operation: &Operation) -> TransformResult<PhysicalPlan> {
        let mut plan = PhysicalPlan::new();
        self.visit(LogicalNode::Operation(operation), None, &mut plan)?;
        debug!(
            dialect = %self.context.dialect,
            nodes = plan.len(),
            "transformed operation"
        );
        Ok(plan)
    }

    fn visit(
        &self,
        node: LogicalNode<'_>,
        parent: Option<NodeId>,
        plan: &mut PhysicalPlan,
    ) -> TransformResult<()> {
        let kind = node.kind();
        trace!(?kind, ?parent, "visit");
        let visitor = self.registry.lookup(kind, self.context.dialect)?;
        let result = visitor.visit(node, &self.context)?;

        let next_parent = match result.node {
            Some(physical) => {
                let physical = self
                    .context
                    .optimizers
                    .iter()
                    .fold(physical, |n, optimizer| optimizer.optimize(n));
                Some(plan.push(parent, physical)?)
            }
            None => parent,
        };

        for child in result.children {
            self.visit(child, next_parent, plan)?;
        }
        Ok(())
    }
}
