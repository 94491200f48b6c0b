use crate::logical::{AlterOperation, LogicalNode, MergeClause, Operation};
use crate::physical::{
    AlterAction, LogicalPlanVisitor, SqlNode, TransformResult, VisitorContext, VisitorResult,
};
use crate::sql::Capability;
use crate::visitors::unexpected;

pub struct CreateVisitor;

impl LogicalPlanVisitor for CreateVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Create(create)) = node else {
            return Err(unexpected("CreateVisitor", node));
        };
        let dataset = &create.dataset;
        let mut children = vec![LogicalNode::Reference(&dataset.reference)];
        children.extend(dataset.schema.fields.iter().map(LogicalNode::Field));
        children.push(LogicalNode::Properties(&dataset.properties));
        Ok(VisitorResult::with_children(
            SqlNode::CreateTable {
                if_not_exists: create.if_not_exists,
            },
            children,
        ))
    }
}

/// ANSI column changes restate the full column definition.
pub struct AlterVisitor;

impl AlterVisitor {
    pub(crate) fn children<'a>(alter: &'a crate::logical::Alter) -> Vec<LogicalNode<'a>> {
        vec![
            LogicalNode::Reference(&alter.dataset),
            LogicalNode::Properties(&alter.properties),
            LogicalNode::Field(&alter.field),
        ]
    }
}

impl LogicalPlanVisitor for AlterVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Alter(alter)) = node else {
            return Err(unexpected("AlterVisitor", node));
        };
        let action = match alter.operation {
            AlterOperation::AddColumn => AlterAction::AddColumn,
            AlterOperation::ChangeDatatype => AlterAction::AlterColumn,
            AlterOperation::NullableColumn => AlterAction::DropNotNull,
        };
        Ok(VisitorResult::with_children(
            SqlNode::AlterTable { action },
            Self::children(alter),
        ))
    }
}

pub struct InsertVisitor;

impl LogicalPlanVisitor for InsertVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Insert(insert)) = node else {
            return Err(unexpected("InsertVisitor", node));
        };
        let mut children = vec![LogicalNode::Reference(&insert.target)];
        children.extend(insert.fields.iter().map(LogicalNode::Value));
        children.push(LogicalNode::Selection(&insert.source));
        Ok(VisitorResult::with_children(SqlNode::Insert, children))
    }
}

pub struct UpdateVisitor;

impl LogicalPlanVisitor for UpdateVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Update(update)) = node else {
            return Err(unexpected("UpdateVisitor", node));
        };
        let mut children = vec![LogicalNode::Reference(&update.dataset)];
        children.extend(
            update
                .assignments
                .iter()
                .map(|(column, value)| LogicalNode::Assignment(column, value)),
        );
        children.extend(update.condition.as_ref().map(LogicalNode::Condition));
        Ok(VisitorResult::with_children(SqlNode::Update, children))
    }
}

pub struct DeleteVisitor;

impl DeleteVisitor {
    pub(crate) fn build<'a>(
        node: LogicalNode<'a>,
        where_required: bool,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Delete(delete)) = node else {
            return Err(unexpected("DeleteVisitor", node));
        };
        let mut children = vec![LogicalNode::Reference(&delete.dataset)];
        children.extend(delete.condition.as_ref().map(LogicalNode::Condition));
        Ok(VisitorResult::with_children(
            SqlNode::Delete { where_required },
            children,
        ))
    }
}

impl LogicalPlanVisitor for DeleteVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        Self::build(node, false)
    }
}

pub struct MergeVisitor;

impl LogicalPlanVisitor for MergeVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Merge(merge)) = node else {
            return Err(unexpected("MergeVisitor", node));
        };
        ctx.require(Capability::Merge, "Merge")?;
        let mut children = vec![
            LogicalNode::Reference(&merge.target),
            LogicalNode::Dataset(&merge.source),
            LogicalNode::Condition(&merge.on),
        ];
        children.extend(merge.clauses.iter().map(LogicalNode::MergeClause));
        Ok(VisitorResult::with_children(SqlNode::Merge, children))
    }
}

pub struct MergeClauseVisitor;

impl LogicalPlanVisitor for MergeClauseVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        _ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::MergeClause(clause) = node else {
            return Err(unexpected("MergeClauseVisitor", node));
        };
        let result = match clause {
            MergeClause::MatchedDelete { condition } => VisitorResult::with_children(
                SqlNode::WhenMatchedDelete,
                condition.iter().map(LogicalNode::Condition).collect(),
            ),
            MergeClause::MatchedUpdate {
                condition,
                assignments,
            } => {
                let mut children: Vec<_> =
                    condition.iter().map(LogicalNode::Condition).collect();
                children.extend(
                    assignments
                        .iter()
                        .map(|(column, value)| LogicalNode::Assignment(column, value)),
                );
                VisitorResult::with_children(SqlNode::WhenMatchedUpdate, children)
            }
            MergeClause::NotMatchedInsert {
                condition,
                fields,
                values,
            } => {
                let mut children: Vec<_> =
                    condition.iter().map(LogicalNode::Condition).collect();
                children.extend(fields.iter().map(LogicalNode::Value));
                children.extend(values.iter().map(LogicalNode::Value));
                VisitorResult::with_children(
                    SqlNode::WhenNotMatchedInsert {
                        columns: fields.len(),
                    },
                    children,
                )
            }
        };
        Ok(result)
    }
}

pub struct DropVisitor;

impl LogicalPlanVisitor for DropVisitor {
    fn visit<'a>(
        &self,
        node: LogicalNode<'a>,
        ctx: &VisitorContext,
    ) -> TransformResult<VisitorResult<'a>> {
        let LogicalNode::Operation(Operation::Drop(drop)) = node else {
            return Err(unexpected("DropVisitor", node));
        };
        Ok(VisitorResult::with_children(
            SqlNode::DropTable {
                if_exists: drop.if_exists,
                cascade: drop.cascade && ctx.supports(Capability::DropTableCascade),
            },
            vec![LogicalNode::Reference(&drop.dataset)],
        ))
    }
}
