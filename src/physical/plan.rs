//! Arena of physical nodes.
//!
//! Nodes are stored flat and refer to their children by index, so a plan is
//! built with a single `&mut PhysicalPlan` threaded through the traversal.

use super::node::{NodeClass, SqlNode};
use super::{TransformError, TransformResult};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    node: SqlNode,
    children: Vec<NodeId>,
}

/// One statement under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalPlan {
    entries: Vec<Entry>,
    root: Option<NodeId>,
}

impl PhysicalPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `node` under `parent`, or make it the root when `parent` is `None`.
    ///
    /// A plan has exactly one root; a second parentless push is an error, as
    /// is a push under an id that does not exist.
    pub fn push(&mut self, parent: Option<NodeId>, node: SqlNode) -> TransformResult<NodeId> {
        let id = self.entries.len();
        match parent {
            None if self.root.is_some() => {
                return Err(TransformError::Internal(format!(
                    "cannot attach {:?} as a second root",
                    node
                )));
            }
            None => self.root = Some(id),
            Some(p) => {
                let entry = self.entries.get_mut(p).ok_or_else(|| {
                    TransformError::Internal(format!("no parent node {} for {:?}", p, node))
                })?;
                entry.children.push(id);
            }
        }
        self.entries.push(Entry {
            node,
            children: Vec::new(),
        });
        Ok(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> TransformResult<&SqlNode> {
        self.entries
            .get(id)
            .map(|e| &e.node)
            .ok_or_else(|| TransformError::Internal(format!("no node {}", id)))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.entries
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    /// Children of `id` playing the given role, in push order.
    pub fn children_of(&self, id: NodeId, class: NodeClass) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| {
                self.entries
                    .get(*c)
                    .is_some_and(|e| e.node.class() == class)
            })
            .collect()
    }

    /// The single child of `id` with the given role, if any.
    pub fn child_of(&self, id: NodeId, class: NodeClass) -> Option<NodeId> {
        self.children_of(id, class).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
