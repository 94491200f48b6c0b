//! Logical plan to SQL text.
//!
//! Each logical [`crate::logical::Operation`] is walked by the
//! [`RelationalTransformer`]. Every node is handed to the visitor registered
//! for its `(NodeKind, Dialect)` pair; the visitor returns the physical node it
//! builds plus the logical children to visit next. New physical nodes pass
//! through the context's optimizers and are then pushed into a
//! [`PhysicalPlan`] arena under their parent. The finished arena is rendered
//! to one SQL string.
//!
//! ```text
//! Operation ──visit──▶ SqlNode ──optimize──▶ push(parent) ──▶ render ──▶ String
//!     │                    ▲
//!     └── children ────────┘
//! ```

pub mod context;
pub mod node;
pub mod optimizer;
pub mod plan;
pub mod render;
pub mod transformer;
pub mod visitor;

pub use context::VisitorContext;
pub use node::{AlterAction, NodeClass, SqlNode};
pub use optimizer::{LowerCaseOptimizer, Optimizer, UpperCaseOptimizer};
pub use plan::{NodeId, PhysicalPlan};
pub use transformer::RelationalTransformer;
pub use visitor::{LogicalPlanVisitor, VisitorRegistry, VisitorResult};

use thiserror::Error;

use crate::logical::{DataType, NodeKind};
use crate::sql::{Capability, Dialect};

/// Errors raised while turning a logical plan into SQL.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("No visitor registered for {kind:?} in dialect {dialect}")]
    NoVisitor { kind: NodeKind, dialect: Dialect },

    #[error("{node} requires capability {capability}, which {dialect} does not support")]
    UnsupportedCapability {
        capability: Capability,
        node: String,
        dialect: Dialect,
    },

    #[error("Data type {data_type} has no mapping in dialect {dialect}")]
    UnmappedType { data_type: DataType, dialect: Dialect },

    #[error("Internal transform error: {0}")]
    Internal(String),
}

pub type TransformResult<T> = Result<T, TransformError>;
