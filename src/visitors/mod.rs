//! Visitor tables per dialect.
//!
//! ANSI registers a visitor for every node kind it can render. Snowflake and
//! BigQuery register only their overrides and additions; everything else
//! resolves to the ANSI entry through [`VisitorRegistry::lookup`].

pub mod ansi;
pub mod bigquery;
pub mod snowflake;

use once_cell::sync::Lazy;

use crate::logical::LogicalNode;
use crate::physical::{TransformError, VisitorRegistry};

static REGISTRY: Lazy<VisitorRegistry> = Lazy::new(|| {
    let mut registry = VisitorRegistry::new();
    ansi::register(&mut registry);
    snowflake::register(&mut registry);
    bigquery::register(&mut registry);
    registry
});

/// The process-wide visitor table. Read-only once built.
pub fn registry() -> &'static VisitorRegistry {
    &REGISTRY
}

/// A visitor was handed a node it is not registered for.
pub(crate) fn unexpected(visitor: &str, node: LogicalNode<'_>) -> TransformError {
    TransformError::Internal(format!("{} cannot visit {:?}", visitor, node.kind()))
}
