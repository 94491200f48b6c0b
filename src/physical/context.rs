//! Per-compilation settings shared by every visitor.

use chrono::NaiveDateTime;

use super::optimizer::Optimizer;
use super::TransformError;
use crate::logical::DataType;
use crate::sql::{Capability, CapabilitySet, Dialect, SqlDialect};

/// Immutable configuration of one compilation pass.
pub struct VisitorContext {
    pub dialect: Dialect,
    pub capabilities: CapabilitySet,
    /// Applied in order to every physical node before it is attached.
    pub optimizers: Vec<Box<dyn Optimizer>>,
    pub batch_start_timestamp: NaiveDateTime,
    pub quote_identifiers: bool,
}

impl VisitorContext {
    /// Context with the dialect's registered capabilities and no optimizers.
    pub fn new(dialect: Dialect, batch_start_timestamp: NaiveDateTime) -> Self {
        Self {
            dialect,
            capabilities: dialect.capability_set().clone(),
            optimizers: Vec::new(),
            batch_start_timestamp,
            quote_identifiers: true,
        }
    }

    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_optimizer(mut self, optimizer: Box<dyn Optimizer>) -> Self {
        self.optimizers.push(optimizer);
        self
    }

    pub fn with_quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// Fails with `UnsupportedCapability` naming `node` when the sink lacks `capability`.
    pub fn require(&self, capability: Capability, node: &str) -> Result<(), TransformError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(TransformError::UnsupportedCapability {
                capability,
                node: node.to_string(),
                dialect: self.dialect,
            })
        }
    }

    /// The batch start time as a literal in the dialect's format.
    pub fn batch_start_literal(&self) -> String {
        self.batch_start_timestamp
            .format(self.dialect.timestamp_format())
            .to_string()
    }

    pub fn type_name(&self, data_type: DataType) -> Result<&'static str, TransformError> {
        self.dialect
            .data_type_name(data_type)
            .ok_or(TransformError::UnmappedType {
                data_type,
                dialect: self.dialect,
            })
    }
}

impl std::fmt::Debug for VisitorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitorContext")
            .field("dialect", &self.dialect)
            .field("capabilities", &self.capabilities)
            .field(
                "optimizers",
                &self.optimizers.iter().map(|o| o.name()).collect::<Vec<_>>(),
            )
            .field("batch_start_timestamp", &self.batch_start_timestamp)
            .field("quote_identifiers", &self.quote_identifiers)
            .finish()
    }
}
