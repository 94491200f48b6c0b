//! # Milestone
//!
//! Compiles ingestion and milestoning strategies into multi-dialect SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          IngestMode + Datasets (main, staging)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [planner]
//! ┌─────────────────────────────────────────────────────────┐
//! │      Logical operations (Create, Insert, Merge, ...)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [visitors, per dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Physical plan nodes                      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   SQL statements                         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`generator::RelationalGenerator`] drives the whole pipeline and
//! returns a [`generator::GeneratorResult`] with every statement in
//! execution order.

pub mod config;
pub mod generator;
pub mod ingest_mode;
pub mod logging;
pub mod logical;
pub mod physical;
pub mod planner;
pub mod schema_evolution;
pub mod sql;
pub mod visitors;

pub use sql::dialect;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::generator::{
        CaseConversion, GeneratorError, GeneratorOptions, GeneratorResult, RelationalGenerator,
    };
    pub use crate::ingest_mode::{DataSplitRange, IngestMode};
    pub use crate::logical::{DataType, DatasetDefinition, Field, FieldType, SchemaDefinition};
    pub use crate::planner::{Datasets, PlannerOptions, Staging};
    pub use crate::sql::{Capability, CapabilitySet, Dialect};
}

pub use generator::{GeneratorOptions, GeneratorResult, RelationalGenerator};
pub use sql::Dialect;
