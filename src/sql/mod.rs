//! SQL text generation.
//!
//! - [`token`] - Token types and streams that serialize per dialect
//! - [`dialect`] - SQL dialect implementations and their capability sets

pub mod dialect;
pub mod token;

#[cfg(test)]
pub mod test_utils;

pub use dialect::{Capability, CapabilitySet, Dialect, SqlDialect};
pub use token::{Token, TokenStream};
