//! Operation catalog module
//!
//! Declarative descriptions of API operations, loaded from YAML.
//!
//! # Overview
//!
//! The operation module provides:
//! - `CatalogDefinition` - A named set of operations for one service
//! - `OperationDefinition` - Path, method, parameter routing and flags
//! - `PagingDefinition` - Where the continuation token and page size live
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_catalog, load_catalog_from_str};
pub use types::{CatalogDefinition, OperationDefinition, PagingDefinition};

#[cfg(test)]
mod tests;
