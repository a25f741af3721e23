//! CLI module
//!
//! Command-line interface for running catalog operations.
//!
//! # Commands
//!
//! - `operations` - List operations in the catalog
//! - `list` - Run a paged list operation
//! - `invoke` - Run a single-call operation

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_body, parse_params, Runner};
