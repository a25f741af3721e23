// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagewalk
//!
//! Continuation-token paging for AWS-style JSON APIs, plus a declarative
//! operation catalog and CLI on top of it.
//!
//! ## Features
//!
//! - **Generic paginator**: one iteration state machine behind a blocking
//!   `Iterator` and an async `Stream`
//! - **Auto and manual paging**: follow every token, or fetch one page and
//!   hand the token back
//! - **Legacy mode**: a process-wide switch that always fetches one page
//! - **Cancellation**: stop cleanly between pages
//! - **Operation catalogs**: YAML descriptions of paged and single-call
//!   operations (built-in: AWS Billing Conductor, CloudWatch RUM)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use pagewalk::engine::{Engine, Invocation};
//! use pagewalk::http::{HttpClient, HttpClientConfig};
//! use pagewalk::operation::load_catalog;
//! use pagewalk::{PagingOptions, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let catalog = load_catalog("billingconductor")?;
//!     let op = catalog.operation("ListBillingGroups")?;
//!
//!     let config = HttpClientConfig::builder()
//!         .base_url(catalog.endpoint.clone().unwrap_or_default())
//!         .build();
//!     let engine = Engine::new(HttpClient::with_config(config)?);
//!
//!     let groups: Vec<_> = engine
//!         .list(op, &Invocation::new(), PagingOptions::new(), None, CancellationToken::new())?
//!         .items()
//!         .try_collect()
//!         .await?;
//!
//!     println!("{} billing groups", groups.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  CLI: operations | list | invoke                         │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬─────────────────┴──────┬───────────┬──────────┐
//! │ Catalog  │ Engine                 │ Select    │ Confirm  │
//! ├──────────┼────────────────────────┼───────────┼──────────┤
//! │ YAML ops │ JsonRequest / JsonPage │ *, ^Param │ Prompt   │
//! │ Built-in │ Paginator -> Stream    │ dot path  │ Force    │
//! └──────────┴────────────────────────┴───────────┴──────────┘
//!                              │
//!                  HTTP (reqwest, no retry)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Continuation-token pagination
pub mod pagination;

/// JSON HTTP transport
pub mod http;

/// Operation catalog definitions and YAML loader
pub mod operation;

/// Built-in operation catalogs
pub mod catalogs;

/// Path templates
pub mod template;

/// Response projection
pub mod select;

/// Confirmation before state-changing calls
pub mod confirm;

/// Tag conversion
pub mod tags;

/// Settings file and environment
pub mod config;

/// Operation execution engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use pagination::{
    ItemStream, IterationMode, IterationState, PageRequest, PageResponse, PageStream, Pages,
    Paginator, PagingOptions, Phase,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
