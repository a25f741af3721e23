//! Pagination module
//!
//! Continuation-token paging with auto-iteration and manual control.
//!
//! # Overview
//!
//! A [`Paginator`] wraps an initial request and the caller's paging
//! controls. Given a fetch function it produces a lazy sequence of pages:
//!
//! - [`Pages`] - blocking `Iterator` for `FnMut(&R) -> Result<P, E>`
//! - [`PageStream`] - `futures::Stream` for `FnMut(R) -> impl Future`
//!
//! `items()` on either driver flattens pages into items and still exposes
//! the resume token of the pages underneath.
//!
//! Paging stops when the API returns an empty or absent token, after the
//! first page in manual or legacy mode, on the first fetch error, or when
//! the cancellation token fires between pages. Tokens are opaque and are
//! passed back verbatim.

mod paginator;
mod stream;
mod types;

pub use paginator::{Items, Pages, Paginator};
pub use stream::{ItemStream, PageStream};
pub use types::{
    normalize_token, IterationMode, IterationState, PageRequest, PageResponse, PagingOptions,
    Phase,
};
