//! Paginator builder and the blocking page iterator
//!
//! `Paginator` collects the request and the caller's paging controls, then
//! hands them to a driver: [`Pages`] for synchronous fetch functions or
//! [`PageStream`](super::PageStream) for async ones. Both drivers run the
//! same [`IterationState`] machine.

use super::stream::PageStream;
use super::types::{IterationMode, IterationState, PageRequest, PageResponse, PagingOptions};
use std::future::Future;
use std::iter::FusedIterator;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Builder for one paged list invocation
#[derive(Debug, Clone)]
pub struct Paginator<R> {
    request: R,
    options: PagingOptions,
    cancel: CancellationToken,
}

impl<R: PageRequest> Paginator<R> {
    /// Create a paginator over an initial request
    pub fn new(request: R) -> Self {
        Self {
            request,
            options: PagingOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace all paging options at once
    #[must_use]
    pub fn with_options(mut self, options: PagingOptions) -> Self {
        self.options = options;
        self
    }

    /// Start from a caller-supplied token (implies manual paging)
    #[must_use]
    pub fn starting_token(mut self, token: impl Into<String>) -> Self {
        self.options.starting_token = Some(token.into());
        self
    }

    /// Disable auto-iteration
    #[must_use]
    pub fn no_auto_iterate(mut self, value: bool) -> Self {
        self.options.no_auto_iterate = value;
        self
    }

    /// Set the global iteration mode
    #[must_use]
    pub fn mode(mut self, mode: IterationMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Stop between pages once this token is cancelled
    #[must_use]
    pub fn cancel_on(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Paging options in effect
    pub fn options(&self) -> &PagingOptions {
        &self.options
    }

    /// Drive a synchronous fetch function
    pub fn pages<F, P, E>(self, fetch: F) -> Pages<R, F>
    where
        F: FnMut(&R) -> Result<P, E>,
        P: PageResponse,
    {
        Pages {
            state: IterationState::new(&self.options),
            request: self.request,
            fetch,
            cancel: self.cancel,
        }
    }

    /// Drive an async fetch function
    pub fn stream<F, Fut, P, E>(self, fetch: F) -> PageStream<R, F, Fut>
    where
        F: FnMut(R) -> Fut,
        Fut: Future<Output = Result<P, E>>,
        P: PageResponse,
    {
        PageStream::new(
            self.request,
            fetch,
            IterationState::new(&self.options),
            self.cancel,
        )
    }
}

/// Blocking page iterator
///
/// Yields one `Result` per fetch call. After an `Err` the iterator is
/// exhausted.
#[derive(Debug)]
pub struct Pages<R, F> {
    request: R,
    fetch: F,
    state: IterationState,
    cancel: CancellationToken,
}

impl<R, F> Pages<R, F> {
    /// Iteration state (phase, page count, token)
    pub fn state(&self) -> &IterationState {
        &self.state
    }

    /// Token to hand back to the caller for manual resumption
    pub fn resume_token(&self) -> Option<&str> {
        self.state.resume_token()
    }
}

impl<R, F, P, E> Pages<R, F>
where
    R: PageRequest,
    F: FnMut(&R) -> Result<P, E>,
    P: PageResponse,
{
    /// Flatten pages into their items
    pub fn items(self) -> Items<Self, P::Item> {
        Items::new(self)
    }
}

impl<R, F, P, E> Iterator for Pages<R, F>
where
    R: PageRequest,
    F: FnMut(&R) -> Result<P, E>,
    P: PageResponse,
{
    type Item = Result<P, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cancel.is_cancelled() && !self.state.phase().is_terminal() {
            warn!(pages = self.state.pages_fetched(), "paging cancelled");
            self.state.cancel();
        }
        if !self.state.begin_fetch() {
            return None;
        }

        self.request
            .set_continuation_token(self.state.token().map(str::to_owned));

        match (self.fetch)(&self.request) {
            Ok(page) => {
                self.state.record_page(page.continuation_token());
                Some(Ok(page))
            }
            Err(e) => {
                self.state.record_failure();
                Some(Err(e))
            }
        }
    }
}

impl<R, F, P, E> FusedIterator for Pages<R, F>
where
    R: PageRequest,
    F: FnMut(&R) -> Result<P, E>,
    P: PageResponse,
{
}

/// Item-level view over a page iterator
#[derive(Debug)]
pub struct Items<I, T> {
    pages: I,
    current: std::vec::IntoIter<T>,
}

impl<I, T> Items<I, T> {
    /// Wrap a page iterator
    pub fn new(pages: I) -> Self {
        Self {
            pages,
            current: Vec::new().into_iter(),
        }
    }

    /// Underlying page iterator
    pub fn pages(&self) -> &I {
        &self.pages
    }
}

impl<I, P, E> Iterator for Items<I, P::Item>
where
    I: Iterator<Item = Result<P, E>>,
    P: PageResponse,
{
    type Item = Result<P::Item, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(Ok(item));
            }
            match self.pages.next()? {
                Ok(page) => self.current = page.into_items().into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
