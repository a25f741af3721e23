//! Async page stream
//!
//! At most one fetch future is in flight. The next one is only created when
//! the consumer polls again after receiving a page.

use super::types::{IterationState, PageRequest, PageResponse};
use futures::stream::Stream;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio_util::sync::CancellationToken;
use tracing::warn;

pin_project! {
    /// Stream of pages driven by an async fetch function
    ///
    /// Yields one `Result` per fetch call and ends after the first `Err`.
    pub struct PageStream<R, F, Fut> {
        request: R,
        fetch: F,
        state: IterationState,
        cancel: CancellationToken,
        #[pin]
        in_flight: Option<Fut>,
    }
}

impl<R, F, Fut> PageStream<R, F, Fut> {
    pub(super) fn new(
        request: R,
        fetch: F,
        state: IterationState,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            request,
            fetch,
            state,
            cancel,
            in_flight: None,
        }
    }

    /// Iteration state (phase, page count, token)
    pub fn state(&self) -> &IterationState {
        &self.state
    }

    /// Token to hand back to the caller for manual resumption
    pub fn resume_token(&self) -> Option<&str> {
        self.state.resume_token()
    }
}

impl<R, F, Fut, P, E> PageStream<R, F, Fut>
where
    R: PageRequest,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    P: PageResponse,
{
    /// Flatten pages into their items
    pub fn items(self) -> ItemStream<Self, P::Item> {
        ItemStream::new(self)
    }
}

impl<R, F, Fut, P, E> Stream for PageStream<R, F, Fut>
where
    R: PageRequest,
    F: FnMut(R) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    P: PageResponse,
{
    type Item = Result<P, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(fut) = this.in_flight.as_mut().as_pin_mut() {
                let result = ready!(fut.poll(cx));
                this.in_flight.set(None);
                return match result {
                    Ok(page) => {
                        this.state.record_page(page.continuation_token());
                        Poll::Ready(Some(Ok(page)))
                    }
                    Err(e) => {
                        this.state.record_failure();
                        Poll::Ready(Some(Err(e)))
                    }
                };
            }

            if this.cancel.is_cancelled() && !this.state.phase().is_terminal() {
                warn!(pages = this.state.pages_fetched(), "paging cancelled");
                this.state.cancel();
            }
            if !this.state.begin_fetch() {
                return Poll::Ready(None);
            }

            this.request
                .set_continuation_token(this.state.token().map(str::to_owned));
            let fut = (this.fetch)(this.request.clone());
            this.in_flight.set(Some(fut));
        }
    }
}

impl<R, F, Fut> std::fmt::Debug for PageStream<R, F, Fut> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageStream")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

pin_project! {
    /// Stream of items flattened from a page stream
    ///
    /// Keeps the page stream so the resume token is still readable once the
    /// items run out.
    pub struct ItemStream<S, T> {
        #[pin]
        pages: S,
        current: std::vec::IntoIter<T>,
    }
}

impl<S, T> ItemStream<S, T> {
    /// Wrap a page stream
    pub fn new(pages: S) -> Self {
        Self {
            pages,
            current: Vec::new().into_iter(),
        }
    }

    /// Underlying page stream
    pub fn pages(&self) -> &S {
        &self.pages
    }
}

impl<R, F, Fut, T> ItemStream<PageStream<R, F, Fut>, T> {
    /// Iteration state of the underlying pages
    pub fn state(&self) -> &IterationState {
        self.pages.state()
    }

    /// Token to hand back to the caller for manual resumption
    pub fn resume_token(&self) -> Option<&str> {
        self.pages.resume_token()
    }
}

impl<S, P, E> Stream for ItemStream<S, P::Item>
where
    S: Stream<Item = Result<P, E>>,
    P: PageResponse,
{
    type Item = Result<P::Item, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(item) = this.current.next() {
                return Poll::Ready(Some(Ok(item)));
            }
            match ready!(this.pages.as_mut().poll_next(cx)) {
                Some(Ok(page)) => *this.current = page.into_items().into_iter(),
                Some(Err(e)) => return Poll::Ready(Some(Err(e))),
                None => return Poll::Ready(None),
            }
        }
    }
}

impl<S: std::fmt::Debug, T> std::fmt::Debug for ItemStream<S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemStream")
            .field("pages", &self.pages)
            .field("buffered", &self.current.len())
            .finish()
    }
}
