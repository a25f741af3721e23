//! Pagination types and traits
//!
//! Defines the request/response seams a fetch function plugs into and the
//! per-invocation iteration state shared by the blocking and async drivers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// A request that can carry an opaque continuation token
pub trait PageRequest: Clone {
    /// Set (or clear, with `None`) the continuation token field
    fn set_continuation_token(&mut self, token: Option<String>);
}

/// One page returned by a paged API
pub trait PageResponse {
    /// Result item type
    type Item;

    /// Token for the next page. `None` or `Some("")` both mean exhausted.
    fn continuation_token(&self) -> Option<&str>;

    /// Consume the page and return its items
    fn into_items(self) -> Vec<Self::Item>;
}

/// Normalize a token: an empty string is the same as no token
pub fn normalize_token(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(str::to_owned)
}

// ============================================================================
// Iteration Mode
// ============================================================================

/// Process-wide paging behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IterationMode {
    /// Fetch every page until the token runs out
    #[default]
    Default,
    /// Always fetch a single page
    Legacy,
}

impl FromStr for IterationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "legacy" => Ok(Self::Legacy),
            other => Err(Error::invalid_value(
                "iteration_mode",
                format!("expected 'default' or 'legacy', got '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for IterationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

// ============================================================================
// Paging Options
// ============================================================================

/// Caller-facing paging controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingOptions {
    /// Token to start from. A non-empty token puts the caller in control.
    pub starting_token: Option<String>,
    /// Fetch exactly one page and hand the token back
    pub no_auto_iterate: bool,
    /// Global mode, read once by the caller
    pub mode: IterationMode,
}

impl PagingOptions {
    /// Create default options (auto-iterate from the first page)
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a token
    #[must_use]
    pub fn starting_token(mut self, token: impl Into<String>) -> Self {
        self.starting_token = Some(token.into());
        self
    }

    /// Disable auto-iteration
    #[must_use]
    pub fn no_auto_iterate(mut self, value: bool) -> Self {
        self.no_auto_iterate = value;
        self
    }

    /// Set the iteration mode
    #[must_use]
    pub fn mode(mut self, mode: IterationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether the caller controls paging
    pub fn is_manual(&self) -> bool {
        self.no_auto_iterate || normalize_token(self.starting_token.as_deref()).is_some()
    }
}

// ============================================================================
// Iteration State
// ============================================================================

/// Lifecycle phase of one list invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch issued yet
    NotStarted,
    /// A fetch has been issued (or the next one is due)
    Fetching,
    /// Token exhausted, or the single page of manual/legacy mode was emitted
    Done,
    /// A fetch failed
    Failed,
    /// The cancellation signal was observed before a fetch
    Cancelled,
}

impl Phase {
    /// Check if the phase is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// Tracks one list invocation
#[derive(Debug, Clone)]
pub struct IterationState {
    token: Option<String>,
    manual: bool,
    mode: IterationMode,
    phase: Phase,
    pages: u64,
}

impl IterationState {
    /// Create state from the caller's options
    pub fn new(options: &PagingOptions) -> Self {
        Self {
            token: normalize_token(options.starting_token.as_deref()),
            manual: options.is_manual(),
            mode: options.mode,
            phase: Phase::NotStarted,
            pages: 0,
        }
    }

    /// Whether more than one page may be fetched
    pub fn auto_iterate(&self) -> bool {
        !self.manual && self.mode == IterationMode::Default
    }

    /// Caller-controlled paging
    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Active iteration mode
    pub fn mode(&self) -> IterationMode {
        self.mode
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of pages emitted so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages
    }

    /// Token the next fetch will carry (or the one to resume from)
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token left over for manual resumption, if any
    pub fn resume_token(&self) -> Option<&str> {
        match self.phase {
            Phase::Done | Phase::Cancelled => self.token.as_deref(),
            _ => None,
        }
    }

    /// Move into `Fetching` if another fetch is due.
    ///
    /// Returns `false` once the state is terminal.
    pub fn begin_fetch(&mut self) -> bool {
        match self.phase {
            Phase::NotStarted | Phase::Fetching => {
                self.phase = Phase::Fetching;
                true
            }
            _ => false,
        }
    }

    /// Record a successful page and decide whether to continue
    pub fn record_page(&mut self, next_token: Option<&str>) {
        self.pages += 1;
        self.token = normalize_token(next_token);
        debug!(
            page = self.pages,
            next_token = self.token.as_deref().unwrap_or(""),
            "page fetched"
        );

        if !self.auto_iterate() || self.token.is_none() {
            self.phase = Phase::Done;
            debug!(pages = self.pages, mode = %self.mode, manual = self.manual, "paging done");
        }
    }

    /// Record a failed fetch
    pub fn record_failure(&mut self) {
        self.phase = Phase::Failed;
    }

    /// Stop before the next fetch
    pub fn cancel(&mut self) {
        if !self.phase.is_terminal() {
            self.phase = Phase::Cancelled;
        }
    }
}
