//! Generic list controller shared by every list screen.
//!
//! A [`ListController`] owns the remote collection for one screen together
//! with the operator's status filter, search query and page. Everything the
//! screen shows is derived from those four inputs on every read through
//! [`ListController::view`].

mod controller;
mod page;
mod search;
mod source;

pub use controller::{FetchOutcome, FetchTicket, ListController, ListView, LoadState, PageRetention};
pub use page::{PAGE_SIZE, PageWindow, total_pages};
pub use search::SearchPattern;
pub use source::ListSource;

/// Status filter applied before search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    /// Show every record.
    #[default]
    All,
    /// Show records whose status equals the value.
    Only(S),
}

impl<S: PartialEq> StatusFilter<S> {
    /// Whether a record with `status` passes the filter.
    ///
    /// Records without a status only pass [`StatusFilter::All`].
    pub fn matches(&self, status: Option<&S>) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => status == Some(wanted),
        }
    }
}

impl<S: std::fmt::Display> std::fmt::Display for StatusFilter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}
