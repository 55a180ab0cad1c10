//! The list controller state machine.
//!
//! ```text
//! Idle ──initialize──▶ Loading ──ok──▶ Loaded ─┐
//!                         │                    │ refresh
//!                         ├──err──▶ Errored ───┤
//!                         │                    ▼
//!                         └─401──▶ SignedOut  Loading
//! ```
//!
//! Once `SignedOut`, [`ListController::refresh`] answers `Unauthenticated`
//! without calling the source again.

use std::num::NonZeroUsize;

use tracing::{debug, info, instrument, warn};

use super::page::{PAGE_SIZE, PageWindow, total_pages};
use super::search::SearchPattern;
use super::source::ListSource;
use super::StatusFilter;
use crate::gateway::GatewayError;
use crate::resources::Resource;

/// Remote-data lifecycle of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed with this message.
    Errored(String),
    /// The server rejected the session; the screen must go to login.
    SignedOut,
}

/// What happens to the current page when a fetch replaces the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageRetention {
    /// Go back to page 1.
    #[default]
    ResetOnChange,
    /// Stay on the current page unless it no longer exists, then clamp.
    KeepInRange,
}

/// Identifies one fetch so late results can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    generation: u64,
}

/// Whether [`ListController::apply`] used a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result belonged to the latest fetch and was applied.
    Applied,
    /// A newer fetch was started since; the result was dropped.
    Stale,
}

/// Fetch/filter/search/paginate state for one list screen.
///
/// `R` is the record type; `S` supplies the records (normally the
/// [`Gateway`](crate::gateway::Gateway)).
pub struct ListController<R: Resource, S> {
    source: S,
    items: Vec<R>,
    state: LoadState,
    status_filter: StatusFilter<R::Status>,
    search_query: String,
    search: SearchPattern,
    current_page: usize,
    page_size: NonZeroUsize,
    retention: PageRetention,
    generation: u64,
}

impl<R: Resource, S> std::fmt::Debug for ListController<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("resource", &R::NAME)
            .field("items", &self.items.len())
            .field("state", &self.state)
            .field("status_filter", &self.status_filter)
            .field("search_query", &self.search_query)
            .field("current_page", &self.current_page)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl<R: Resource, S: ListSource<R>> ListController<R, S> {
    /// An empty controller reading from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            items: Vec::new(),
            state: LoadState::Idle,
            status_filter: StatusFilter::All,
            search_query: String::new(),
            search: SearchPattern::Any,
            current_page: 1,
            page_size: PAGE_SIZE,
            retention: PageRetention::default(),
            generation: 0,
        }
    }

    /// Override the rows per page.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Choose how the page reacts to refreshed items.
    #[must_use]
    pub const fn with_retention(mut self, retention: PageRetention) -> Self {
        self.retention = retention;
        self
    }

    /// The record source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Every fetched record, in server order.
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Whether a fetch is outstanding.
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Message of the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Active status filter.
    pub const fn status_filter(&self) -> StatusFilter<R::Status> {
        self.status_filter
    }

    /// Search query as typed.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Current 1-based page.
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page.
    pub const fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Fetch the collection for a freshly opened screen.
    ///
    /// # Errors
    ///
    /// Returns the source's error; the controller is left `Errored` or
    /// `SignedOut` accordingly.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn initialize(&mut self) -> Result<(), GatewayError> {
        self.state = LoadState::Idle;
        self.load().await
    }

    /// Re-fetch the collection, keeping the filter and search query.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` immediately when the controller is already
    /// signed out, otherwise the source's error.
    #[instrument(skip(self), fields(resource = R::NAME))]
    pub async fn refresh(&mut self) -> Result<(), GatewayError> {
        if self.state == LoadState::SignedOut {
            debug!("Signed out; not refetching");
            return Err(GatewayError::Unauthenticated);
        }
        self.load().await
    }

    async fn load(&mut self) -> Result<(), GatewayError> {
        let ticket = self.begin_fetch();
        let result = self.source.fetch_all().await;
        let status = result.as_ref().map(|_| ()).map_err(Clone::clone);
        self.apply(ticket, result);
        status
    }

    /// Mark a fetch as started and return its ticket.
    ///
    /// For callers that drive the source themselves (e.g. on a spawned task);
    /// hand the result back through [`ListController::apply`].
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Results from any fetch other than the most recently started one are
    /// dropped.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<R>, GatewayError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                resource = R::NAME,
                ticket = ticket.generation,
                latest = self.generation,
                "Dropping stale fetch result"
            );
            return FetchOutcome::Stale;
        }

        match result {
            Ok(items) => {
                info!(resource = R::NAME, count = items.len(), "List loaded");
                self.items = items;
                self.state = LoadState::Loaded;
                self.current_page = match self.retention {
                    PageRetention::ResetOnChange => 1,
                    PageRetention::KeepInRange => self.current_page.clamp(1, self.total_pages()),
                };
            }
            Err(GatewayError::Unauthenticated) => {
                warn!(resource = R::NAME, "Session rejected while loading list");
                self.state = LoadState::SignedOut;
            }
            Err(e) => {
                warn!(resource = R::NAME, error = %e, "List fetch failed");
                self.state =
                    LoadState::Errored(format!("Failed to fetch {}: {}", R::NAME, e.user_message()));
            }
        }
        FetchOutcome::Applied
    }

    /// Change the status filter and go back to page 1.
    pub fn set_status_filter(&mut self, filter: StatusFilter<R::Status>) {
        self.status_filter = filter;
        self.current_page = 1;
    }

    /// Change the search query and go back to page 1.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.search = SearchPattern::compile(&self.search_query);
        self.current_page = 1;
    }

    /// Jump to `page`, clamped into `[1, total_pages]`. Returns the page
    /// actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    /// Advance one page if there is one.
    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_add(1))
    }

    /// Go back one page if there is one.
    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1))
    }

    fn passes(&self, item: &R) -> bool {
        self.status_filter.matches(item.status().as_ref())
            && self.search.matches_any(item.search_fields())
    }

    /// Records passing the status filter and the search query.
    pub fn filtered_items(&self) -> Vec<&R> {
        self.items.iter().filter(|item| self.passes(item)).collect()
    }

    /// Pages needed for the filtered records (at least one).
    pub fn total_pages(&self) -> usize {
        total_pages(
            self.items.iter().filter(|item| self.passes(item)).count(),
            self.page_size,
        )
    }

    /// Records on the current page.
    pub fn page_items(&self) -> Vec<&R> {
        self.view().rows
    }

    /// Everything a screen renders, derived from the current inputs.
    pub fn view(&self) -> ListView<'_, R> {
        let filtered = self.filtered_items();
        let window = PageWindow::new(filtered.len(), self.page_size, self.current_page);
        let filtered_count = filtered.len();
        let rows = filtered
            .get(window.range())
            .map(<[&R]>::to_vec)
            .unwrap_or_default();

        ListView {
            rows,
            page: window.page,
            total_pages: window.total_pages,
            first_row: if window.is_empty() { 0 } else { window.start + 1 },
            last_row: window.end,
            filtered_count,
            total_count: self.items.len(),
            is_loading: self.is_loading(),
            error: self.error(),
            signed_out: self.state == LoadState::SignedOut,
        }
    }
}

/// Snapshot of a list screen.
#[derive(Debug)]
pub struct ListView<'a, R> {
    /// Records on the current page.
    pub rows: Vec<&'a R>,
    /// Current 1-based page.
    pub page: usize,
    /// Total pages.
    pub total_pages: usize,
    /// 1-based position of the first row in the filtered set (0 when empty).
    pub first_row: usize,
    /// 1-based position of the last row in the filtered set.
    pub last_row: usize,
    /// Records passing filter and search.
    pub filtered_count: usize,
    /// Records fetched.
    pub total_count: usize,
    /// A fetch is outstanding.
    pub is_loading: bool,
    /// Message of the last failed fetch.
    pub error: Option<&'a str>,
    /// The session was rejected; the admin must sign in again.
    pub signed_out: bool,
}

impl<R> ListView<'_, R> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Deserialize;
    use utpfund_core::RequestStatus;

    use super::*;
    use crate::actions::NoActions;

    #[derive(Debug, Clone, Deserialize)]
    struct Row {
        name: String,
        email: String,
        status: RequestStatus,
    }

    impl Resource for Row {
        type Status = RequestStatus;
        type Action = NoActions;

        const NAME: &'static str = "rows";
        const LIST_PATH: &'static str = "admin/rows";
        const COLLECTION_KEY: &'static str = "rows";
        const STATUS_VALUES: &'static [RequestStatus] = RequestStatus::ALL;

        fn status(&self) -> Option<RequestStatus> {
            Some(self.status)
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str(), self.email.as_str()]
        }
    }

    fn row(name: &str, status: RequestStatus) -> Row {
        Row {
            name: name.to_string(),
            email: format!("{}@utpfund.live", name.to_lowercase().replace(' ', ".")),
            status,
        }
    }

    fn numbered(count: usize) -> Vec<Row> {
        (1..=count)
            .map(|i| row(&format!("User {i}"), RequestStatus::Pending))
            .collect()
    }

    #[derive(Default)]
    struct FakeSource {
        responses: Mutex<VecDeque<Result<Vec<Row>, GatewayError>>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with(responses: Vec<Result<Vec<Row>, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ListSource<Row> for FakeSource {
        async fn fetch_all(&self) -> Result<Vec<Row>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    async fn loaded(items: Vec<Row>) -> ListController<Row, FakeSource> {
        let mut controller = ListController::new(FakeSource::with(vec![Ok(items)]));
        controller.initialize().await.unwrap();
        controller
    }

    fn names(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_new_controller_is_idle_and_empty() {
        let controller: ListController<Row, FakeSource> =
            ListController::new(FakeSource::default());
        assert_eq!(controller.state(), &LoadState::Idle);
        assert_eq!(controller.current_page(), 1);
        assert_eq!(controller.total_pages(), 1);
        assert!(controller.page_items().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_loads_items() {
        let controller = loaded(numbered(3)).await;
        assert_eq!(controller.state(), &LoadState::Loaded);
        assert_eq!(controller.items().len(), 3);
        assert_eq!(controller.source().calls(), 1);
    }

    #[tokio::test]
    async fn test_initialize_failure_sets_error() {
        let mut controller = ListController::new(FakeSource::with(vec![Err(
            GatewayError::RequestFailed("HTTP 500".to_string()),
        )]));
        let err = controller.initialize().await.unwrap_err();
        assert_eq!(err, GatewayError::RequestFailed("HTTP 500".to_string()));
        assert_eq!(controller.error(), Some("Failed to fetch rows: HTTP 500"));
        assert!(!controller.is_loading());
        assert!(controller.view().error.is_some());
    }

    #[tokio::test]
    async fn test_pending_filter_fits_one_page() {
        // 23 requests, 7 pending
        let items: Vec<Row> = (1..=23)
            .map(|i| {
                let status = if i % 3 == 0 {
                    RequestStatus::Pending
                } else {
                    RequestStatus::Approved
                };
                row(&format!("User {i}"), status)
            })
            .collect();
        let mut controller = loaded(items).await;

        controller.set_status_filter(StatusFilter::Only(RequestStatus::Pending));

        let view = controller.view();
        assert_eq!(view.filtered_count, 7);
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.rows.len(), 7);
        assert_eq!((view.first_row, view.last_row), (1, 7));
        assert!(
            view.rows
                .iter()
                .all(|r| r.status == RequestStatus::Pending)
        );
    }

    #[tokio::test]
    async fn test_set_page_clamps_to_last_page() {
        let mut controller = loaded(numbered(25)).await;
        assert_eq!(controller.total_pages(), 3);

        assert_eq!(controller.set_page(4), 3);
        let rows = controller.page_items();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "User 21");
        assert_eq!(rows[4].name, "User 25");

        assert_eq!(controller.set_page(0), 1);
    }

    #[tokio::test]
    async fn test_next_and_previous_stop_at_bounds() {
        let mut controller = loaded(numbered(25)).await;
        assert_eq!(controller.previous_page(), 1);
        assert_eq!(controller.next_page(), 2);
        assert_eq!(controller.next_page(), 3);
        assert_eq!(controller.next_page(), 3);
        let view = controller.view();
        assert!(view.has_previous());
        assert!(!view.has_next());
    }

    #[tokio::test]
    async fn test_filter_and_search_reset_page() {
        let mut controller = loaded(numbered(25)).await;
        controller.set_page(3);
        controller.set_search_query("user");
        assert_eq!(controller.current_page(), 1);

        controller.set_page(2);
        controller.set_status_filter(StatusFilter::All);
        assert_eq!(controller.current_page(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let mut controller = loaded(vec![
            row("John Smith", RequestStatus::Pending),
            row("Johnny Appleseed", RequestStatus::Approved),
            row("Jane Doe", RequestStatus::Pending),
        ])
        .await;

        controller.set_search_query("john");
        assert_eq!(
            names(&controller.filtered_items()),
            ["John Smith", "Johnny Appleseed"]
        );
    }

    #[tokio::test]
    async fn test_search_matches_email() {
        let mut controller = loaded(vec![
            row("John Smith", RequestStatus::Pending),
            row("Jane Doe", RequestStatus::Pending),
        ])
        .await;

        controller.set_search_query("JANE.DOE@");
        assert_eq!(names(&controller.filtered_items()), ["Jane Doe"]);
    }

    #[tokio::test]
    async fn test_invalid_search_pattern_does_not_fail() {
        let mut controller = loaded(vec![
            row("Ops (night)", RequestStatus::Pending),
            row("Ops day", RequestStatus::Pending),
        ])
        .await;

        controller.set_search_query("(night");
        assert_eq!(names(&controller.filtered_items()), ["Ops (night)"]);
    }

    #[tokio::test]
    async fn test_empty_and_unmatched_search() {
        let mut controller = loaded(numbered(12)).await;

        controller.set_search_query("");
        assert_eq!(controller.filtered_items().len(), 12);

        controller.set_search_query("zzz-no-match");
        let view = controller.view();
        assert_eq!(view.filtered_count, 0);
        assert_eq!(view.total_pages, 1);
        assert!(view.rows.is_empty());
        assert_eq!(view.first_row, 0);
    }

    #[tokio::test]
    async fn test_filter_is_idempotent() {
        let mut controller = loaded(vec![
            row("A", RequestStatus::Pending),
            row("B", RequestStatus::Rejected),
            row("C", RequestStatus::Pending),
        ])
        .await;

        controller.set_status_filter(StatusFilter::Only(RequestStatus::Pending));
        let once = names(&controller.filtered_items());
        controller.set_status_filter(StatusFilter::Only(RequestStatus::Pending));
        assert_eq!(names(&controller.filtered_items()), once);
        assert_eq!(once, ["A", "C"]);
    }

    #[tokio::test]
    async fn test_pages_reconstruct_filtered_items() {
        let mut controller = loaded(numbered(37)).await;
        controller.set_search_query("1");

        let filtered = names(&controller.filtered_items());
        let mut seen = Vec::new();
        for page in 1..=controller.total_pages() {
            controller.set_page(page);
            seen.extend(names(&controller.page_items()));
        }
        assert_eq!(seen, filtered);
    }

    #[tokio::test]
    async fn test_refresh_keeps_filter_and_resets_page() {
        let source = FakeSource::with(vec![Ok(numbered(30)), Ok(numbered(30))]);
        let mut controller = ListController::new(source);
        controller.initialize().await.unwrap();
        controller.set_search_query("user");
        controller.set_page(3);

        controller.refresh().await.unwrap();
        assert_eq!(controller.search_query(), "user");
        assert_eq!(controller.current_page(), 1);
        assert_eq!(controller.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_keep_in_range_retention() {
        let source = FakeSource::with(vec![Ok(numbered(30)), Ok(numbered(30)), Ok(numbered(12))]);
        let mut controller =
            ListController::new(source).with_retention(PageRetention::KeepInRange);
        controller.initialize().await.unwrap();
        controller.set_page(3);

        controller.refresh().await.unwrap();
        assert_eq!(controller.current_page(), 3);

        controller.refresh().await.unwrap();
        assert_eq!(controller.current_page(), 2);
    }

    #[tokio::test]
    async fn test_custom_page_size() {
        let source = FakeSource::with(vec![Ok(numbered(12))]);
        let mut controller =
            ListController::new(source).with_page_size(NonZeroUsize::new(5).unwrap());
        controller.initialize().await.unwrap();
        assert_eq!(controller.total_pages(), 3);
        assert_eq!(controller.page_size().get(), 5);
    }

    #[tokio::test]
    async fn test_unauthenticated_stops_further_fetches() {
        let source = FakeSource::with(vec![Ok(numbered(3)), Err(GatewayError::Unauthenticated)]);
        let mut controller = ListController::new(source);
        controller.initialize().await.unwrap();

        assert_eq!(
            controller.refresh().await,
            Err(GatewayError::Unauthenticated)
        );
        assert_eq!(controller.state(), &LoadState::SignedOut);
        assert!(controller.view().signed_out);

        assert_eq!(
            controller.refresh().await,
            Err(GatewayError::Unauthenticated)
        );
        assert_eq!(controller.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_results_are_dropped() {
        let mut controller = loaded(numbered(2)).await;

        let first = controller.begin_fetch();
        let second = controller.begin_fetch();
        assert!(controller.is_loading());

        assert_eq!(
            controller.apply(second, Ok(numbered(5))),
            FetchOutcome::Applied
        );
        assert_eq!(
            controller.apply(first, Ok(numbered(1))),
            FetchOutcome::Stale
        );
        assert_eq!(controller.items().len(), 5);
        assert_eq!(controller.state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_items() {
        let source = FakeSource::with(vec![
            Ok(numbered(4)),
            Err(GatewayError::RequestFailed("timeout".to_string())),
        ]);
        let mut controller = ListController::new(source);
        controller.initialize().await.unwrap();

        assert!(controller.refresh().await.is_err());
        assert_eq!(controller.items().len(), 4);
        assert!(controller.error().is_some());
    }
}
