// ABOUTME: Paginated fetch state machine shared by the popular and search listings.
// ABOUTME: Tracks accumulated items, page counters and load/error state; fences stale responses by generation.

use std::fmt;

use tracing::{debug, warn};

use crate::error::FetchError;
use crate::models::{Item, MoviePage};
use crate::source::MovieSource;

/// A trimmed, non-empty search term. Only obtainable through [`SearchTerm::new`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Trims `raw`; fails with a validation error when nothing is left to search for.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, FetchError> {
        let term = raw.as_ref().trim();
        if term.is_empty() {
            return Err(FetchError::validation("search query must not be empty"));
        }
        Ok(SearchTerm(term.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a listing shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Popular,
    Search(SearchTerm),
}

impl Query {
    /// Builds a search query from raw input. See [`SearchTerm::new`].
    pub fn search(term: impl AsRef<str>) -> Result<Self, FetchError> {
        SearchTerm::new(term).map(Query::Search)
    }

    /// The search term, if this is a search.
    pub fn term(&self) -> Option<&str> {
        match self {
            Query::Popular => None,
            Query::Search(term) => Some(term.as_str()),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Popular => write!(f, "popular"),
            Query::Search(term) => write!(f, "search \"{}\"", term),
        }
    }
}

/// Whether a response replaces or extends the accumulated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    Replace,
    Append,
}

/// A fetch issued by the controller, to be answered through [`ListingController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: Query,
    pub page: u32,
    pub mode: FetchMode,
    /// Generation of the first-page fetch this request belongs to.
    pub generation: u64,
}

impl PageRequest {
    /// Sends the request to `source`.
    pub async fn send<S: MovieSource>(&self, source: &S) -> Result<MoviePage, FetchError> {
        match &self.query {
            Query::Popular => source.popular(self.page).await,
            Query::Search(term) => source.search(term.as_str(), self.page).await,
        }
    }
}

/// Accumulated results and pagination state of one listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub items: Vec<Item>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub loading: bool,
    pub error: Option<String>,
}

impl PageState {
    /// True while more pages remain after the last one that landed.
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// True once a page landed and it was the last one.
    pub fn is_exhausted(&self) -> bool {
        self.current_page > 0 && !self.has_more()
    }
}

/// Lifecycle of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading { page: u32 },
    Success { page: u32 },
    Failure { error: String },
}

/// Paginated fetch controller. One instance per listing; instances never share state.
#[derive(Debug, Clone)]
pub struct ListingController {
    state: PageState,
    phase: Phase,
    query: Option<Query>,
    generation: u64,
}

impl Default for ListingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingController {
    pub fn new() -> Self {
        Self {
            state: PageState::default(),
            phase: Phase::Idle,
            query: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// Starts over for `query`: items are emptied and page 1 is requested.
    ///
    /// Always permitted. Any request still in flight becomes stale.
    pub fn begin_first_page(&mut self, query: Query) -> PageRequest {
        self.generation += 1;
        debug!(%query, generation = self.generation, "fetching first page");
        self.query = Some(query.clone());
        self.state = PageState {
            loading: true,
            ..PageState::default()
        };
        self.phase = Phase::Loading { page: 1 };
        PageRequest {
            query,
            page: 1,
            mode: FetchMode::Replace,
            generation: self.generation,
        }
    }

    /// Requests the page after the last one that landed.
    ///
    /// Returns None, leaving state untouched, while a fetch is in flight,
    /// before any first page has landed, or once every page is loaded.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.state.loading {
            debug!("next page skipped: fetch in flight");
            return None;
        }
        let query = self.query.clone()?;
        if self.state.current_page == 0 || !self.state.has_more() {
            return None;
        }
        let page = self.state.current_page + 1;
        debug!(%query, page, "fetching next page");
        self.state.loading = true;
        self.phase = Phase::Loading { page };
        Some(PageRequest {
            query,
            page,
            mode: FetchMode::Append,
            generation: self.generation,
        })
    }

    /// Applies the outcome of `request`. Returns false if the response was discarded as stale.
    pub fn complete(
        &mut self,
        request: &PageRequest,
        outcome: Result<MoviePage, FetchError>,
    ) -> bool {
        if request.generation != self.generation || !self.state.loading {
            warn!(
                query = %request.query,
                page = request.page,
                generation = request.generation,
                current = self.generation,
                "discarding stale page response"
            );
            return false;
        }

        self.state.loading = false;
        match outcome {
            Ok(page) => {
                let landed = if page.page == 0 { request.page } else { page.page };
                let count = page.results.len();
                match request.mode {
                    FetchMode::Replace => self.state.items = page.results,
                    FetchMode::Append => self.state.items.extend(page.results),
                }
                self.state.current_page = landed;
                // Keep current_page <= total_pages even if upstream under-reports
                self.state.total_pages = page.total_pages.max(landed);
                self.state.total_results = page.total_results;
                self.state.error = None;
                self.phase = Phase::Success { page: landed };
                debug!(
                    page = landed,
                    total_pages = self.state.total_pages,
                    received = count,
                    "page landed"
                );
            }
            Err(err) => {
                let message = err.to_string();
                if request.mode == FetchMode::Replace {
                    self.state.items.clear();
                }
                warn!(query = %request.query, page = request.page, error = %message, "page fetch failed");
                self.state.error = Some(message.clone());
                self.phase = Phase::Failure { error: message };
            }
        }
        true
    }

    /// Returns to the initial empty state and forgets the query.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.query = None;
        self.state = PageState::default();
        self.phase = Phase::Idle;
    }

    /// Fetches page 1 of `query`, replacing everything accumulated so far.
    pub async fn fetch_first_page<S: MovieSource>(&mut self, source: &S, query: Query) {
        let request = self.begin_first_page(query);
        let outcome = request.send(source).await;
        self.complete(&request, outcome);
    }

    /// Fetches and appends the next page. Returns false without contacting
    /// `source` when [`begin_next_page`](Self::begin_next_page) declines.
    pub async fn fetch_next_page<S: MovieSource>(&mut self, source: &S) -> bool {
        let Some(request) = self.begin_next_page() else {
            return false;
        };
        let outcome = request.send(source).await;
        self.complete(&request, outcome)
    }

    /// Re-issues the first-page fetch for the current query.
    pub async fn retry<S: MovieSource>(&mut self, source: &S) -> bool {
        let Some(query) = self.query.clone() else {
            return false;
        };
        self.fetch_first_page(source, query).await;
        true
    }
}
