// ABOUTME: Listing feeds wiring a controller to infinite scroll, plus the debounced search feed.
// ABOUTME: Popular and search feeds are separate instances with fully independent state.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::controller::{ListingController, PageState, Query};
use crate::debounce::Debouncer;
use crate::source::MovieSource;
use crate::trigger::{InfiniteScroll, ScrollTrigger, VisibilityObserver};

/// A listing with infinite scroll.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    controller: ListingController,
    scroll: InfiniteScroll,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom minimum indicator duration.
    pub fn with_indicator_delay(min_delay: Duration) -> Self {
        Self {
            controller: ListingController::new(),
            scroll: InfiniteScroll::new(ScrollTrigger::new(min_delay)),
        }
    }

    pub fn state(&self) -> &PageState {
        self.controller.state()
    }

    pub fn controller(&self) -> &ListingController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ListingController {
        &mut self.controller
    }

    pub fn scroll(&self) -> &InfiniteScroll {
        &self.scroll
    }

    /// Loads page 1 of `query`.
    pub async fn load<S: MovieSource>(&mut self, source: &S, query: Query) {
        self.controller.fetch_first_page(source, query).await;
    }

    /// Inline retry: re-issues the first page of the current query.
    pub async fn retry<S: MovieSource>(&mut self, source: &S) -> bool {
        self.controller.retry(source).await
    }

    /// Feeds a scroll observation; may fetch and append the next page.
    pub async fn on_scroll<S, V>(&mut self, source: &S, observer: &V) -> bool
    where
        S: MovieSource,
        V: VisibilityObserver + ?Sized,
    {
        self.scroll
            .on_scroll(&mut self.controller, source, observer)
            .await
    }

    /// Explicit "load more": may fire even if the sentinel never left the viewport.
    pub async fn load_more<S, V>(&mut self, source: &S, observer: &V) -> bool
    where
        S: MovieSource,
        V: VisibilityObserver + ?Sized,
    {
        self.scroll.rearm();
        self.on_scroll(source, observer).await
    }

    pub fn clear(&mut self) {
        self.controller.reset();
    }
}

/// Search listing driven by debounced input.
#[derive(Debug, Clone, Default)]
pub struct SearchFeed {
    feed: Feed,
    debouncer: Debouncer,
}

impl SearchFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(feed: Feed, debouncer: Debouncer) -> Self {
        Self { feed, debouncer }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut Feed {
        &mut self.feed
    }

    pub fn state(&self) -> &PageState {
        self.feed.state()
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Raw keystroke input.
    pub fn input(&mut self, raw: impl Into<String>, now: Instant) {
        self.debouncer.input(raw, now);
    }

    /// True while typed input has not yet become the effective query.
    pub fn is_searching(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Applies a settled effective value, if one is due at `now`.
    /// Returns true when a new effective value was applied.
    pub async fn tick<S: MovieSource>(&mut self, source: &S, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(value) => {
                self.apply(source, &value).await;
                true
            }
            None => false,
        }
    }

    /// Waits for pending input to settle, then applies it.
    pub async fn settle<S: MovieSource>(&mut self, source: &S) -> bool {
        match self.debouncer.settled().await {
            Some(value) => {
                self.apply(source, &value).await;
                true
            }
            None => false,
        }
    }

    async fn apply<S: MovieSource>(&mut self, source: &S, value: &str) {
        match Query::search(value) {
            Ok(query) => self.feed.load(source, query).await,
            Err(_) => {
                debug!("search input cleared; resetting listing");
                self.feed.clear();
            }
        }
    }
}
