// ABOUTME: Infinite-scroll trigger: fires a next-page fetch when the end-of-list sentinel becomes visible.
// ABOUTME: Includes the minimum-duration loading indicator and a row-based viewport visibility observer.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::controller::{ListingController, PageState};
use crate::source::MovieSource;

/// The loading indicator stays up at least this long to avoid flicker.
pub const MIN_INDICATOR_DELAY: Duration = Duration::from_millis(600);

/// Rows past the bottom of the viewport at which the sentinel already counts as visible.
pub const DEFAULT_LOOKAHEAD: usize = 3;

/// Reports whether the end-of-list sentinel is within view.
pub trait VisibilityObserver {
    fn sentinel_visible(&self) -> bool;
}

impl VisibilityObserver for bool {
    fn sentinel_visible(&self) -> bool {
        *self
    }
}

/// A scroll window over a list of `len` rows. The sentinel sits at row `len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
    pub len: usize,
    pub lookahead: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            offset: 0,
            height,
            len: 0,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Updates the number of rendered rows, keeping the offset in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.offset = self.offset.min(len.saturating_sub(self.height));
    }

    pub fn scroll_by(&mut self, rows: isize) {
        let max = self.len.saturating_sub(self.height);
        self.offset = self.offset.saturating_add_signed(rows).min(max);
    }

    pub fn scroll_to_end(&mut self) {
        self.offset = self.len.saturating_sub(self.height);
    }

    /// Rows currently on screen.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.offset..(self.offset + self.height).min(self.len)
    }
}

impl VisibilityObserver for Viewport {
    fn sentinel_visible(&self) -> bool {
        self.offset + self.height + self.lookahead >= self.len
    }
}

/// Loading indicator shown from the moment a fetch fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingIndicator {
    started: Instant,
    min: Duration,
    hide_at: Option<Instant>,
}

impl LoadingIndicator {
    pub fn start(now: Instant, min: Duration) -> Self {
        Self {
            started: now,
            min,
            hide_at: None,
        }
    }

    /// Records that the fetch settled at `now` and returns how long the
    /// indicator must stay up: `max(0, min - elapsed)`.
    pub fn settle(&mut self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started);
        let remaining = self.min.saturating_sub(elapsed);
        self.hide_at = Some(now + remaining);
        remaining
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        match self.hide_at {
            None => true,
            Some(at) => now < at,
        }
    }
}

/// Sentinel-driven gate deciding when to request the next page.
///
/// Fires at most once per eligibility window. It re-arms when the sentinel
/// leaves the viewport or when new rows are appended, and stops observing
/// once the last page has landed.
#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    armed: bool,
    observing: bool,
    seen_len: usize,
    indicator: Option<LoadingIndicator>,
    min_delay: Duration,
}

impl Default for ScrollTrigger {
    fn default() -> Self {
        Self::new(MIN_INDICATOR_DELAY)
    }
}

impl ScrollTrigger {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            armed: true,
            observing: true,
            seen_len: 0,
            indicator: None,
            min_delay,
        }
    }

    /// Feeds one visibility observation. Returns true when the caller should
    /// fetch the next page now.
    pub fn observe(&mut self, visible: bool, state: &PageState, now: Instant) -> bool {
        if state.is_exhausted() && !state.loading {
            if self.observing {
                debug!(page = state.current_page, "all pages loaded; trigger stops observing");
            }
            self.observing = false;
            self.armed = false;
            return false;
        }
        self.observing = true;

        if state.items.len() != self.seen_len {
            self.seen_len = state.items.len();
            self.armed = true;
        }
        if !visible {
            self.armed = true;
            return false;
        }
        if self.indicator_visible(now) {
            return false;
        }
        if !self.armed || state.loading || state.current_page == 0 || !state.has_more() {
            return false;
        }

        self.armed = false;
        self.indicator = Some(LoadingIndicator::start(now, self.min_delay));
        debug!(next = state.current_page + 1, "sentinel visible; requesting next page");
        true
    }

    /// Marks the fetch as settled and returns the remaining indicator time.
    pub fn settle(&mut self, now: Instant) -> Duration {
        match self.indicator.as_mut() {
            Some(indicator) => indicator.settle(now),
            None => Duration::ZERO,
        }
    }

    /// Drops the indicator once its minimum duration has passed.
    pub fn clear_indicator(&mut self, now: Instant) {
        if !self.indicator_visible(now) {
            self.indicator = None;
        }
    }

    pub fn indicator_visible(&self, now: Instant) -> bool {
        self.indicator.is_some_and(|i| i.is_visible(now))
    }

    /// Opens a new eligibility window, as an explicit "load more" action does.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Couples a [`ScrollTrigger`] with a controller and a source.
#[derive(Debug, Clone, Default)]
pub struct InfiniteScroll {
    trigger: ScrollTrigger,
}

impl InfiniteScroll {
    pub fn new(trigger: ScrollTrigger) -> Self {
        Self { trigger }
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn rearm(&mut self) {
        self.trigger.rearm();
    }

    /// Handles a scroll observation. When the trigger fires, fetches the next
    /// page, then holds the indicator for its remaining minimum duration.
    /// Returns true if a page was applied.
    pub async fn on_scroll<S, V>(
        &mut self,
        controller: &mut ListingController,
        source: &S,
        observer: &V,
    ) -> bool
    where
        S: MovieSource,
        V: VisibilityObserver + ?Sized,
    {
        if !self
            .trigger
            .observe(observer.sentinel_visible(), controller.state(), Instant::now())
        {
            return false;
        }
        let applied = controller.fetch_next_page(source).await;
        let remaining = self.trigger.settle(Instant::now());
        if !remaining.is_zero() {
            sleep(remaining).await;
        }
        self.trigger.clear_indicator(Instant::now());
        applied
    }
}
