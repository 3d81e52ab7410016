// ABOUTME: Debounces raw search input into an effective query value.
// ABOUTME: The quiet-period timer restarts on every change; each settled change is yielded once.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// How long input must stay unchanged before it becomes the effective query.
pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Turns keystroke-level input into rate-limited effective values.
#[derive(Debug, Clone)]
pub struct Debouncer {
    raw: String,
    effective: String,
    deadline: Option<Instant>,
    quiet: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            raw: String::new(),
            effective: String::new(),
            deadline: None,
            quiet,
        }
    }

    /// Records new raw input, restarting the quiet period. A pending timer is superseded.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        if value == self.raw {
            return;
        }
        self.raw = value;
        self.deadline = Some(now + self.quiet);
    }

    /// Yields the new effective value once the quiet period has elapsed,
    /// if it differs from the previous one.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        if self.raw == self.effective {
            return None;
        }
        self.effective = self.raw.clone();
        Some(self.effective.clone())
    }

    /// Waits for the pending timer, then polls. Returns None immediately when idle.
    pub async fn settled(&mut self) -> Option<String> {
        let deadline = self.deadline?;
        sleep_until(deadline).await;
        self.poll(Instant::now())
    }

    /// When the pending timer fires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Spinner hint: raw input is non-empty and not yet effective.
    pub fn is_pending(&self) -> bool {
        self.raw != self.effective && !self.raw.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn rapid_input_settles_once_on_final_value() {
        let mut d = Debouncer::default();
        let t0 = Instant::now();
        for (i, text) in ["s", "su", "sup", "supe", "super"].iter().enumerate() {
            d.input(*text, t0 + ms(i as u64 * 100));
            assert_eq!(d.poll(t0 + ms(i as u64 * 100 + 50)), None);
        }

        assert_eq!(d.poll(t0 + ms(899)), None);
        assert_eq!(d.poll(t0 + ms(900)).as_deref(), Some("super"));
        assert_eq!(d.poll(t0 + ms(2000)), None);
        assert_eq!(d.effective(), "super");
    }

    #[test]
    fn returning_to_effective_value_emits_nothing() {
        let mut d = Debouncer::default();
        let t0 = Instant::now();
        d.input("heat", t0);
        assert_eq!(d.poll(t0 + ms(500)).as_deref(), Some("heat"));

        d.input("heatx", t0 + ms(600));
        d.input("heat", t0 + ms(700));
        assert_eq!(d.poll(t0 + ms(1200)), None);
    }

    #[test]
    fn pending_flag_tracks_unsettled_non_empty_input() {
        let mut d = Debouncer::default();
        let t0 = Instant::now();
        assert!(!d.is_pending());

        d.input("   ", t0);
        assert!(!d.is_pending(), "blank input never shows the spinner");

        d.input("alien", t0);
        assert!(d.is_pending());
        d.poll(t0 + SEARCH_QUIET_PERIOD);
        assert!(!d.is_pending());
    }

    #[test]
    fn identical_input_does_not_restart_timer() {
        let mut d = Debouncer::default();
        let t0 = Instant::now();
        d.input("x", t0);
        d.input("x", t0 + ms(400));
        assert_eq!(d.deadline(), Some(t0 + ms(500)));
    }
}
