//! Quiet-period debouncing for search input.

use std::time::{Duration, Instant};

/// Default quiet period between the last keystroke and the search fetch.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holds the latest input until it has been stable for `quiet`.
///
/// Time is passed in rather than read, so callers (and tests) decide what
/// "now" is.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    last_fired: Option<String>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_fired: None,
        }
    }

    /// Record a keystroke; restarts the quiet window.
    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now));
    }

    /// Return the pending value once the window has elapsed.
    ///
    /// Each pending value fires at most once. A value equal to the last one
    /// fired is swallowed, so typing and deleting a character is free.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) < self.quiet {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if self.last_fired.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_fired = Some(value.clone());
        Some(value)
    }

    /// Mark `value` as already fetched, e.g. by a reload that bypassed the
    /// debouncer.
    pub fn mark_fired(&mut self, value: impl Into<String>) {
        self.last_fired = Some(value.into());
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will be ready, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }
}
