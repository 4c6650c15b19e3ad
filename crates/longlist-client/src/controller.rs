//! Infinite-scroll pagination state machine.
//!
//! The controller decides when to fetch and what to do with what comes
//! back. It performs no I/O: every transition that needs the network
//! returns a [`FetchRequest`], and the caller reports the outcome through
//! [`ScrollController::response_arrived`] or
//! [`ScrollController::request_failed`].
//!
//! Each request carries a [`Ticket`]. Only the most recently issued ticket
//! is accepted; anything older (a page for a search the user already
//! replaced, a page that lost a race with a reload) is discarded on
//! arrival. No request is ever cancelled.

use longlist_core::Page;
use tracing::{debug, trace};

use crate::rows::RenderMode;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Default distance from the bottom that triggers the next page.
pub const DEFAULT_NEAR_BOTTOM_MARGIN: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
}

/// Identity of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A page fetch the caller should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: Ticket,
    pub search: String,
    pub offset: u64,
    pub limit: u64,
    /// True when the result replaces the rendered list.
    pub reset: bool,
}

/// Scroll position of the list viewport, in whatever unit the UI draws in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top.
    pub offset: u64,
    /// Height of the visible area.
    pub viewport: u64,
    /// Height of all rendered content.
    pub content: u64,
}

impl ScrollMetrics {
    #[must_use]
    pub const fn is_near_bottom(self, margin: u64) -> bool {
        self.offset.saturating_add(self.viewport) >= self.content.saturating_sub(margin)
    }
}

/// What the caller should do with a page that arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseAction {
    /// Stale; do nothing.
    Discarded,
    /// The result set ran out. Show the empty marker if asked.
    Exhausted { show_empty_marker: bool },
    /// Render the items with this mode.
    Render { mode: RenderMode },
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    ticket: Ticket,
    reset: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollController {
    phase: Phase,
    exhausted: bool,
    cursor: u64,
    page_size: u64,
    margin: u64,
    search: String,
    next_ticket: u64,
    in_flight: Option<InFlight>,
    total: Option<u64>,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_NEAR_BOTTOM_MARGIN)
    }
}

impl ScrollController {
    #[must_use]
    pub fn new(page_size: u64, margin: u64) -> Self {
        Self {
            phase: Phase::Idle,
            exhausted: false,
            cursor: 0,
            page_size: page_size.max(1),
            margin,
            search: String::new(),
            next_ticket: 0,
            in_flight: None,
            total: None,
        }
    }

    /// Start over with a new search term: cursor back to zero, exhaustion
    /// cleared, and page 0 requested as a reset fetch.
    ///
    /// The caller is expected to clear its rendered list.
    pub fn search_changed(&mut self, search: impl Into<String>) -> FetchRequest {
        self.search = search.into();
        self.cursor = 0;
        self.exhausted = false;
        self.total = None;
        debug!(search = %self.search, "search changed");
        self.issue(true)
    }

    /// Re-run the current search from the top.
    pub fn reload(&mut self) -> FetchRequest {
        let search = std::mem::take(&mut self.search);
        self.search_changed(search)
    }

    /// React to a scroll. Fetches the next page only when idle, not
    /// exhausted, and within the margin of the bottom.
    pub fn scrolled(&mut self, metrics: ScrollMetrics) -> Option<FetchRequest> {
        if self.phase != Phase::Idle || self.exhausted {
            trace!(phase = ?self.phase, exhausted = self.exhausted, "scroll ignored");
            return None;
        }
        if !metrics.is_near_bottom(self.margin) {
            return None;
        }
        Some(self.issue(false))
    }

    /// Feed back the page for `ticket`.
    pub fn response_arrived(&mut self, ticket: Ticket, page: &Page) -> ResponseAction {
        let Some(in_flight) = self.in_flight.filter(|f| f.ticket == ticket) else {
            debug!(?ticket, "discarding stale page");
            return ResponseAction::Discarded;
        };
        self.in_flight = None;
        self.phase = Phase::Idle;
        self.total = Some(page.total);

        if page.items.is_empty() {
            self.exhausted = true;
            return ResponseAction::Exhausted {
                show_empty_marker: in_flight.reset,
            };
        }

        self.cursor += 1;
        let mode = if in_flight.reset {
            RenderMode::Reset
        } else {
            RenderMode::Append
        };
        ResponseAction::Render { mode }
    }

    /// The fetch for `ticket` failed. The loading flag is cleared and the
    /// rendered list is left as it is. Returns false for stale tickets.
    pub fn request_failed(&mut self, ticket: Ticket) -> bool {
        if self.in_flight.is_some_and(|f| f.ticket == ticket) {
            self.in_flight = None;
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    fn issue(&mut self, reset: bool) -> FetchRequest {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight = Some(InFlight { ticket, reset });
        self.phase = Phase::Loading;
        FetchRequest {
            ticket,
            search: self.search.clone(),
            offset: self.cursor * self.page_size,
            limit: self.page_size,
            reset,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Pages rendered so far for the current search.
    #[must_use]
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filtered total reported by the last accepted page.
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longlist_core::{ItemId, ItemView};

    const BOTTOM: ScrollMetrics = ScrollMetrics {
        offset: 80,
        viewport: 20,
        content: 100,
    };

    fn page(ids: &[u32], total: u64) -> Page {
        Page {
            items: ids.iter().map(|&id| ItemView::new(ItemId(id), false)).collect(),
            total,
        }
    }

    #[test]
    fn search_change_requests_first_page_as_reset() {
        let mut ctl = ScrollController::default();
        let req = ctl.search_changed("42");
        assert_eq!((req.offset, req.limit, req.reset), (0, 20, true));
        assert_eq!(req.search, "42");
        assert_eq!(ctl.phase(), Phase::Loading);
    }

    #[test]
    fn scroll_is_ignored_while_loading() {
        let mut ctl = ScrollController::default();
        ctl.search_changed("");
        assert_eq!(ctl.scrolled(BOTTOM), None);
    }

    #[test]
    fn scroll_far_from_bottom_is_ignored() {
        let mut ctl = ScrollController::default();
        let req = ctl.search_changed("");
        ctl.response_arrived(req.ticket, &page(&[1, 2], 100));
        let top = ScrollMetrics {
            offset: 0,
            viewport: 20,
            content: 400,
        };
        assert_eq!(ctl.scrolled(top), None);
    }

    #[test]
    fn next_page_offset_follows_cursor() {
        let mut ctl = ScrollController::new(20, 20);
        let first = ctl.search_changed("");
        assert_eq!(
            ctl.response_arrived(first.ticket, &page(&[1], 100)),
            ResponseAction::Render {
                mode: RenderMode::Reset
            }
        );

        let second = ctl.scrolled(BOTTOM).unwrap();
        assert_eq!((second.offset, second.reset), (20, false));
        assert_eq!(
            ctl.response_arrived(second.ticket, &page(&[21], 100)),
            ResponseAction::Render {
                mode: RenderMode::Append
            }
        );
        assert_eq!(ctl.scrolled(BOTTOM).unwrap().offset, 40);
    }

    #[test]
    fn empty_reset_page_shows_marker_and_exhausts() {
        let mut ctl = ScrollController::default();
        let req = ctl.search_changed("zzz");
        assert_eq!(
            ctl.response_arrived(req.ticket, &Page::empty(0)),
            ResponseAction::Exhausted {
                show_empty_marker: true
            }
        );
        assert!(ctl.is_exhausted());
        assert_eq!(ctl.scrolled(BOTTOM), None);
    }

    #[test]
    fn empty_append_page_exhausts_without_marker() {
        let mut ctl = ScrollController::default();
        let first = ctl.search_changed("");
        ctl.response_arrived(first.ticket, &page(&[1], 1));
        let next = ctl.scrolled(BOTTOM).unwrap();
        assert_eq!(
            ctl.response_arrived(next.ticket, &Page::empty(1)),
            ResponseAction::Exhausted {
                show_empty_marker: false
            }
        );
    }

    #[test]
    fn page_for_replaced_search_is_discarded() {
        let mut ctl = ScrollController::default();
        let old = ctl.search_changed("4");
        let new = ctl.search_changed("42");
        assert_eq!(
            ctl.response_arrived(old.ticket, &page(&[4], 1)),
            ResponseAction::Discarded
        );
        assert_eq!(ctl.phase(), Phase::Loading);
        assert!(matches!(
            ctl.response_arrived(new.ticket, &page(&[42], 1)),
            ResponseAction::Render { .. }
        ));
    }

    #[test]
    fn search_change_clears_exhaustion() {
        let mut ctl = ScrollController::default();
        let req = ctl.search_changed("zzz");
        ctl.response_arrived(req.ticket, &Page::empty(0));
        ctl.search_changed("1");
        assert!(!ctl.is_exhausted());
        assert_eq!(ctl.cursor(), 0);
    }

    #[test]
    fn failure_returns_to_idle_and_keeps_cursor() {
        let mut ctl = ScrollController::default();
        let first = ctl.search_changed("");
        ctl.response_arrived(first.ticket, &page(&[1], 50));
        let next = ctl.scrolled(BOTTOM).unwrap();

        assert!(ctl.request_failed(next.ticket));
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.cursor(), 1);
        assert!(!ctl.request_failed(next.ticket));
    }

    #[test]
    fn reload_reuses_current_search() {
        let mut ctl = ScrollController::default();
        ctl.search_changed("Item 7");
        let req = ctl.reload();
        assert_eq!(req.search, "Item 7");
        assert!(req.reset);
    }

    #[test]
    fn near_bottom_uses_margin() {
        let metrics = ScrollMetrics {
            offset: 60,
            viewport: 20,
            content: 100,
        };
        assert!(metrics.is_near_bottom(20));
        assert!(!metrics.is_near_bottom(19));
    }
}
