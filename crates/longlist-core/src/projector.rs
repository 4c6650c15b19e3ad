//! Derives paginated, filtered, custom-ordered pages from the universe.
//!
//! The projector never mutates state. Each call recomputes from scratch:
//!
//! 1. walk the display sequence (custom order, then unlisted ids ascending;
//!    or plain ascending ids when no order is set),
//! 2. keep ids whose display value contains the search, case-insensitively,
//! 3. slice `[offset, offset + limit)` while counting every match,
//! 4. mark each returned id as selected or not.
//!
//! An empty search without a custom order is answered by id arithmetic. Every
//! other query is a single lazy O(N) pass over the universe; nothing of size
//! N is allocated.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::model::{ItemId, ItemView, Page, State};
use crate::universe::{SearchMatcher, Universe};

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Search term and pagination window for one projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub offset: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for ItemQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ItemQuery {
    #[must_use]
    pub fn new(search: impl Into<String>, offset: u64, limit: u64) -> Self {
        Self {
            search: search.into(),
            offset,
            limit,
        }
    }

    const fn end(&self) -> u64 {
        self.offset.saturating_add(self.limit)
    }
}

const fn default_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

/// Projects pages out of a fixed universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projector {
    universe: Universe,
}

impl Projector {
    #[must_use]
    pub const fn new(universe: Universe) -> Self {
        Self { universe }
    }

    #[must_use]
    pub const fn universe(&self) -> Universe {
        self.universe
    }

    /// Compute the page described by `query` against `state`.
    ///
    /// `total` is the number of matching ids before pagination. An offset
    /// past the end yields no items with the correct total.
    #[instrument(level = "debug", skip(self, state), fields(search = %query.search, offset = query.offset, limit = query.limit))]
    pub fn project(&self, query: &ItemQuery, state: &State) -> Page {
        let annotate =
            |id: ItemId| ItemView::new(id, state.is_selected(id)).with_note(state.note(id));

        let page = match state.custom_order.as_deref() {
            None if query.search.is_empty() => self.natural_window(query, annotate),
            None => scan(self.universe.ids(), query, annotate),
            Some(order) if query.search.is_empty() => Page {
                items: order
                    .sequence(self.universe)
                    .skip(to_usize(query.offset))
                    .take(to_usize(query.limit))
                    .map(annotate)
                    .collect(),
                total: u64::from(self.universe.size()),
            },
            Some(order) => scan(order.sequence(self.universe), query, annotate),
        };

        tracing::debug!(returned = page.items.len(), total = page.total, "projected page");
        page
    }

    fn natural_window(&self, query: &ItemQuery, annotate: impl Fn(ItemId) -> ItemView) -> Page {
        let size = u64::from(self.universe.size());
        let start = query.offset.saturating_add(1);
        let end = query.end().min(size);

        let items = if start > end {
            Vec::new()
        } else {
            // Both bounds are <= size, which came from a u32.
            #[allow(clippy::cast_possible_truncation)]
            let ids = (start as u32)..=(end as u32);
            ids.map(ItemId).map(annotate).collect()
        };

        Page { items, total: size }
    }
}

/// One pass over `sequence`: count every match, keep those inside the window.
fn scan(
    sequence: impl Iterator<Item = ItemId>,
    query: &ItemQuery,
    annotate: impl Fn(ItemId) -> ItemView,
) -> Page {
    let mut matcher = SearchMatcher::new(&query.search);
    let (offset, end) = (query.offset, query.end());
    let mut items = Vec::with_capacity(to_usize(query.limit).min(1024));
    let mut total = 0_u64;

    for id in sequence {
        if !matcher.matches(id) {
            continue;
        }
        if total >= offset && total < end {
            items.push(annotate(id));
        }
        total += 1;
    }

    Page { items, total }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::CustomOrder;
    use std::sync::Arc;

    fn ids(page: &Page) -> Vec<u32> {
        page.items.iter().map(|item| item.id.get()).collect()
    }

    fn with_order(raw: &[u32], universe: Universe) -> State {
        let (order, _) = CustomOrder::from_ids(raw.iter().copied().map(ItemId), universe);
        State {
            custom_order: Some(Arc::new(order)),
            ..State::default()
        }
    }

    #[test]
    fn first_page_without_search_is_ascending() {
        let projector = Projector::new(Universe::new(100));
        let page = projector.project(&ItemQuery::new("", 0, 5), &State::default());
        assert_eq!(ids(&page), vec![1, 2, 3, 4, 5]);
        assert_eq!(page.total, 100);
        assert_eq!(page.items[0].value, "Item 1");
    }

    #[test]
    fn last_partial_page() {
        let projector = Projector::new(Universe::new(12));
        let page = projector.project(&ItemQuery::new("", 10, 5), &State::default());
        assert_eq!(ids(&page), vec![11, 12]);
        assert_eq!(page.total, 12);
    }

    #[test]
    fn offset_beyond_end_is_empty_with_total() {
        let projector = Projector::new(Universe::new(12));
        let page = projector.project(&ItemQuery::new("", 50, 5), &State::default());
        assert!(page.is_empty());
        assert_eq!(page.total, 12);

        let page = projector.project(&ItemQuery::new("1", 50, 5), &State::default());
        assert!(page.is_empty());
        assert_eq!(page.total, 4);
    }

    #[test]
    fn zero_limit_returns_only_total() {
        let projector = Projector::new(Universe::new(30));
        let page = projector.project(&ItemQuery::new("2", 0, 0), &State::default());
        assert!(page.is_empty());
        assert_eq!(page.total, 12);
    }

    #[test]
    fn huge_offset_does_not_overflow() {
        let projector = Projector::new(Universe::new(10));
        let page = projector.project(&ItemQuery::new("", u64::MAX, u64::MAX), &State::default());
        assert!(page.is_empty());
        assert_eq!(page.total, 10);
    }

    #[test]
    fn no_matches() {
        let projector = Projector::new(Universe::new(1000));
        let page = projector.project(&ItemQuery::new("nothing", 0, 20), &State::default());
        assert_eq!(page, Page::empty(0));
    }

    #[test]
    fn selection_is_annotated() {
        let projector = Projector::new(Universe::new(10));
        let state = State {
            selected_items: [ItemId(2), ItemId(4)].into_iter().collect(),
            ..State::default()
        };
        let page = projector.project(&ItemQuery::new("", 0, 4), &state);
        let flags: Vec<bool> = page.items.iter().map(|item| item.selected).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn custom_order_leads_and_unlisted_follow_ascending() {
        let universe = Universe::new(6);
        let projector = Projector::new(universe);
        let state = with_order(&[6, 3], universe);
        let page = projector.project(&ItemQuery::new("", 0, 10), &state);
        assert_eq!(ids(&page), vec![6, 3, 1, 2, 4, 5]);
        assert_eq!(page.total, 6);
    }

    #[test]
    fn custom_order_with_search_filters_in_order() {
        let universe = Universe::new(30);
        let projector = Projector::new(universe);
        let state = with_order(&[21, 5, 12, 2], universe);
        let page = projector.project(&ItemQuery::new("2", 0, 4), &state);
        assert_eq!(ids(&page), vec![21, 12, 2, 20]);
        assert_eq!(page.total, 12);
    }
}
