//! The virtual item universe `1..=N`.
//!
//! Items are never stored. Every id in range exists, its display value is
//! `Item {id}`, and filtering walks the range lazily so no caller ever holds
//! a container of N entries.

use std::fmt::Write as _;

use crate::model::ItemId;

/// Default universe size served by `longlist serve`.
pub const DEFAULT_UNIVERSE_SIZE: u32 = 1_000_000;

/// The set of ids `1..=size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Universe {
    size: u32,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(DEFAULT_UNIVERSE_SIZE)
    }
}

impl Universe {
    #[must_use]
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    #[must_use]
    pub const fn contains(self, id: ItemId) -> bool {
        id.0 >= 1 && id.0 <= self.size
    }

    /// All ids in ascending order.
    pub fn ids(self) -> impl DoubleEndedIterator<Item = ItemId> + Clone {
        (1..=self.size).map(ItemId)
    }

    /// Ascending ids whose display value contains `search`, case-insensitively.
    ///
    /// The returned iterator is lazy; calling this again restarts the walk.
    pub fn matching(self, search: &str) -> impl Iterator<Item = ItemId> + use<> {
        let mut matcher = SearchMatcher::new(search);
        self.ids().filter(move |id| matcher.matches(*id))
    }

    /// Number of ids whose display value contains `search`.
    #[must_use]
    pub fn count_matching(self, search: &str) -> u64 {
        let matcher = SearchMatcher::new(search);
        if matcher.matches_everything() {
            return u64::from(self.size);
        }
        self.matching(search).count() as u64
    }
}

/// Case-insensitive substring test against derived display values.
///
/// Keeps one scratch buffer so matching a million ids does not allocate a
/// million strings.
#[derive(Debug, Clone)]
pub struct SearchMatcher {
    needle: String,
    scratch: String,
}

impl SearchMatcher {
    #[must_use]
    pub fn new(search: &str) -> Self {
        Self {
            needle: search.to_lowercase(),
            scratch: String::with_capacity(16),
        }
    }

    /// True when the search is empty and every id matches.
    #[must_use]
    pub fn matches_everything(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&mut self, id: ItemId) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.scratch.clear();
        // Display values are ASCII, so lowercasing is just the leading letter.
        let _ = write!(self.scratch, "item {}", id.0);
        self.scratch.contains(self.needle.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_one_based_and_inclusive() {
        let u = Universe::new(5);
        assert!(!u.contains(ItemId(0)));
        assert!(u.contains(ItemId(1)));
        assert!(u.contains(ItemId(5)));
        assert!(!u.contains(ItemId(6)));
    }

    #[test]
    fn empty_search_matches_everything() {
        let u = Universe::new(10);
        assert_eq!(u.count_matching(""), 10);
        assert_eq!(u.matching("").count(), 10);
    }

    #[test]
    fn search_is_case_insensitive() {
        let u = Universe::new(20);
        let upper: Vec<_> = u.matching("ITEM 1").collect();
        let lower: Vec<_> = u.matching("item 1").collect();
        assert_eq!(upper, lower);
        assert_eq!(upper.first(), Some(&ItemId(1)));
        assert!(upper.contains(&ItemId(19)));
        assert!(!upper.contains(&ItemId(2)));
    }

    #[test]
    fn search_matches_inside_the_number() {
        let u = Universe::new(200);
        let hits: Vec<u32> = u.matching("42").map(ItemId::get).collect();
        assert_eq!(hits, vec![42, 142]);
    }

    #[test]
    fn search_spanning_prefix_and_number() {
        let u = Universe::new(100);
        let hits: Vec<u32> = u.matching("m 9").map(ItemId::get).collect();
        assert_eq!(hits, vec![9, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99]);
    }

    #[test]
    fn search_with_no_hits() {
        let u = Universe::new(100);
        assert_eq!(u.count_matching("zebra"), 0);
    }

    #[test]
    fn matching_is_restartable() {
        let u = Universe::new(30);
        let first: Vec<_> = u.matching("2").collect();
        let second: Vec<_> = u.matching("2").collect();
        assert_eq!(first, second);
    }
}
