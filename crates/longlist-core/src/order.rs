//! User-defined ordering of the universe.

use fixedbitset::FixedBitSet;
use serde::{Serialize, Serializer};

use crate::model::ItemId;
use crate::universe::Universe;

/// What [`CustomOrder::from_ids`] had to discard to keep the order well-formed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderNormalization {
    /// Repeated ids; only the first occurrence is kept.
    pub duplicates: usize,
    /// Ids that are not part of the universe.
    pub out_of_range: usize,
}

impl OrderNormalization {
    #[must_use]
    pub const fn is_clean(self) -> bool {
        self.duplicates == 0 && self.out_of_range == 0
    }
}

/// An ordered sequence of distinct ids from one universe.
///
/// A full order covers every id exactly once. Orders supplied by clients may
/// be partial; ids they leave out sort after the listed ones in ascending id
/// order (see [`CustomOrder::sequence`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomOrder {
    ids: Vec<ItemId>,
    present: FixedBitSet,
}

impl CustomOrder {
    /// Build an order, dropping duplicates and ids outside `universe`.
    #[must_use]
    pub fn from_ids(
        raw: impl IntoIterator<Item = ItemId>,
        universe: Universe,
    ) -> (Self, OrderNormalization) {
        let mut present = FixedBitSet::with_capacity(universe.size() as usize + 1);
        let mut ids = Vec::new();
        let mut report = OrderNormalization::default();

        for id in raw {
            if !universe.contains(id) {
                report.out_of_range += 1;
                continue;
            }
            if present.put(id.0 as usize) {
                report.duplicates += 1;
                continue;
            }
            ids.push(id);
        }

        (Self { ids, present }, report)
    }

    /// The ascending order `1..=N`, materialized.
    ///
    /// This allocates one entry per id; callers that only need to read the
    /// natural order should walk [`Universe::ids`] instead.
    #[must_use]
    pub fn natural(universe: Universe) -> Self {
        let mut present = FixedBitSet::with_capacity(universe.size() as usize + 1);
        present.insert_range(1..);
        Self {
            ids: universe.ids().collect(),
            present,
        }
    }

    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.present.contains(id.0 as usize)
    }

    /// Index of `id` in the order, if listed.
    #[must_use]
    pub fn position(&self, id: ItemId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.ids.iter().position(|candidate| *candidate == id)
    }

    /// True when every id of `universe` is listed exactly once.
    #[must_use]
    pub fn is_permutation_of(&self, universe: Universe) -> bool {
        self.ids.len() == universe.size() as usize
            && universe.ids().all(|id| self.contains(id))
    }

    /// Full display sequence: listed ids first, then unlisted ids ascending.
    pub fn sequence(&self, universe: Universe) -> impl Iterator<Item = ItemId> + '_ {
        self.ids
            .iter()
            .copied()
            .chain(universe.ids().filter(move |id| !self.contains(*id)))
    }

    /// Consume the order, returning the listed ids.
    #[must_use]
    pub fn into_ids(self) -> Vec<ItemId> {
        self.ids
    }
}

impl Serialize for CustomOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId).collect()
    }

    #[test]
    fn from_ids_keeps_first_occurrence() {
        let (order, report) = CustomOrder::from_ids(ids(&[3, 1, 3, 2, 1]), Universe::new(5));
        assert_eq!(order.ids(), ids(&[3, 1, 2]).as_slice());
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.out_of_range, 0);
    }

    #[test]
    fn from_ids_drops_out_of_range() {
        let (order, report) = CustomOrder::from_ids(ids(&[0, 2, 9]), Universe::new(5));
        assert_eq!(order.ids(), ids(&[2]).as_slice());
        assert_eq!(report.out_of_range, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn natural_is_a_permutation() {
        let universe = Universe::new(6);
        let order = CustomOrder::natural(universe);
        assert_eq!(order.ids(), ids(&[1, 2, 3, 4, 5, 6]).as_slice());
        assert!(order.is_permutation_of(universe));
        assert!(!order.contains(ItemId(0)));
        assert!(!order.contains(ItemId(7)));
    }

    #[test]
    fn position_reports_index_or_none() {
        let (order, _) = CustomOrder::from_ids(ids(&[4, 2]), Universe::new(5));
        assert_eq!(order.position(ItemId(2)), Some(1));
        assert_eq!(order.position(ItemId(5)), None);
    }

    #[test]
    fn sequence_appends_unlisted_ids_ascending() {
        let universe = Universe::new(6);
        let (order, _) = CustomOrder::from_ids(ids(&[5, 2]), universe);
        let seq: Vec<_> = order.sequence(universe).collect();
        assert_eq!(seq, ids(&[5, 2, 1, 3, 4, 6]));
    }

    #[test]
    fn partial_order_is_not_a_permutation() {
        let universe = Universe::new(3);
        let (order, _) = CustomOrder::from_ids(ids(&[1, 2]), universe);
        assert!(!order.is_permutation_of(universe));
    }

    #[test]
    fn serializes_as_plain_array() {
        let (order, _) = CustomOrder::from_ids(ids(&[3, 1, 2]), Universe::new(3));
        assert_eq!(serde_json::to_string(&order).unwrap(), "[3,1,2]");
    }
}
