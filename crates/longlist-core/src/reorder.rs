//! Drag-and-drop reordering of the custom order.

use crate::model::ItemId;
use crate::order::CustomOrder;
use crate::universe::Universe;

/// Result of dropping `source` onto `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The new order, ready to persist.
    Moved(CustomOrder),
    /// Source and target are the same item; nothing to do.
    SameItem,
    /// One of the ids is not in the order; the drop is ignored.
    NotFound {
        source_found: bool,
        target_found: bool,
    },
}

impl ReorderOutcome {
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved(_))
    }
}

/// Move `source` to the position `target` occupied.
///
/// With no current order the ascending `1..=N` sequence is materialized
/// first, which costs one entry per id. The source is removed and then
/// reinserted at the target's original index, so dragging downwards lands
/// the source just after the target and dragging upwards lands it just
/// before.
#[must_use]
pub fn compute_reorder(
    order: Option<&CustomOrder>,
    universe: Universe,
    source: ItemId,
    target: ItemId,
) -> ReorderOutcome {
    if source == target {
        return ReorderOutcome::SameItem;
    }

    let base = order.map_or_else(|| CustomOrder::natural(universe), Clone::clone);
    let (Some(from), Some(to)) = (base.position(source), base.position(target)) else {
        return ReorderOutcome::NotFound {
            source_found: base.contains(source),
            target_found: base.contains(target),
        };
    };

    let mut ids = base.into_ids();
    let moved = ids.remove(from);
    ids.insert(to, moved);

    let (reordered, _) = CustomOrder::from_ids(ids, universe);
    ReorderOutcome::Moved(reordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_ids(outcome: &ReorderOutcome) -> Vec<u32> {
        match outcome {
            ReorderOutcome::Moved(order) => order.ids().iter().map(|id| id.get()).collect(),
            other => panic!("expected a move, got {other:?}"),
        }
    }

    #[test]
    fn drag_down_from_natural_order() {
        let outcome = compute_reorder(None, Universe::new(5), ItemId(2), ItemId(4));
        assert_eq!(order_ids(&outcome), vec![1, 3, 4, 2, 5]);
    }

    #[test]
    fn drag_up_from_natural_order() {
        let outcome = compute_reorder(None, Universe::new(5), ItemId(5), ItemId(2));
        assert_eq!(order_ids(&outcome), vec![1, 5, 2, 3, 4]);
    }

    #[test]
    fn drag_seven_onto_two() {
        let outcome = compute_reorder(None, Universe::new(8), ItemId(7), ItemId(2));
        assert_eq!(order_ids(&outcome), vec![1, 7, 2, 3, 4, 5, 6, 8]);
    }

    #[test]
    fn drag_within_existing_order() {
        let universe = Universe::new(4);
        let (order, _) = CustomOrder::from_ids([4, 3, 2, 1].map(ItemId), universe);
        let outcome = compute_reorder(Some(&order), universe, ItemId(4), ItemId(1));
        assert_eq!(order_ids(&outcome), vec![3, 2, 1, 4]);
    }

    #[test]
    fn same_item_is_a_no_op() {
        let outcome = compute_reorder(None, Universe::new(5), ItemId(3), ItemId(3));
        assert_eq!(outcome, ReorderOutcome::SameItem);
    }

    #[test]
    fn unknown_id_is_ignored() {
        // Item 7 does not exist in a five-item universe.
        let outcome = compute_reorder(None, Universe::new(5), ItemId(7), ItemId(2));
        assert_eq!(
            outcome,
            ReorderOutcome::NotFound {
                source_found: false,
                target_found: true,
            }
        );
        assert!(!outcome.is_moved());
    }

    #[test]
    fn id_missing_from_partial_order_is_ignored() {
        let universe = Universe::new(5);
        let (order, _) = CustomOrder::from_ids([2, 1].map(ItemId), universe);
        let outcome = compute_reorder(Some(&order), universe, ItemId(2), ItemId(4));
        assert!(matches!(
            outcome,
            ReorderOutcome::NotFound {
                source_found: true,
                target_found: false
            }
        ));
    }

    #[test]
    fn result_stays_a_permutation() {
        let universe = Universe::new(50);
        let outcome = compute_reorder(None, universe, ItemId(50), ItemId(1));
        let ReorderOutcome::Moved(order) = outcome else {
            panic!("expected a move");
        };
        assert!(order.is_permutation_of(universe));
    }
}
