#![allow(dead_code)]
use longlist_core::ItemId;
use longlist_core::order::CustomOrder;
use proptest::prelude::*;

/// Small universes keep brute-force oracles cheap.
pub fn arb_universe_size() -> impl Strategy<Value = u32> {
    1u32..400
}

/// Search terms drawn from the alphabet display values are made of.
pub fn arb_search() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[0-9]{1,3}",
        "(item|ITEM|Item|tem|m) ?[0-9]{0,2}",
        "[a-z ]{1,4}",
    ]
}

/// A shuffled permutation of `1..=size`.
pub fn arb_permutation(size: u32) -> impl Strategy<Value = Vec<ItemId>> {
    Just((1..=size).map(ItemId).collect::<Vec<_>>()).prop_shuffle()
}

/// An arbitrary client-supplied order: may repeat ids or name ids out of range.
pub fn arb_raw_order(size: u32) -> impl Strategy<Value = Vec<ItemId>> {
    prop::collection::vec((0..=size + 3).prop_map(ItemId), 0..(size as usize + 5))
}

/// Brute-force reference: display values materialized, filtered, ordered.
pub fn reference_sequence(size: u32, search: &str, order: Option<&CustomOrder>) -> Vec<ItemId> {
    let needle = search.to_lowercase();
    let keep = |id: &ItemId| id.display_value().to_lowercase().contains(&needle);

    let mut filtered: Vec<ItemId> = (1..=size).map(ItemId).filter(keep).collect();
    if let Some(order) = order {
        filtered.sort_by_key(|id| order.position(*id).unwrap_or(usize::MAX));
    }
    filtered
}
