#![no_main]

use libfuzzer_sys::fuzz_target;
use longlist_core::{ItemId, StateStore, Universe};

// Arbitrary drag sequences keep the custom order a permutation.
fuzz_target!(|data: &[u8]| {
    let universe = Universe::new(32);
    let store = StateStore::new(universe);
    for pair in data.chunks_exact(2) {
        let source = ItemId(u32::from(pair[0] % 40));
        let target = ItemId(u32::from(pair[1] % 40));
        store.move_item(source, target);
    }

    if let Some(order) = store.read().state.custom_order {
        let mut ids: Vec<u32> = order.ids().iter().map(|id| id.get()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<u32>>());
    }
});
