#![no_main]

use libfuzzer_sys::fuzz_target;
use longlist_core::{ItemQuery, Projector, StatePatch, StateStore, Universe};

// Any JSON body must either fail to parse or merge into a state the
// projector can still page through.
fuzz_target!(|data: &[u8]| {
    let Ok(patch) = serde_json::from_slice::<StatePatch>(data) else {
        return;
    };
    let universe = Universe::new(64);
    let store = StateStore::new(universe);
    let snapshot = store.merge(patch);

    let page = Projector::new(universe).project(&ItemQuery::new("", 0, 64), &snapshot.state);
    assert_eq!(page.total, 64);
    assert_eq!(page.items.len(), 64);

    let mut ids: Vec<u32> = page.items.iter().map(|item| item.id.get()).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=64).collect::<Vec<u32>>());
});
