use longlist_client::{EditOverlay, RenderMode, RenderedList};
use longlist_core::{ItemId, ItemView};
use proptest::prelude::*;

/// Rendered rows with arbitrary checkbox and note state.
fn arb_rows() -> impl Strategy<Value = RenderedList> {
    prop::collection::btree_map(1u32..500, (any::<bool>(), any::<bool>(), "[a-z ]{0,8}"), 0..40)
        .prop_map(|rows| {
            let views: Vec<ItemView> = rows
                .iter()
                .map(|(&id, &(selected, _, _))| ItemView::new(ItemId(id), selected))
                .collect();
            let mut list = RenderedList::new();
            list.render(&views, RenderMode::Reset);
            for (&id, (_, checked, note)) in &rows {
                list.set_checked(ItemId(id), *checked);
                list.set_note(ItemId(id), note);
            }
            list
        })
}

fn controls(list: &RenderedList) -> Vec<(ItemId, bool, String)> {
    list.rows()
        .iter()
        .map(|row| (row.id, row.checked, row.note.clone()))
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn capture_then_restore_changes_nothing(mut rows in arb_rows(), search in "[a-z0-9 ]{0,6}") {
        let before = controls(&rows);
        let mut overlay = EditOverlay::new();
        overlay.capture(&rows, &search);
        overlay.restore(&mut rows);
        prop_assert_eq!(controls(&rows), before);
        prop_assert_eq!(overlay.last_search(), search.as_str());
    }

    #[test]
    fn restore_after_rerender_reproduces_captured_controls(rows in arb_rows()) {
        let captured = controls(&rows);
        let mut overlay = EditOverlay::new();
        overlay.capture(&rows, "");

        // Re-render the same ids from server data that knows nothing of the edits.
        let views: Vec<ItemView> = rows
            .rows()
            .iter()
            .map(|row| ItemView::new(row.id, false))
            .collect();
        let mut fresh = RenderedList::new();
        fresh.render(&views, RenderMode::Reset);
        overlay.restore(&mut fresh);

        prop_assert_eq!(controls(&fresh), captured);
        for row in fresh.rows() {
            prop_assert_eq!(row.highlighted, row.checked);
        }
        prop_assert!(overlay.reconcile(&fresh).is_empty());
    }
}
