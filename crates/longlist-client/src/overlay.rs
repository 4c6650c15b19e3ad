//! Transient edit overlay.
//!
//! Re-rendering a page rebuilds rows from server data, which would wipe any
//! checkbox or note the user changed locally. The overlay buffers those
//! values by item id and writes them back onto whatever rows are rendered
//! later.
//!
//! Reconciliation is a diff: [`EditOverlay::reconcile`] compares the
//! rendered rows to the buffer and yields one [`RowPatch`] per row that
//! disagrees. [`EditOverlay::restore`] applies those patches, so rows that
//! already match are never rewritten.

use std::collections::BTreeMap;

use longlist_core::ItemId;

use crate::rows::{RenderedList, Row};

/// Buffered control values for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayEntry {
    pub checked: bool,
    pub note: String,
}

impl OverlayEntry {
    fn of(row: &Row) -> Self {
        Self {
            checked: row.checked,
            note: row.note.clone(),
        }
    }
}

/// A write the overlay wants applied to one rendered row.
///
/// `None` fields already match and are left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPatch {
    pub id: ItemId,
    pub checked: Option<bool>,
    pub note: Option<String>,
    pub highlighted: Option<bool>,
}

impl RowPatch {
    fn is_noop(&self) -> bool {
        self.checked.is_none() && self.note.is_none() && self.highlighted.is_none()
    }
}

/// Client-local buffer of unsaved row edits, keyed by item id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOverlay {
    entries: BTreeMap<ItemId, OverlayEntry>,
    search: String,
}

impl EditOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot every rendered row and the search text.
    ///
    /// Entries for rendered ids are overwritten; entries for ids that are
    /// not rendered right now are kept.
    pub fn capture(&mut self, rows: &RenderedList, search: &str) {
        for row in rows.rows() {
            self.entries.insert(row.id, OverlayEntry::of(row));
        }
        search.clone_into(&mut self.search);
    }

    /// Snapshot one row after an edit event.
    pub fn record_edit(&mut self, row: &Row) {
        self.entries.insert(row.id, OverlayEntry::of(row));
    }

    /// Overwrite the buffered checkbox for `id`, keeping its note. Ids with
    /// no entry are left without one.
    pub fn set_checked(&mut self, id: ItemId, checked: bool) {
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.checked = checked;
        }
    }

    /// Diff the rendered rows against the buffer.
    #[must_use]
    pub fn reconcile(&self, rows: &RenderedList) -> Vec<RowPatch> {
        rows.rows()
            .iter()
            .filter_map(|row| {
                let entry = self.entries.get(&row.id)?;
                let patch = RowPatch {
                    id: row.id,
                    checked: (row.checked != entry.checked).then_some(entry.checked),
                    note: (row.note != entry.note).then(|| entry.note.clone()),
                    highlighted: (row.highlighted != entry.checked).then_some(entry.checked),
                };
                (!patch.is_noop()).then_some(patch)
            })
            .collect()
    }

    /// Apply patches to rendered rows. Patches for ids no longer rendered
    /// are skipped. Returns how many rows changed.
    pub fn apply(rows: &mut RenderedList, patches: Vec<RowPatch>) -> usize {
        let mut applied = 0;
        for patch in patches {
            let Some(row) = rows.get_mut(patch.id) else {
                continue;
            };
            if let Some(checked) = patch.checked {
                row.checked = checked;
            }
            if let Some(note) = patch.note {
                row.note = note;
            }
            if let Some(highlighted) = patch.highlighted {
                row.highlighted = highlighted;
            }
            applied += 1;
        }
        applied
    }

    /// Write buffered values back onto every rendered row that has an entry.
    pub fn restore(&self, rows: &mut RenderedList) -> usize {
        let patches = self.reconcile(rows);
        Self::apply(rows, patches)
    }

    #[must_use]
    pub fn entry(&self, id: ItemId) -> Option<&OverlayEntry> {
        self.entries.get(&id)
    }

    /// Search text as of the last [`capture`](Self::capture).
    #[must_use]
    pub fn last_search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
