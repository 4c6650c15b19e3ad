//! The rendered view model: what a UI layer draws, one row per item.

use longlist_core::{ItemId, ItemView};

/// Text shown in place of rows when a fresh search matches nothing.
pub const EMPTY_MARKER: &str = "No items found";

/// How a page of items lands in the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Replace everything that was rendered.
    Reset,
    /// Add after the rows already rendered.
    Append,
}

/// One rendered row and its live controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: ItemId,
    pub value: String,
    /// Checkbox state.
    pub checked: bool,
    /// Editable note field.
    pub note: String,
    /// The "selected" visual class. Tracks `checked` once the server or the
    /// overlay confirms it.
    pub highlighted: bool,
}

impl Row {
    #[must_use]
    pub fn from_view(view: &ItemView) -> Self {
        Self {
            id: view.id,
            value: view.value.clone(),
            checked: view.selected,
            note: view.note.clone().unwrap_or_default(),
            highlighted: view.selected,
        }
    }
}

/// Rows in display order, plus the empty-state marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedList {
    rows: Vec<Row>,
    empty_marker: bool,
}

impl RenderedList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a page of items. Returns how many rows were added.
    pub fn render(&mut self, items: &[ItemView], mode: RenderMode) -> usize {
        if mode == RenderMode::Reset {
            self.rows.clear();
        }
        self.empty_marker = false;
        self.rows.extend(items.iter().map(Row::from_view));
        items.len()
    }

    /// Drop every row, as happens before a search-driven reload.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.empty_marker = false;
    }

    pub fn show_empty_marker(&mut self) {
        self.rows.clear();
        self.empty_marker = true;
    }

    #[must_use]
    pub const fn shows_empty_marker(&self) -> bool {
        self.empty_marker
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    #[must_use]
    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Set the checkbox of a rendered row. False if the id is not rendered.
    pub fn set_checked(&mut self, id: ItemId, checked: bool) -> bool {
        self.get_mut(id).is_some_and(|row| {
            row.checked = checked;
            true
        })
    }

    /// Set the note field of a rendered row. False if the id is not rendered.
    pub fn set_note(&mut self, id: ItemId, note: &str) -> bool {
        self.get_mut(id).is_some_and(|row| {
            note.clone_into(&mut row.note);
            true
        })
    }
}
