use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identity of an item in the virtual universe.
///
/// Ids are 1-based; `0` never names an item. The display value is derived
/// from the id alone, so an id is all the server needs to render a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Display value shown for this item, e.g. `Item 42`.
    #[must_use]
    pub fn display_value(self) -> String {
        format!("Item {}", self.0)
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self)
    }
}

/// One projected row as served by `GET /api/items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: ItemId,
    pub value: String,
    pub selected: bool,
    /// Server-side note, only present when notes are persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ItemView {
    #[must_use]
    pub fn new(id: ItemId, selected: bool) -> Self {
        Self {
            id,
            value: id.display_value(),
            selected,
            note: None,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: Option<&str>) -> Self {
        self.note = note.map(str::to_owned);
        self
    }
}

/// A page of projected rows plus the filtered (pre-pagination) count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<ItemView>,
    pub total: u64,
}

impl Page {
    #[must_use]
    pub fn empty(total: u64) -> Self {
        Self {
            items: Vec::new(),
            total,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
