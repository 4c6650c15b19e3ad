use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::item::ItemId;
use crate::order::CustomOrder;

/// Per-item edit kept on the server when note persistence is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEdit {
    #[serde(default)]
    pub note: String,
}

/// The process-wide list state.
///
/// The custom order sits behind an `Arc` and is replaced, never mutated, so
/// cloning a `State` is cheap and a clone never observes later writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub selected_items: BTreeSet<ItemId>,
    pub custom_order: Option<Arc<CustomOrder>>,
    pub item_edits: BTreeMap<ItemId, ItemEdit>,
}

impl State {
    #[must_use]
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected_items.contains(&id)
    }

    #[must_use]
    pub fn note(&self, id: ItemId) -> Option<&str> {
        self.item_edits.get(&id).map(|edit| edit.note.as_str())
    }
}

/// Wire form of [`State`], as served by `GET /api/state`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    #[serde(default)]
    pub selected_items: Vec<ItemId>,
    #[serde(default)]
    pub custom_order: Option<Vec<ItemId>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub item_edits: BTreeMap<ItemId, ItemEdit>,
    #[serde(default)]
    pub version: u64,
}

impl StateDocument {
    #[must_use]
    pub fn from_state(state: &State, version: u64) -> Self {
        Self {
            selected_items: state.selected_items.iter().copied().collect(),
            custom_order: state.custom_order.as_ref().map(|order| order.ids().to_vec()),
            item_edits: state.item_edits.clone(),
            version,
        }
    }
}

/// A partial state body for `POST /api/state`.
///
/// Each present field replaces the stored field wholesale. `customOrder`
/// distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`), which clears the order back to ascending ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_items: Option<Vec<ItemId>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_order: Option<Option<Vec<ItemId>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_edits: Option<BTreeMap<ItemId, ItemEdit>>,
    /// When set, the patch only applies if the store is still at this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl StatePatch {
    #[must_use]
    pub fn selected_items(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            selected_items: Some(ids.into_iter().collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn custom_order(order: Option<Vec<ItemId>>) -> Self {
        Self {
            custom_order: Some(order),
            ..Self::default()
        }
    }

    /// True when the patch names no state field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.selected_items.is_none() && self.custom_order.is_none() && self.item_edits.is_none()
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
