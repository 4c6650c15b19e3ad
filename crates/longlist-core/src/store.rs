//! Process-wide state store.
//!
//! A single [`StateStore`] holds the selection set, the custom order, and
//! per-item edits for the lifetime of the process. It is shared by every
//! request; nothing is persisted.
//!
//! # Consistency
//!
//! Every public mutation runs entirely under the write lock and bumps the
//! store version by one:
//!
//! - [`StateStore::merge`] replaces the fields a patch names, wholesale.
//!   Two clients that each read, modify, and merge the same field still
//!   race (last writer wins), because the read happened outside the lock.
//! - [`StateStore::merge_if`] rejects the patch when the version moved
//!   since the caller read it.
//! - [`StateStore::update`] and the helpers built on it
//!   ([`StateStore::set_selected`], [`StateStore::move_item`], ...) do the
//!   read-modify-write under the lock, so concurrent toggles never drop
//!   each other.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::model::{ItemEdit, ItemId, State, StateDocument, StatePatch};
use crate::order::CustomOrder;
use crate::reorder::{ReorderOutcome, compute_reorder};
use crate::universe::Universe;

/// Errors returned by conditional store writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store moved past the version the caller based its patch on.
    #[error("state version conflict: expected {expected}, store is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },

    /// The id is not part of the universe.
    #[error("item {0} is outside the universe")]
    ItemOutOfRange(ItemId),
}

impl StoreError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::VersionConflict { .. } => ErrorCode::VersionConflict,
            Self::ItemOutOfRange(_) => ErrorCode::ItemOutOfRange,
        }
    }
}

/// A point-in-time copy of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub version: u64,
    pub state: State,
}

impl Snapshot {
    #[must_use]
    pub fn to_document(&self) -> StateDocument {
        StateDocument::from_state(&self.state, self.version)
    }
}

/// What a drag-and-drop move did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    SameItem,
    NotFound,
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_moved(self) -> bool {
        matches!(self, Self::Moved)
    }
}

#[derive(Debug, Default)]
struct Versioned {
    version: u64,
    state: State,
}

impl Versioned {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: self.version,
            state: self.state.clone(),
        }
    }
}

/// Shared, versioned, in-memory state.
#[derive(Debug)]
pub struct StateStore {
    universe: Universe,
    inner: RwLock<Versioned>,
}

impl StateStore {
    /// A store with empty selection, no custom order, and no edits.
    #[must_use]
    pub fn new(universe: Universe) -> Self {
        Self {
            universe,
            inner: RwLock::new(Versioned::default()),
        }
    }

    #[must_use]
    pub const fn universe(&self) -> Universe {
        self.universe
    }

    /// Copy of the current state.
    pub fn read(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    /// Replace every field named by `patch`; leave the others alone.
    ///
    /// `patch.expected_version` is ignored here; see [`Self::merge_if`].
    /// Ids outside the universe are dropped from every field and logged at
    /// `warn`; the rest of the patch still applies.
    pub fn merge(&self, patch: StatePatch) -> Snapshot {
        let patch = NormalizedPatch::new(patch, self.universe);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        patch.apply(&mut guard.state);
        guard.version += 1;
        debug!(version = guard.version, "merged state patch");
        guard.snapshot()
    }

    /// Like [`Self::merge`], but only while the store is still at `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] when another write landed
    /// since `expected` was read. The store is left untouched.
    pub fn merge_if(&self, expected: u64, patch: StatePatch) -> Result<Snapshot, StoreError> {
        let patch = NormalizedPatch::new(patch, self.universe);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if guard.version != expected {
            return Err(StoreError::VersionConflict {
                expected,
                actual: guard.version,
            });
        }
        patch.apply(&mut guard.state);
        guard.version += 1;
        Ok(guard.snapshot())
    }

    /// Run `f` against the live state under the write lock.
    ///
    /// The version is bumped only when `f` reports that it changed
    /// something by returning `(true, _)`.
    pub fn update<R>(&self, f: impl FnOnce(&mut State) -> (bool, R)) -> (Snapshot, R) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let (changed, result) = f(&mut guard.state);
        if changed {
            guard.version += 1;
        }
        (guard.snapshot(), result)
    }

    /// Add `id` to, or remove it from, the selection set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemOutOfRange`] for ids outside the universe.
    pub fn set_selected(&self, id: ItemId, selected: bool) -> Result<Snapshot, StoreError> {
        self.check_in_range(id)?;
        let (snapshot, ()) = self.update(|state| {
            let changed = if selected {
                state.selected_items.insert(id)
            } else {
                state.selected_items.remove(&id)
            };
            (changed, ())
        });
        Ok(snapshot)
    }

    /// Set the note for `id`; an empty note removes the edit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ItemOutOfRange`] for ids outside the universe.
    pub fn set_note(&self, id: ItemId, note: &str) -> Result<Snapshot, StoreError> {
        self.check_in_range(id)?;
        let (snapshot, ()) = self.update(|state| {
            let changed = if note.is_empty() {
                state.item_edits.remove(&id).is_some()
            } else {
                let edit = ItemEdit {
                    note: note.to_string(),
                };
                state.item_edits.insert(id, edit.clone()) != Some(edit)
            };
            (changed, ())
        });
        Ok(snapshot)
    }

    /// Drop `source` onto `target` and persist the resulting order.
    ///
    /// Reading the current order and writing the new one happen under one
    /// lock, so two concurrent drags both take effect.
    pub fn move_item(&self, source: ItemId, target: ItemId) -> (Snapshot, MoveOutcome) {
        let universe = self.universe;
        self.update(|state| {
            match compute_reorder(state.custom_order.as_deref(), universe, source, target) {
                ReorderOutcome::Moved(order) => {
                    state.custom_order = Some(Arc::new(order));
                    (true, MoveOutcome::Moved)
                }
                ReorderOutcome::SameItem => (false, MoveOutcome::SameItem),
                ReorderOutcome::NotFound {
                    source_found,
                    target_found,
                } => {
                    debug!(%source, %target, source_found, target_found, "ignoring drop");
                    (false, MoveOutcome::NotFound)
                }
            }
        })
    }

    const fn check_in_range(&self, id: ItemId) -> Result<(), StoreError> {
        if self.universe.contains(id) {
            Ok(())
        } else {
            Err(StoreError::ItemOutOfRange(id))
        }
    }
}

/// A patch with every id checked against the universe.
///
/// Built before the write lock is taken; normalizing a full custom order
/// walks the whole universe.
struct NormalizedPatch {
    selected_items: Option<BTreeSet<ItemId>>,
    custom_order: Option<Option<Arc<CustomOrder>>>,
    item_edits: Option<BTreeMap<ItemId, ItemEdit>>,
}

impl NormalizedPatch {
    fn new(patch: StatePatch, universe: Universe) -> Self {
        let selected_items = patch.selected_items.map(|ids| {
            let out_of_range = ids.iter().filter(|&&id| !universe.contains(id)).count();
            let kept: BTreeSet<ItemId> = ids
                .into_iter()
                .filter(|&id| universe.contains(id))
                .collect();
            if out_of_range > 0 {
                warn!(out_of_range, "dropped selected items outside the universe");
            }
            kept
        });

        let custom_order = patch.custom_order.map(|order| {
            order.map(|ids| {
                let (order, report) = CustomOrder::from_ids(ids, universe);
                if !report.is_clean() {
                    warn!(
                        duplicates = report.duplicates,
                        out_of_range = report.out_of_range,
                        "normalized custom order"
                    );
                }
                Arc::new(order)
            })
        });

        let item_edits = patch.item_edits.map(|mut edits| {
            let requested = edits.len();
            edits.retain(|id, _| universe.contains(*id));
            let out_of_range = requested - edits.len();
            if out_of_range > 0 {
                warn!(out_of_range, "dropped item edits outside the universe");
            }
            edits
        });

        Self {
            selected_items,
            custom_order,
            item_edits,
        }
    }

    fn apply(self, state: &mut State) {
        if let Some(selected) = self.selected_items {
            state.selected_items = selected;
        }
        if let Some(order) = self.custom_order {
            state.custom_order = order;
        }
        if let Some(edits) = self.item_edits {
            state.item_edits = edits;
        }
    }
}
