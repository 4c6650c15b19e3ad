#![allow(dead_code)]
//! An in-process [`ListApi`] over a real store and projector.

use std::cell::Cell;

use longlist_client::{ClientError, ListApi};
use longlist_core::model::{Health, MoveAck, WriteAck};
use longlist_core::{
    ItemId, ItemQuery, MoveOutcome, Page, Projector, StateDocument, StatePatch, StateStore,
    StoreError, Universe,
};

pub struct LocalApi {
    pub store: StateStore,
    projector: Projector,
    /// When set, every call fails as if the server were down.
    pub offline: Cell<bool>,
}

impl LocalApi {
    pub fn new(size: u32) -> Self {
        let universe = Universe::new(size);
        Self {
            store: StateStore::new(universe),
            projector: Projector::new(universe),
            offline: Cell::new(false),
        }
    }

    fn check(&self) -> Result<(), ClientError> {
        if self.offline.get() {
            return Err(ClientError::Network {
                url: "local".into(),
                reason: "offline".into(),
            });
        }
        Ok(())
    }
}

fn rejected(err: &StoreError) -> ClientError {
    ClientError::Status {
        url: "local".into(),
        status: 400,
        message: err.to_string(),
        code: Some(err.code().code().into()),
    }
}

impl ListApi for LocalApi {
    fn fetch_items(&self, search: &str, offset: u64, limit: u64) -> Result<Page, ClientError> {
        self.check()?;
        let query = ItemQuery::new(search, offset, limit);
        Ok(self.projector.project(&query, &self.store.read().state))
    }

    fn read_state(&self) -> Result<StateDocument, ClientError> {
        self.check()?;
        Ok(self.store.read().to_document())
    }

    fn merge_state(&self, patch: &StatePatch) -> Result<WriteAck, ClientError> {
        self.check()?;
        Ok(WriteAck::ok(self.store.merge(patch.clone()).version))
    }

    fn set_selected(&self, id: ItemId, selected: bool) -> Result<WriteAck, ClientError> {
        self.check()?;
        self.store
            .set_selected(id, selected)
            .map(|snapshot| WriteAck::ok(snapshot.version))
            .map_err(|err| rejected(&err))
    }

    fn move_item(&self, source: ItemId, target: ItemId) -> Result<MoveAck, ClientError> {
        self.check()?;
        let (snapshot, outcome) = self.store.move_item(source, target);
        Ok(MoveAck {
            success: true,
            moved: outcome == MoveOutcome::Moved,
            version: snapshot.version,
        })
    }

    fn save_note(&self, id: ItemId, note: &str) -> Result<WriteAck, ClientError> {
        self.check()?;
        self.store
            .set_note(id, note)
            .map(|snapshot| WriteAck::ok(snapshot.version))
            .map_err(|err| rejected(&err))
    }

    fn health(&self) -> Result<Health, ClientError> {
        self.check()?;
        Ok(Health {
            status: "ok".into(),
            universe: self.store.universe().size(),
            version: self.store.version(),
        })
    }
}
