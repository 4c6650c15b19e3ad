//! Wire and in-memory data types: items, views, and the shared state.

pub mod item;
pub mod state;
pub mod wire;

pub use item::{ItemId, ItemView, Page};
pub use state::{ItemEdit, State, StateDocument, StatePatch};
pub use wire::{
    ErrorBody, Health, MoveAck, MoveRequest, NoteRequest, SelectionRequest, WriteAck,
};
