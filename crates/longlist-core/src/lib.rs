#![forbid(unsafe_code)]
//! longlist-core library.
//!
//! Server-side half of longlist: the virtual item universe, the state
//! store, the page projector, and the drag reorder engine.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums per module, `anyhow::Result` at I/O edges.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;
pub mod order;
pub mod projector;
pub mod reorder;
pub mod store;
pub mod universe;

pub use model::{ItemId, ItemView, Page, State, StateDocument, StatePatch};
pub use projector::{ItemQuery, Projector};
pub use store::{MoveOutcome, Snapshot, StateStore, StoreError};
pub use universe::Universe;
