#![forbid(unsafe_code)]
//! longlist-client library.
//!
//! Client half of longlist: infinite-scroll pagination, search debouncing,
//! the transient edit overlay, and a blocking HTTP client. Everything
//! except [`api::HttpClient`] is free of I/O and driven by explicit
//! timestamps, so a UI layer only has to forward input and execute
//! [`session::Effect`]s.

pub mod api;
pub mod controller;
pub mod debounce;
pub mod overlay;
pub mod rows;
pub mod session;

pub use api::{ClientError, HttpClient, ListApi};
pub use controller::{FetchRequest, Phase, ResponseAction, ScrollController, ScrollMetrics, Ticket};
pub use overlay::{EditOverlay, RowPatch};
pub use rows::{RenderMode, RenderedList, Row};
pub use session::{BrowseSession, Completion, Effect, SessionSettings};
