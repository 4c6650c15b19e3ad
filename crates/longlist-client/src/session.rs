//! A browse session: the client half of longlist without any I/O.
//!
//! User input goes in through methods like [`BrowseSession::toggle`] and
//! [`BrowseSession::drop_on`]. Anything that needs the server comes back
//! out as an [`Effect`]. The driver executes effects however it likes
//! (usually on a worker thread, see [`Effect::execute`]) and hands the
//! result back with [`BrowseSession::complete`]. Completions may arrive in
//! any order.

use std::time::{Duration, Instant};

use longlist_core::config::ClientConfig;
use longlist_core::model::{MoveAck, WriteAck};
use longlist_core::{ItemId, Page};
use tracing::{debug, info, warn};

use crate::api::{ClientError, ListApi};
use crate::controller::{FetchRequest, ResponseAction, ScrollController, ScrollMetrics, Ticket};
use crate::debounce::Debouncer;
use crate::overlay::EditOverlay;
use crate::rows::{RenderMode, RenderedList};

/// Tunables for a session, usually read from [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub page_size: u64,
    pub near_bottom_margin: u64,
    pub debounce: Duration,
    pub restore_delay: Duration,
    pub persist_notes: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for SessionSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            near_bottom_margin: u64::from(config.near_bottom_margin),
            debounce: Duration::from_millis(config.debounce_ms),
            restore_delay: Duration::from_millis(config.restore_delay_ms),
            persist_notes: config.persist_notes,
        }
    }
}

/// Work the driver must perform against the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchRequest),
    SetSelected { id: ItemId, selected: bool },
    MoveItem { source: ItemId, target: ItemId },
    SaveNote { id: ItemId, note: String },
}

/// The outcome of an [`Effect`].
#[derive(Debug)]
pub enum Completion {
    Fetched {
        ticket: Ticket,
        result: Result<Page, ClientError>,
    },
    SelectionSaved {
        id: ItemId,
        selected: bool,
        result: Result<WriteAck, ClientError>,
    },
    Moved {
        source: ItemId,
        target: ItemId,
        result: Result<MoveAck, ClientError>,
    },
    NoteSaved {
        id: ItemId,
        result: Result<WriteAck, ClientError>,
    },
}

impl Effect {
    /// Run the effect against `api`, blocking until it finishes.
    pub fn execute<A: ListApi + ?Sized>(self, api: &A) -> Completion {
        match self {
            Self::Fetch(request) => Completion::Fetched {
                ticket: request.ticket,
                result: api.fetch_items(&request.search, request.offset, request.limit),
            },
            Self::SetSelected { id, selected } => Completion::SelectionSaved {
                id,
                selected,
                result: api.set_selected(id, selected),
            },
            Self::MoveItem { source, target } => Completion::Moved {
                source,
                target,
                result: api.move_item(source, target),
            },
            Self::SaveNote { id, note } => Completion::NoteSaved {
                id,
                result: api.save_note(id, &note),
            },
        }
    }
}

#[derive(Debug)]
pub struct BrowseSession {
    settings: SessionSettings,
    controller: ScrollController,
    debouncer: Debouncer,
    rows: RenderedList,
    overlay: EditOverlay,
    search_input: String,
    drag_source: Option<ItemId>,
    restore_at: Option<Instant>,
    status: Option<String>,
}

impl BrowseSession {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            controller: ScrollController::new(settings.page_size, settings.near_bottom_margin),
            debouncer: Debouncer::new(settings.debounce),
            rows: RenderedList::new(),
            overlay: EditOverlay::new(),
            search_input: String::new(),
            drag_source: None,
            restore_at: None,
            status: None,
        }
    }

    /// Initial load: the first page for an empty search.
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.begin_search(String::new())]
    }

    /// Re-run the current search from the top, keeping rendered edits in
    /// the overlay.
    pub fn reload(&mut self) -> Effect {
        let search = self.search_input.clone();
        self.begin_search(search)
    }

    /// The search box changed. Nothing is fetched until the debounce window
    /// passes; see [`tick`](Self::tick).
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.search_input = text.into();
        self.debouncer.input(self.search_input.clone(), now);
    }

    /// Advance timers: fire a debounced search and run a deferred restore.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(search) = self.debouncer.poll(now) {
            effects.push(self.begin_search(search));
        }
        if self.restore_at.is_some_and(|at| now >= at) {
            self.restore_at = None;
            let patched = self.overlay.restore(&mut self.rows);
            debug!(patched, "deferred overlay restore");
        }
        effects
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debouncer.deadline(), self.restore_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn scrolled(&mut self, metrics: ScrollMetrics) -> Option<Effect> {
        self.controller.scrolled(metrics).map(Effect::Fetch)
    }

    /// Flip the checkbox of a rendered row. The change is written through
    /// to the server; the highlight follows once it is confirmed.
    pub fn toggle(&mut self, id: ItemId) -> Option<Effect> {
        let row = self.rows.get_mut(id)?;
        row.checked = !row.checked;
        let selected = row.checked;
        self.overlay.record_edit(row);
        Some(Effect::SetSelected { id, selected })
    }

    /// Replace the note of a rendered row. Notes stay client-side unless
    /// note persistence is enabled.
    pub fn edit_note(&mut self, id: ItemId, note: &str) -> Option<Effect> {
        if !self.rows.set_note(id, note) {
            return None;
        }
        if let Some(row) = self.rows.get(id) {
            self.overlay.record_edit(row);
        }
        self.settings.persist_notes.then(|| Effect::SaveNote {
            id,
            note: note.to_owned(),
        })
    }

    /// Start dragging a rendered row.
    pub fn pick(&mut self, id: ItemId) -> bool {
        if self.rows.get(id).is_none() {
            return false;
        }
        self.drag_source = Some(id);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.drag_source = None;
    }

    /// Drop the dragged row onto `target`. Dropping a row on itself, or
    /// dropping with nothing picked, does nothing.
    pub fn drop_on(&mut self, target: ItemId) -> Option<Effect> {
        let source = self.drag_source.take()?;
        if source == target {
            return None;
        }
        Some(Effect::MoveItem { source, target })
    }

    /// Feed back the outcome of an effect.
    pub fn complete(&mut self, completion: Completion, now: Instant) -> Vec<Effect> {
        match completion {
            Completion::Fetched { ticket, result } => {
                self.page_arrived(ticket, result, now);
                Vec::new()
            }
            Completion::SelectionSaved {
                id,
                selected,
                result,
            } => {
                self.selection_saved(id, selected, result);
                Vec::new()
            }
            Completion::Moved {
                source,
                target,
                result,
            } => self.move_finished(source, target, result),
            Completion::NoteSaved { id, result } => {
                if let Err(err) = result {
                    self.network_failure("save note", &err);
                    debug!(%id, "note kept locally");
                }
                Vec::new()
            }
        }
    }

    /// Capture everything rendered before the session goes away.
    pub fn shutdown(&mut self) {
        self.overlay.capture(&self.rows, &self.search_input);
    }

    fn begin_search(&mut self, search: String) -> Effect {
        self.overlay.capture(&self.rows, &self.search_input);
        self.rows.clear();
        self.debouncer.mark_fired(search.clone());
        Effect::Fetch(self.controller.search_changed(search))
    }

    fn page_arrived(&mut self, ticket: Ticket, result: Result<Page, ClientError>, now: Instant) {
        let page = match result {
            Ok(page) => page,
            Err(err) => {
                if self.controller.request_failed(ticket) {
                    self.network_failure("load items", &err);
                }
                return;
            }
        };

        match self.controller.response_arrived(ticket, &page) {
            ResponseAction::Discarded => {}
            ResponseAction::Exhausted { show_empty_marker } => {
                if show_empty_marker {
                    self.rows.show_empty_marker();
                }
            }
            ResponseAction::Render {
                mode: RenderMode::Reset,
            } => {
                self.rows.render(&page.items, RenderMode::Reset);
                self.restore_at = Some(now + self.settings.restore_delay);
            }
            ResponseAction::Render {
                mode: RenderMode::Append,
            } => {
                self.rows.render(&page.items, RenderMode::Append);
                self.overlay.restore(&mut self.rows);
            }
        }
    }

    fn selection_saved(&mut self, id: ItemId, selected: bool, result: Result<WriteAck, ClientError>) {
        match result {
            Ok(_) => {
                if let Some(row) = self.rows.get_mut(id) {
                    row.highlighted = selected;
                }
            }
            Err(err) => {
                self.network_failure("save selection", &err);
                // A reset may have cleared the row since the toggle.
                self.overlay.set_checked(id, !selected);
                if let Some(row) = self.rows.get_mut(id) {
                    row.checked = !selected;
                    self.overlay.record_edit(row);
                }
            }
        }
    }

    fn move_finished(
        &mut self,
        source: ItemId,
        target: ItemId,
        result: Result<MoveAck, ClientError>,
    ) -> Vec<Effect> {
        match result {
            Ok(ack) if ack.moved => {
                info!(%source, %target, version = ack.version, "item moved");
                vec![self.reload()]
            }
            Ok(_) => {
                debug!(%source, %target, "drop ignored by server");
                Vec::new()
            }
            Err(err) => {
                self.network_failure("move item", &err);
                Vec::new()
            }
        }
    }

    fn network_failure(&mut self, action: &str, err: &ClientError) {
        warn!(action, code = %err.code(), error = %err, "request failed");
        self.status = Some(format!("{action} failed: {}", err.code().message()));
    }

    #[must_use]
    pub const fn rows(&self) -> &RenderedList {
        &self.rows
    }

    #[must_use]
    pub const fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    #[must_use]
    pub const fn controller(&self) -> &ScrollController {
        &self.controller
    }

    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    #[must_use]
    pub const fn drag_source(&self) -> Option<ItemId> {
        self.drag_source
    }

    /// Take the last transient status message, if any.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }
}
