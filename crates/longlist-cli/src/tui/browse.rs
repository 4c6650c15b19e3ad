//! Browse view: a [`BrowseSession`] drawn with ratatui.
//!
//! | Key | Action |
//! |---|---|
//! | `j` / `k`, arrows, PgUp / PgDn | move the cursor |
//! | `g` / `G` | first / last rendered row |
//! | `/` | edit the search (applied after the debounce window) |
//! | space | toggle the checkbox |
//! | `e` | edit the note |
//! | `m`, then `p` | pick the row, then drop it onto the row under the cursor |
//! | `r` | reload |
//! | `Esc` | cancel a pick |
//! | `q` | quit |
//!
//! Requests run on short-lived worker threads and report back over a
//! channel; the view never blocks on the network.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use longlist_client::rows::EMPTY_MARKER;
use longlist_client::{
    BrowseSession, Completion, Effect, HttpClient, ListApi, Phase, Row, ScrollMetrics,
    SessionSettings,
};
use longlist_core::ItemId;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, warn};

use super::{CrosstermEvents, EventSource, TerminalGuard};

const TICK: Duration = Duration::from_millis(100);
const STATUS_TTL: Duration = Duration::from_secs(4);
const HELP: &str = "/ search  space check  e note  m pick  p drop  r reload  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box.
    Search,
    /// Editing the note of `note_target`.
    Note,
}

pub struct BrowseView {
    session: BrowseSession,
    input_mode: InputMode,
    state: ListState,
    note_buf: String,
    note_target: Option<ItemId>,
    status: Option<(String, Instant)>,
    /// Rows visible in the list area as of the last render.
    viewport: u16,
    should_quit: bool,
}

impl BrowseView {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            session: BrowseSession::new(settings),
            input_mode: InputMode::Normal,
            state: ListState::default(),
            note_buf: String::new(),
            note_target: None,
            status: None,
            viewport: 0,
            should_quit: false,
        }
    }

    pub fn start(&mut self) -> Vec<Effect> {
        self.session.start()
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Vec<Effect> {
        let effects = match self.input_mode {
            InputMode::Search => {
                self.handle_search_key(key, now);
                Vec::new()
            }
            InputMode::Note => self.handle_note_key(key).into_iter().collect(),
            InputMode::Normal => self.handle_normal_key(key),
        };
        self.settle(effects, now)
    }

    pub fn complete(&mut self, completion: Completion, now: Instant) -> Vec<Effect> {
        let effects = self.session.complete(completion, now);
        self.settle(effects, now)
    }

    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let effects = self.session.tick(now);
        self.settle(effects, now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.next_deadline()
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn shutdown(&mut self) {
        self.session.shutdown();
        debug!(buffered = self.session.overlay().len(), "browse session closed");
    }

    /// Bookkeeping after anything that may have changed the rows: keep the
    /// cursor in range, fetch more if the view is near the bottom, and pick
    /// up status messages.
    fn settle(&mut self, mut effects: Vec<Effect>, now: Instant) -> Vec<Effect> {
        self.clamp_cursor();
        if let Some(fetch) = self.session.scrolled(self.scroll_metrics()) {
            effects.push(fetch);
        }
        if let Some(message) = self.session.take_status() {
            self.status = Some((message, now));
        }
        effects
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::PageDown => self.move_down(usize::from(self.viewport.max(1))),
            KeyCode::PageUp => self.move_up(usize::from(self.viewport.max(1))),
            KeyCode::Char('g') | KeyCode::Home => self.state.select_first(),
            KeyCode::Char('G') | KeyCode::End => {
                let len = self.session.rows().len();
                self.state.select(len.checked_sub(1));
            }

            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char(' ') => {
                return self
                    .current_id()
                    .and_then(|id| self.session.toggle(id))
                    .into_iter()
                    .collect();
            }
            KeyCode::Char('e') => self.open_note(),
            KeyCode::Char('m') => self.pick(),
            KeyCode::Char('p') => return self.drop_here().into_iter().collect(),
            KeyCode::Char('r') => return vec![self.session.reload()],
            KeyCode::Esc => {
                if self.session.drag_source().is_some() {
                    self.session.cancel_drag();
                    self.set_status("move cancelled");
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        let mut text = self.session.search_input().to_owned();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        self.session.type_search(text, now);
    }

    fn handle_note_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Esc => {
                self.close_note();
                None
            }
            KeyCode::Enter => {
                let target = self.note_target;
                let note = std::mem::take(&mut self.note_buf);
                self.close_note();
                target.and_then(|id| self.session.edit_note(id, &note))
            }
            KeyCode::Backspace => {
                self.note_buf.pop();
                None
            }
            KeyCode::Char(c) => {
                self.note_buf.push(c);
                None
            }
            _ => None,
        }
    }

    fn open_note(&mut self) {
        let Some(row) = self.current_row() else {
            return;
        };
        let (id, note) = (row.id, row.note.clone());
        self.note_target = Some(id);
        self.note_buf = note;
        self.input_mode = InputMode::Note;
    }

    fn close_note(&mut self) {
        self.note_target = None;
        self.note_buf.clear();
        self.input_mode = InputMode::Normal;
    }

    fn pick(&mut self) {
        let Some(id) = self.current_id() else {
            return;
        };
        if self.session.pick(id) {
            self.set_status(&format!("moving Item {id}: go to the target row and press p"));
        }
    }

    fn drop_here(&mut self) -> Option<Effect> {
        let target = self.current_id()?;
        let effect = self.session.drop_on(target);
        if effect.is_none() {
            self.set_status("nothing to move");
        }
        effect
    }

    fn set_status(&mut self, message: &str) {
        self.status = Some((message.to_owned(), Instant::now()));
    }

    fn current_row(&self) -> Option<&Row> {
        self.state
            .selected()
            .and_then(|index| self.session.rows().row_at(index))
    }

    fn current_id(&self) -> Option<ItemId> {
        self.current_row().map(|row| row.id)
    }

    fn move_down(&mut self, steps: usize) {
        let len = self.session.rows().len();
        if len == 0 {
            return;
        }
        let next = self.state.selected().map_or(0, |i| i.saturating_add(steps));
        self.state.select(Some(next.min(len - 1)));
    }

    fn move_up(&mut self, steps: usize) {
        if self.session.rows().is_empty() {
            return;
        }
        let next = self.state.selected().map_or(0, |i| i.saturating_sub(steps));
        self.state.select(Some(next));
    }

    fn clamp_cursor(&mut self) {
        let len = self.session.rows().len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            None => self.state.select(Some(0)),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    /// Scroll position in rows. The list keeps the cursor visible, so the
    /// cursor bounds the offset from below even before the next render.
    fn scroll_metrics(&self) -> ScrollMetrics {
        let viewport = u64::from(self.viewport);
        let below_cursor = self.state.selected().map_or(0, |i| i as u64 + 1);
        ScrollMetrics {
            offset: (self.state.offset() as u64).max(below_cursor.saturating_sub(viewport)),
            viewport,
            content: self.session.rows().len() as u64,
        }
    }

    pub fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let search_style = if self.input_mode == InputMode::Search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let input = Paragraph::new(self.session.search_input())
            .block(Block::default().borders(Borders::ALL).title(" Search "))
            .style(search_style);
        frame.render_widget(input, chunks[0]);

        self.render_list(frame, chunks[1]);
        frame.render_widget(Paragraph::new(self.status_line()), chunks[2]);
    }

    fn render_list(&mut self, frame: &mut Frame<'_>, area: Rect) {
        self.viewport = area.height.saturating_sub(2);
        let rows = self.session.rows();
        let title = format!(
            " longlist: {} of {} ",
            rows.len(),
            self.session.controller().total().unwrap_or(0)
        );
        let block = Block::default().borders(Borders::ALL).title(title);

        if rows.shows_empty_marker() {
            let empty = Paragraph::new(EMPTY_MARKER)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let dragging = self.session.drag_source();
        let items: Vec<ListItem> = rows
            .rows()
            .iter()
            .map(|row| row_item(row, dragging == Some(row.id)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(Color::White)
                    .bg(Color::DarkGray),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.state);
    }

    fn status_line(&self) -> Line<'_> {
        if self.input_mode == InputMode::Note {
            return Line::from(vec![
                Span::styled("note: ", Style::default().fg(Color::Yellow)),
                Span::raw(self.note_buf.as_str()),
            ]);
        }
        let fresh = self
            .status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL);
        if let Some((message, _)) = fresh {
            return Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Red)));
        }
        if self.session.controller().phase() == Phase::Loading {
            return Line::from("loading...");
        }
        Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray)))
    }
}

fn row_item(row: &Row, dragging: bool) -> ListItem<'static> {
    let mark = if row.checked { "[x] " } else { "[ ] " };
    let value_style = if row.highlighted {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::raw(mark),
        Span::styled(format!("{:<14}", row.value), value_style),
    ];
    if !row.note.is_empty() {
        spans.push(Span::styled(row.note.clone(), Style::default().fg(Color::Cyan)));
    }
    if dragging {
        spans.push(Span::styled("  (moving)", Style::default().fg(Color::Yellow)));
    }
    ListItem::new(Line::from(spans))
}

/// Runs effects on worker threads and sends completions back.
struct Executor<A> {
    api: Arc<A>,
    done: Sender<Completion>,
}

impl<A: ListApi + Send + Sync + 'static> Executor<A> {
    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let api = Arc::clone(&self.api);
            let done = self.done.clone();
            let fallback = effect.clone();
            let spawned = thread::Builder::new()
                .name("longlist-request".to_owned())
                .spawn(move || {
                    // The receiver is gone once the view has quit.
                    let _ = done.send(effect.execute(api.as_ref()));
                });
            if let Err(err) = spawned {
                warn!("request thread unavailable, running inline: {err}");
                let _ = self.done.send(fallback.execute(self.api.as_ref()));
            }
        }
    }
}

fn run_loop<B: Backend, A: ListApi + Send + Sync + 'static>(
    terminal: &mut Terminal<B>,
    events: &mut dyn EventSource,
    view: &mut BrowseView,
    executor: &Executor<A>,
    completions: &Receiver<Completion>,
) -> Result<()> {
    executor.dispatch(view.start());
    while !view.should_quit() {
        terminal.draw(|frame| {
            let area = frame.area();
            view.render(frame, area);
        })?;

        let now = Instant::now();
        let timeout = view
            .next_deadline()
            .map_or(TICK, |at| at.saturating_duration_since(now).min(TICK));
        match events.poll(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                executor.dispatch(view.handle_key(key, Instant::now()));
            }
            _ => {}
        }

        while let Ok(completion) = completions.try_recv() {
            executor.dispatch(view.complete(completion, Instant::now()));
        }
        executor.dispatch(view.tick(Instant::now()));
    }
    Ok(())
}

/// Open the browse view against `client` until the user quits.
///
/// # Errors
///
/// Fails if the terminal cannot be put into raw mode or drawn to.
pub fn run_browse_tui(client: HttpClient, settings: SessionSettings) -> Result<()> {
    let (done, completions) = mpsc::channel();
    let executor = Executor {
        api: Arc::new(client),
        done,
    };
    let mut view = BrowseView::new(settings);

    let mut guard = TerminalGuard::enter()?;
    let result = run_loop(
        guard.terminal(),
        &mut CrosstermEvents,
        &mut view,
        &executor,
        &completions,
    );
    drop(guard);

    view.shutdown();
    result
}
