use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, Local, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::backend::FileBackend;
use crate::io::prefs::{Prefs, read_prefs, write_prefs};
use crate::io::store::{Store, SyncStatus};
use crate::model::board::{AppState, Board, Task};
use crate::model::config::{AppConfig, ThemeColors, ThemeMode, UiConfig};
use crate::model::day::{DAYS_PER_WEEK, day_name};
use crate::ops::OpError;
use crate::ops::board_ops::{self, ensure_default_board};
use crate::ops::task_ops;

use super::debounce::Debouncer;
use super::input;
use super::modal::{Modal, ModalInput};
use super::render;
use super::theme::Theme;

/// How often the header clock (and today's weekday) is refreshed
const CLOCK_INTERVAL_SECS: i64 = 30;
/// Upper bound on how long the loop sleeps waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Today's tasks of the active board
    Flow,
    /// Edit boards and their day buckets
    Manage,
    /// One card per board
    Boards,
}

impl View {
    /// `manage` and `boards` select those views; anything else is flow
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("manage") => View::Manage,
            Some("boards") => View::Boards,
            _ => View::Flow,
        }
    }
}

/// Sub-tab of the flow view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowTab {
    #[default]
    Diagram,
    Checklist,
}

impl FlowTab {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowTab::Diagram => "diagram",
            FlowTab::Checklist => "checklist",
        }
    }

    pub fn parse_tab(s: &str) -> Option<Self> {
        match s {
            "diagram" => Some(FlowTab::Diagram),
            "checklist" => Some(FlowTab::Checklist),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FlowTab::Diagram => FlowTab::Checklist,
            FlowTab::Checklist => FlowTab::Diagram,
        }
    }
}

/// The inline add-task form at the bottom of the management view
#[derive(Debug, Clone)]
pub struct AddForm {
    pub time: ModalInput,
    pub title: ModalInput,
    /// Focus is on the title field (otherwise time)
    pub on_title: bool,
    pub error: Option<String>,
}

impl Default for AddForm {
    fn default() -> Self {
        AddForm {
            time: ModalInput::time("time", "Time", ""),
            title: ModalInput::text("title", "Title", ""),
            on_title: false,
            error: None,
        }
    }
}

/// Main application state
pub struct App {
    pub state: AppState,
    store: Store,
    /// Where local preferences are written (None in tests)
    prefs_dir: Option<PathBuf>,
    pub view: View,
    pub flow_tab: FlowTab,
    pub theme_mode: ThemeMode,
    pub theme: Theme,
    colors: ThemeColors,
    /// Header clock, refreshed on a timer
    pub clock: DateTime<Local>,
    /// Weekday shown by the flow view
    pub today: u8,
    /// Weekday selected in the management view
    pub manage_day: u8,
    pub checklist_cursor: usize,
    pub manage_cursor: usize,
    pub boards_cursor: usize,
    /// First visible row of the diagram
    pub flow_scroll: u16,
    pub modal: Option<Modal>,
    pub add_form: Option<AddForm>,
    pub sync_status: SyncStatus,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub resize: Debouncer,
}

impl App {
    pub fn new(state: AppState, store: Store, ui: &UiConfig, now: DateTime<Local>) -> Self {
        let today = now.weekday().num_days_from_sunday() as u8;
        let theme_mode = ThemeMode::default();
        App {
            state,
            store,
            prefs_dir: None,
            view: View::from_mode(ui.default_mode.as_deref()),
            flow_tab: FlowTab::default(),
            theme_mode,
            theme: Theme::for_mode(theme_mode, &ui.colors),
            colors: ui.colors.clone(),
            clock: now,
            today,
            manage_day: today,
            checklist_cursor: 0,
            manage_cursor: 0,
            boards_cursor: 0,
            flow_scroll: 0,
            modal: None,
            add_form: None,
            sync_status: SyncStatus::Idle,
            status_message: None,
            should_quit: false,
            resize: Debouncer::new(Duration::from_millis(ui.resize_debounce_ms)),
        }
    }

    pub fn active_board(&self) -> Option<&Board> {
        self.state.active_board()
    }

    pub fn active_board_id(&self) -> Option<String> {
        self.active_board().map(|b| b.id.clone())
    }

    /// Tasks of the active board for today (flow view)
    pub fn today_tasks(&self) -> &[Task] {
        self.active_board().map(|b| b.day(self.today)).unwrap_or(&[])
    }

    /// Tasks of the active board for the selected management day
    pub fn manage_tasks(&self) -> &[Task] {
        self.active_board()
            .map(|b| b.day(self.manage_day))
            .unwrap_or(&[])
    }

    /// Advance the clock. Returns true when the header needs a redraw.
    pub fn tick(&mut self, now: DateTime<Local>) -> bool {
        if (now - self.clock).num_seconds() < CLOCK_INTERVAL_SECS {
            return false;
        }
        self.clock = now;
        let today = now.weekday().num_days_from_sunday() as u8;
        if today != self.today {
            tracing::info!(day = day_name(today), "day changed");
            self.today = today;
            self.checklist_cursor = 0;
        }
        true
    }

    // --- preferences ---

    /// Load theme and flow tab from `.prefs.json` and remember where to write
    pub fn restore_prefs(&mut self, dir: &Path) {
        self.prefs_dir = Some(dir.to_path_buf());
        if let Some(prefs) = read_prefs(dir) {
            self.set_theme(prefs.theme);
            if let Some(tab) = prefs.flow_tab.as_deref().and_then(FlowTab::parse_tab) {
                self.flow_tab = tab;
            }
        }
    }

    pub fn save_prefs(&self) {
        let Some(dir) = &self.prefs_dir else {
            return;
        };
        let prefs = Prefs {
            theme: self.theme_mode,
            flow_tab: Some(self.flow_tab.as_str().to_string()),
        };
        if let Err(e) = write_prefs(dir, &prefs) {
            tracing::warn!(error = %e, "could not write preferences");
        }
    }

    pub fn set_theme(&mut self, mode: ThemeMode) {
        self.theme_mode = mode;
        self.theme = Theme::for_mode(mode, &self.colors);
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme_mode.toggled());
        self.save_prefs();
    }

    // --- mutations: each one persists the whole document on success ---

    fn persist(&mut self) {
        self.sync_status = self.store.save(&self.state);
    }

    fn report(&mut self, err: OpError) {
        tracing::warn!(error = %err, "operation rejected");
        self.status_message = Some(err.to_string());
    }

    fn after<T>(&mut self, result: Result<T, OpError>) -> Option<T> {
        match result {
            Ok(v) => {
                self.persist();
                self.clamp_cursors();
                Some(v)
            }
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    pub fn create_board(&mut self, name: &str) {
        let result = board_ops::create_board(&mut self.state, name, Utc::now());
        if self.after(result).is_some() {
            self.status_message = Some(format!("created \"{}\"", name.trim()));
        }
    }

    pub fn rename_board(&mut self, board_id: &str, name: &str) {
        let result = board_ops::rename_board(&mut self.state, board_id, name);
        self.after(result);
    }

    pub fn duplicate_board(&mut self, board_id: &str, name: &str) {
        let result = board_ops::duplicate_board(&mut self.state, board_id, name, Utc::now());
        if self.after(result).is_some() {
            self.status_message = Some(format!("duplicated as \"{}\"", name.trim()));
        }
    }

    pub fn remove_board(&mut self, board_id: &str) {
        let result = board_ops::remove_board(&mut self.state, board_id);
        if let Some(board) = self.after(result) {
            self.status_message = Some(format!("removed \"{}\"", board.name));
        }
    }

    pub fn set_active_board(&mut self, board_id: &str) {
        let result = board_ops::set_active_board(&mut self.state, board_id);
        if self.after(result).is_some() {
            self.manage_cursor = 0;
            self.checklist_cursor = 0;
        }
    }

    /// Boards overview "open": activate and show the flow view
    pub fn open_board(&mut self, board_id: &str) {
        self.set_active_board(board_id);
        if self.state.active_board_id.as_deref() == Some(board_id) {
            self.view = View::Flow;
        }
    }

    /// Make the previous/next board in list order active
    pub fn cycle_board(&mut self, delta: isize) {
        let len = self.state.boards.len();
        if len == 0 {
            return;
        }
        let current = self
            .state
            .active_board_id
            .as_deref()
            .and_then(|id| self.state.board_index(id))
            .unwrap_or(0);
        let next = (current as isize + delta).rem_euclid(len as isize) as usize;
        let id = self.state.boards[next].id.clone();
        self.set_active_board(&id);
    }

    pub fn add_task(&mut self, time: &str, title: &str) -> bool {
        let result = task_ops::add_task(&mut self.state, self.manage_day, time, title);
        match self.after(result) {
            Some(id) => {
                if let Some(pos) = self.manage_tasks().iter().position(|t| t.id == id) {
                    self.manage_cursor = pos;
                }
                true
            }
            None => false,
        }
    }

    pub fn toggle_task(&mut self, board_id: &str, day: u8, task_id: &str) {
        let result = task_ops::toggle_task(&mut self.state, board_id, day, task_id);
        self.after(result);
    }

    pub fn update_task(&mut self, board_id: &str, day: u8, task_id: &str, time: &str, title: &str) {
        let result = task_ops::update_task(&mut self.state, board_id, day, task_id, time, title);
        self.after(result);
    }

    pub fn remove_task(&mut self, board_id: &str, day: u8, task_id: &str) {
        let result = task_ops::remove_task(&mut self.state, board_id, day, task_id);
        self.after(result);
    }

    /// Template copy. An empty source day is a warning, not an error.
    pub fn copy_day(&mut self, board_id: &str, from: u8, to: u8) {
        match task_ops::copy_day(&mut self.state, board_id, from, to) {
            Ok(count) => {
                self.persist();
                self.manage_day = to;
                self.manage_cursor = 0;
                self.status_message = Some(format!(
                    "copied {} task{} to {}",
                    count,
                    if count == 1 { "" } else { "s" },
                    day_name(to)
                ));
            }
            Err(OpError::EmptySourceDay(_)) => {
                self.modal = Some(Modal::notice(
                    "Warning",
                    "The source day has no tasks to copy.",
                ));
            }
            Err(e) => self.report(e),
        }
    }

    pub fn select_manage_day(&mut self, day: u8) {
        self.manage_day = day % DAYS_PER_WEEK;
        self.manage_cursor = 0;
    }

    /// Keep every cursor inside its list after a mutation
    pub fn clamp_cursors(&mut self) {
        let clamp = |cursor: usize, len: usize| cursor.min(len.saturating_sub(1));
        self.checklist_cursor = clamp(self.checklist_cursor, self.today_tasks().len());
        self.manage_cursor = clamp(self.manage_cursor, self.manage_tasks().len());
        self.boards_cursor = clamp(self.boards_cursor, self.state.boards.len());
    }
}

/// Load the document, open the terminal and run until quit
pub fn run(
    config: &AppConfig,
    data_dir: &Path,
    mode: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::new(Box::new(FileBackend::new(data_dir)), config.store.row_id)
        .with_recovery_dir(data_dir);
    tracing::info!(store = %store.describe(), "starting");

    let mut state = store.load();
    let mut sync_status = SyncStatus::Idle;
    if ensure_default_board(&mut state, Utc::now()) {
        tracing::info!("created default board");
        sync_status = store.save(&state);
    }

    let mut app = App::new(state, store, &config.ui, Local::now());
    app.sync_status = sync_status;
    if mode.is_some() {
        app.view = View::from_mode(mode);
    }
    app.restore_prefs(data_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    app.save_prefs();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("exiting");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|frame| render::render(frame, app))?;
            needs_redraw = false;
        }

        let timeout = app
            .resize
            .time_until(Instant::now())
            .map_or(POLL_INTERVAL, |t| t.min(POLL_INTERVAL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                    needs_redraw = true;
                }
                Event::Resize(..) => app.resize.trigger(Instant::now()),
                _ => {}
            }
        }

        if app.resize.fire(Instant::now()) {
            needs_redraw = true;
        }
        if app.tick(Local::now()) {
            needs_redraw = true;
        }
        if app.should_quit {
            break;
        }
    }
    Ok(())
}
