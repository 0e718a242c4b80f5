//! Interactive checklist
//!
//! A single flat list: tier and section headers, actionable task rows, and
//! the rotating timer rows, with a cursor over the selectable entries. The
//! event loop doubles as the minute tick: every pass re-runs the reconciler
//! and recomputes timer readings, so a reset boundary crossing while the UI
//! is open clears the affected rows in place.

use std::io;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use ratatui::layout::Rect;

use crate::error::Result;
use crate::storage::Storage;
use crate::tracker::{RowView, Tracker};

use super::view;

const EVENT_POLL_MS: u64 = 500;

/// One visual row in the flat checklist
pub(crate) enum ListRow {
    TierHeader(&'static str),
    SectionHeader(String),
    Task { id: String, selected: bool },
    Break,
    Timer { id: String, label: String, selected: bool },
}

impl ListRow {
    pub(crate) fn selectable(&self) -> bool {
        matches!(self, ListRow::Task { .. } | ListRow::Timer { .. })
    }

    fn id(&self) -> Option<&str> {
        match self {
            ListRow::Task { id, .. } | ListRow::Timer { id, .. } => Some(id),
            _ => None,
        }
    }
}

pub struct AppState {
    pub(crate) rows: Vec<ListRow>,
    pub(crate) cursor: usize,
    pub(crate) header: String,
    pub(crate) info_message: Option<String>,
    tracker: Tracker,
    storage: Storage,
    should_quit: bool,
}

impl AppState {
    fn new(storage: Storage, tracker: Tracker) -> Self {
        let mut app = Self {
            rows: Vec::new(),
            cursor: 0,
            header: String::new(),
            info_message: None,
            tracker,
            storage,
            should_quit: false,
        };
        app.refresh();
        app
    }

    /// Re-run the reconciler and rebuild the row list from the render model
    fn refresh(&mut self) {
        let now = Utc::now();
        let actions = self.tracker.tick(now);
        if actions.any() {
            self.info_message = Some(if actions.clear_weekly {
                "daily + weekly reset".to_string()
            } else {
                "daily reset".to_string()
            });
            self.persist();
        }

        let model = self.tracker.render_model(now);
        self.header = format!(
            "dailies \u{2014} reset in {:.2} hrs \u{2014} {} daily / {} weekly open",
            model.hours_to_daily_reset, model.daily_actionable, model.weekly_actionable
        );

        let cursor_id = self.rows.get(self.cursor).and_then(ListRow::id).map(str::to_string);
        self.rows.clear();

        for (tier, sections) in [("Daily Tasks", &model.daily), ("Weekly Tasks", &model.weekly)] {
            self.rows.push(ListRow::TierHeader(tier));
            for section in sections {
                self.rows.push(ListRow::SectionHeader(section.title.clone()));
                for row in &section.rows {
                    self.rows.push(match row {
                        RowView::Task { id, selected } => ListRow::Task {
                            id: id.clone(),
                            selected: *selected,
                        },
                        RowView::Break => ListRow::Break,
                    });
                }
            }
        }
        if !model.timers.is_empty() {
            self.rows.push(ListRow::TierHeader("Custom Timers"));
            for timer in &model.timers {
                self.rows.push(ListRow::Timer {
                    id: timer.id.clone(),
                    label: timer.label(),
                    selected: timer.selected,
                });
            }
        }

        // Keep the cursor on the same task if it survived the rebuild.
        self.cursor = cursor_id
            .and_then(|id| {
                self.rows
                    .iter()
                    .position(|row| row.id() == Some(id.as_str()))
            })
            .or_else(|| self.first_selectable())
            .unwrap_or(0);
    }

    fn first_selectable(&self) -> Option<usize> {
        self.rows.iter().position(ListRow::selectable)
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.rows.len();
        if len == 0 {
            return;
        }
        let mut idx = self.cursor;
        for _ in 0..len {
            idx = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            if self.rows[idx].selectable() {
                self.cursor = idx;
                return;
            }
        }
    }

    fn cursor_id(&self) -> Option<String> {
        self.rows
            .get(self.cursor)
            .and_then(ListRow::id)
            .map(str::to_string)
    }

    fn persist(&mut self) {
        if let Err(err) = self.tracker.save(&self.storage) {
            self.info_message = Some(format!("save failed: {err}"));
        }
    }

    /// Record the terminal size on shutdown, best-effort
    fn save_geometry(&self, area: Rect) {
        let mut geometry = self.storage.load_window();
        geometry.width = u32::from(area.width);
        geometry.height = u32::from(area.height);
        let _ = self.storage.save_window(&geometry);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_cursor(true),
            KeyCode::Char('k') | KeyCode::Up => self.move_cursor(false),
            KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_id() {
                    match self.tracker.toggle_selection(&id) {
                        Ok(_) => self.persist(),
                        Err(err) => self.info_message = Some(format!("{err}")),
                    }
                    self.refresh();
                }
            }
            KeyCode::Char('c') => {
                let completed = self.tracker.complete_checked();
                self.info_message = Some(format!("{} task(s) completed", completed.len()));
                self.persist();
                self.refresh();
            }
            KeyCode::Char('r') => {
                self.tracker.reset_all();
                self.info_message = Some("all visible tasks reset".to_string());
                self.persist();
                self.refresh();
            }
            KeyCode::Char('h') => {
                if let Some(id) = self.cursor_id() {
                    match self.tracker.set_visible(&id, false) {
                        Ok(()) => {
                            self.info_message = Some(format!("hidden: {id}"));
                            self.persist();
                        }
                        Err(err) => self.info_message = Some(format!("{err}")),
                    }
                    self.refresh();
                }
            }
            KeyCode::Char('d') => {
                self.tracker
                    .simulate_tier_reset(crate::catalog::TierGroup::Daily);
                self.info_message = Some("simulated daily reset".to_string());
                self.persist();
                self.refresh();
            }
            KeyCode::Char('w') => {
                self.tracker
                    .simulate_tier_reset(crate::catalog::TierGroup::Weekly);
                self.info_message = Some("simulated weekly reset".to_string());
                self.persist();
                self.refresh();
            }
            _ => {}
        }
    }
}

/// Run the interactive checklist until the user quits
pub fn run(storage: Storage, tracker: Tracker) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, AppState::new(storage, tracker));

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: AppState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view::render(frame, &mut app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        } else {
            // Idle pass: pick up boundary crossings and countdown changes.
            app.refresh();
        }

        if app.should_quit {
            app.persist();
            if let Ok(area) = terminal.size() {
                app.save_geometry(area);
            }
            return Ok(());
        }
    }
}
