//! Application state for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::ListState;
use standup_core::{Engine, HistoryEntry, Phase, SessionConfig, TurnOutcome};

/// Current view mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Roster and knob editing plus the storage hub.
    #[default]
    Setup,
    /// The running session: roster, stage, status feed.
    Daily,
    /// Stats and the next-owner reveal.
    Summary,
    /// The persisted session log.
    History,
}

/// Main application state.
pub struct App {
    /// The session engine.
    pub engine: Engine,
    /// Current view mode.
    pub view_mode: ViewMode,
    /// Comma-separated names buffer on the setup screen.
    pub names_input: String,
    /// Auto-transition knob being edited.
    pub auto_transition: bool,
    /// Per-speaker limit knob being edited, in minutes.
    pub max_minutes: u32,
    /// Last-saved session config, shown in the storage hub panel.
    pub stored_config: SessionConfig,
    /// Brief feedback after a push to storage; cleared on the next key.
    pub saved_feedback: bool,
    /// Roster selection in the daily view.
    pub roster_state: ListState,
    /// Add-participant input line, when open.
    pub name_entry: Option<String>,
    /// History entries loaded when the history view opens.
    pub history_entries: Vec<HistoryEntry>,
    /// Scroll offset in the history view.
    pub history_scroll: usize,
    /// Where the history view returns to.
    history_return: ViewMode,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    /// Create a new App around the engine, seeding the setup screen from
    /// the saved session config.
    pub fn new(engine: Engine) -> Self {
        let stored_config = engine.load_session_config();
        let names_input = stored_config.names.join(", ");
        let auto_transition = stored_config.auto_transition;
        let max_minutes = stored_config.max_time_minutes.max(1);
        Self {
            engine,
            view_mode: ViewMode::default(),
            names_input,
            auto_transition,
            max_minutes,
            stored_config,
            saved_feedback: false,
            roster_state: ListState::default(),
            name_entry: None,
            history_entries: Vec::new(),
            history_scroll: 0,
            history_return: ViewMode::Setup,
            should_quit: false,
        }
    }

    /// Advance the engine clock and follow its phase with the view.
    pub fn advance(&mut self, now_ms: u64) {
        self.engine.advance(now_ms);
        if self.engine.phase() == Phase::Summary && self.view_mode == ViewMode::Daily {
            self.view_mode = ViewMode::Summary;
        }
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view_mode {
            ViewMode::Setup => self.handle_setup_key(key),
            ViewMode::Daily => self.handle_daily_key(key),
            ViewMode::Summary => self.handle_summary_key(key),
            ViewMode::History => self.handle_history_key(key),
        }
    }

    // ========== Setup ==========

    fn handle_setup_key(&mut self, key: KeyEvent) {
        self.saved_feedback = false;
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('s') => self.push_config(),
                KeyCode::Char('l') => self.pull_config(),
                KeyCode::Char('h') => self.open_history(ViewMode::Setup),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Enter => self.start_session(),
            KeyCode::Tab => self.auto_transition = !self.auto_transition,
            KeyCode::Up => self.max_minutes = (self.max_minutes + 1).min(60),
            KeyCode::Down => self.max_minutes = self.max_minutes.saturating_sub(1).max(1),
            KeyCode::Backspace => {
                self.names_input.pop();
            }
            KeyCode::Char(c) => self.names_input.push(c),
            _ => {}
        }
    }

    fn start_session(&mut self) {
        let names = parse_names(&self.names_input);
        if names.is_empty() {
            return;
        }
        self.engine
            .start(&names, self.auto_transition, self.max_minutes * 60);
        self.roster_state = ListState::default();
        if !self.engine.participants().is_empty() {
            self.roster_state.select(Some(0));
        }
        self.name_entry = None;
        self.view_mode = ViewMode::Daily;
    }

    /// Copy the saved config back into the edit buffers.
    fn pull_config(&mut self) {
        self.stored_config = self.engine.load_session_config();
        self.names_input = self.stored_config.names.join(", ");
        self.auto_transition = self.stored_config.auto_transition;
        self.max_minutes = self.stored_config.max_time_minutes.max(1);
    }

    /// Save the edit buffers as the new session defaults.
    fn push_config(&mut self) {
        let names = parse_names(&self.names_input);
        let config = SessionConfig {
            // An empty buffer keeps the previously saved roster.
            names: if names.is_empty() {
                self.stored_config.names.clone()
            } else {
                names
            },
            max_time_minutes: self.max_minutes,
            auto_transition: self.auto_transition,
        };
        self.engine.save_session_config(&config);
        self.stored_config = config;
        self.saved_feedback = true;
    }

    // ========== Daily ==========

    fn handle_daily_key(&mut self, key: KeyEvent) {
        // The add-participant line swallows everything while open.
        if self.name_entry.is_some() {
            match key.code {
                KeyCode::Esc => self.name_entry = None,
                KeyCode::Enter => {
                    if let Some(name) = self.name_entry.take() {
                        if !name.trim().is_empty() {
                            self.engine.add_participant(&name);
                        }
                    }
                }
                KeyCode::Backspace => {
                    if let Some(buffer) = self.name_entry.as_mut() {
                        buffer.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(buffer) = self.name_entry.as_mut() {
                        buffer.push(c);
                    }
                }
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                // Abort the run, back to setup.
                self.engine.reset();
                self.view_mode = ViewMode::Setup;
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.engine.execute_selection(),
            KeyCode::Char('c') => self.engine.act(TurnOutcome::Completed),
            KeyCode::Char('s') => self.engine.act(TurnOutcome::Skipped),
            KeyCode::Char('d') => self.engine.act(TurnOutcome::Deferred),
            KeyCode::Char('a') => self.name_entry = Some(String::new()),
            KeyCode::Char('r') => self.rewind_selected(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            _ => {}
        }
    }

    /// Rewind the roster row under the cursor. The engine ignores it for
    /// pending or speaking participants.
    fn rewind_selected(&mut self) {
        if let Some(idx) = self.roster_state.selected() {
            if let Some(id) = self.engine.participants().get(idx).map(|p| p.id) {
                self.engine.rewind(id);
            }
        }
    }

    /// Select the next roster row.
    fn select_next(&mut self) {
        let len = self.engine.participants().len();
        if len == 0 {
            return;
        }
        let i = match self.roster_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.roster_state.select(Some(i));
    }

    /// Select the previous roster row.
    fn select_previous(&mut self) {
        let len = self.engine.participants().len();
        if len == 0 {
            return;
        }
        let i = match self.roster_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.roster_state.select(Some(i));
    }

    // ========== Summary ==========

    fn handle_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Esc => {
                self.engine.reset();
                self.view_mode = ViewMode::Setup;
            }
            KeyCode::Char('h') => self.open_history(ViewMode::Summary),
            _ => {}
        }
    }

    // ========== History ==========

    fn open_history(&mut self, return_to: ViewMode) {
        self.history_entries = self.engine.history();
        self.history_return = return_to;
        self.history_scroll = 0;
        self.view_mode = ViewMode::History;
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.view_mode = self.history_return,
            KeyCode::Char('c') => {
                self.engine.clear_history();
                self.history_entries.clear();
                self.history_scroll = 0;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.history_scroll = self.history_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_scroll = self.history_scroll.saturating_sub(1);
            }
            KeyCode::Home | KeyCode::Char('g') => self.history_scroll = 0,
            _ => {}
        }
    }
}

/// Split the setup buffer into clean names; commas and newlines separate.
pub fn parse_names(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_splits_and_trims() {
        assert_eq!(
            parse_names("Alice, Bob\n  Carol ,, "),
            vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()]
        );
        assert!(parse_names("  , ,\n").is_empty());
    }
}
