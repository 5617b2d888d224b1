use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use phrase_board_core::{BoardState, CategoryFilter, ScrollState};

use crate::demo::DemoSource;

/// Rows moved by PgUp/PgDn.
const PAGE: usize = 10;

/// What the run loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    TogglePlayback,
    NextTrack,
    /// Back to the first page; the dashboard replays its flip-in.
    ResetBoard,
    Quit,
}

/// UI state that survives between ticks.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub selected: CategoryFilter,
    pub scroll: ScrollState,
    pub show_help: bool,
    pub show_debug: bool,
    pub exit_warning: bool,
}

impl UiState {
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);

        if self.exit_warning {
            self.exit_warning = false;
            return match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => Action::Quit,
                _ if ctrl_c => Action::Quit,
                _ => Action::Continue,
            };
        }

        if ctrl_c {
            self.exit_warning = true;
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.exit_warning = true,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
                self.select(self.selected.next())
            }
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
                self.select(self.selected.previous())
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(PAGE as isize),
            KeyCode::PageUp => self.scroll_by(-(PAGE as isize)),
            KeyCode::Home => self.scroll.offset = 0,
            KeyCode::End => self.scroll.offset = self.scroll.max_scroll,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Char('d') => self.show_debug = !self.show_debug,
            KeyCode::Char(' ') => return Action::TogglePlayback,
            KeyCode::Char('n') | KeyCode::Char('N') => return Action::NextTrack,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.select(CategoryFilter::All);
                return Action::ResetBoard;
            }
            _ => {}
        }
        Action::Continue
    }

    fn select(&mut self, filter: CategoryFilter) {
        self.selected = filter;
        self.scroll = ScrollState::default();
    }

    fn scroll_by(&mut self, delta: isize) {
        let offset = self.scroll.offset.saturating_add_signed(delta);
        self.scroll.offset = offset.min(self.scroll.max_scroll);
    }

    /// Stores the clamped scroll state echoed back by the dashboard.
    pub fn apply_scroll(&mut self, scroll: ScrollState) {
        self.scroll = scroll;
    }

    /// Assembles the per-tick input for the dashboard.
    pub fn board_state(&self, source: &DemoSource, logs: Vec<String>, now_ms: i64) -> BoardState {
        let track = source.track().cloned();
        let debug_message = self.show_debug.then(|| {
            format!(
                "scroll {}/{} · filter {}",
                self.scroll.offset,
                self.scroll.max_scroll,
                self.selected.label()
            )
        });
        BoardState {
            phrase: track.as_ref().map(|track| track.phrase_info(now_ms)),
            track,
            recommendations: source.recommendations(),
            show_exit_warning: self.exit_warning,
            debug_message,
            log_lines: if self.show_debug { logs } else { Vec::new() },
            selected: self.selected,
            scroll_offset: self.scroll.offset,
            show_help: self.show_help,
            notices: source.notices().to_vec(),
            library_size: source.library_size(),
        }
    }
}
