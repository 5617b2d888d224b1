use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use phrase_board_core::{Result, Size};

/// Raw mode + alternate screen for the lifetime of the value.
///
/// Dropping it restores the terminal, including on error paths.
#[derive(Debug)]
pub struct TerminalSession {
    _private: (),
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        tracing::debug!("entered alternate screen");
        Ok(Self { _private: () })
    }

    pub fn size() -> Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size::new(width, height))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        let _ = stdout.flush();
    }
}
