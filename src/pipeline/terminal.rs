//! Terminal setup and teardown.
//!
//! Raw mode, alternate screen and a hidden cursor for the lifetime of a
//! [`TerminalSession`]. Teardown runs on drop as well, so a panic or an early
//! `?` return still leaves the user's shell usable.

use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::style::ResetColor;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};

/// Current terminal size as (columns, rows).
pub fn terminal_size() -> io::Result<(u16, u16)> {
    terminal::size()
}

/// An active fullscreen terminal session.
#[derive(Debug)]
pub struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        tracing::debug!("terminal session entered");
        Ok(Self { active: true })
    }

    /// Leave the alternate screen and restore the cursor and cooked mode.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let mut out = io::stdout();
        execute!(out, ResetColor, Show, LeaveAlternateScreen)?;
        out.flush()?;
        disable_raw_mode()?;
        tracing::debug!("terminal session restored");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}
