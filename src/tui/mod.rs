#![forbid(unsafe_code)]

pub mod app;
pub mod swatches;
pub mod view;

use std::io;
use std::io::IsTerminal as _;

use crate::error::TodoError;

pub type CrosstermTerminal = ratatui::Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>;

#[must_use]
pub fn is_tty() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

pub fn init_terminal() -> Result<CrosstermTerminal, TodoError> {
    use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
    use ratatui::backend::CrosstermBackend;

    enable_raw_mode().map_err(|e| TodoError::Terminal(format!("failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    let entered = crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::terminal::SetTitle("tinttodo")
    )
    .map_err(|e| TodoError::Terminal(format!("failed to enter alt screen: {e}")));
    undo_on_err(entered, || {
        let _ = disable_raw_mode();
    })?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = ratatui::Terminal::new(backend)
        .map_err(|e| TodoError::Terminal(format!("failed to create terminal: {e}")));
    undo_on_err(terminal, || {
        let _ = crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

/// Runs `undo` when a setup step failed, before the guard exists to do it.
fn undo_on_err<T>(res: Result<T, TodoError>, undo: impl FnOnce()) -> Result<T, TodoError> {
    if res.is_err() {
        undo();
    }
    res
}

pub fn restore_terminal(mut terminal: CrosstermTerminal) -> Result<(), TodoError> {
    use crossterm::terminal::disable_raw_mode;

    disable_raw_mode()
        .map_err(|e| TodoError::Terminal(format!("failed to disable raw mode: {e}")))?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )
    .map_err(|e| TodoError::Terminal(format!("failed to leave alt screen: {e}")))?;
    terminal
        .show_cursor()
        .map_err(|e| TodoError::Terminal(format!("failed to show cursor: {e}")))?;
    Ok(())
}

/// Restores the terminal on every exit path, including panics unwinding
/// through the event loop.
pub struct TerminalGuard {
    pub terminal: Option<CrosstermTerminal>,
}

impl TerminalGuard {
    #[must_use]
    pub fn new(terminal: CrosstermTerminal) -> Self {
        Self {
            terminal: Some(terminal),
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Some(terminal) = self.terminal.take() {
            let _ = restore_terminal(terminal);
        }
    }
}
