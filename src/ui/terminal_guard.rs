//! Terminal state guard that restores the shell on drop.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};

/// Set while some guard owns the terminal; the panic hook checks it
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII guard owning the dashboard terminal.
///
/// Restores raw mode, the alternate screen and the cursor on:
/// - Early returns via `?`
/// - Panics (via [`install_panic_hook`])
/// - Normal scope exit
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        execute!(io::stdout(), EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Restore the terminal once; later calls are no-ops.
    pub fn cleanup() {
        if TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
            let _ = io::stdout().flush();
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::cleanup();
    }
}

/// Install panic hook that restores terminal before printing panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        TerminalGuard::cleanup();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_runs_once() {
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);
        TerminalGuard::cleanup();
        assert!(!TERMINAL_ACTIVE.load(Ordering::SeqCst));

        // Second call finds nothing to restore
        TerminalGuard::cleanup();
        assert!(!TERMINAL_ACTIVE.load(Ordering::SeqCst));
    }
}
