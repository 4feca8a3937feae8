//! One screen per flow. Each dashboard owns its `Workflow`, so dropping the
//! dashboard aborts whatever simulated action it still has in flight.

mod donor;
mod ngo;
mod sign_in;
mod volunteer;

pub use donor::DonorDashboard;
pub use ngo::NgoDashboard;
pub use sign_in::SignInDashboard;
pub use volunteer::VolunteerDashboard;

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;
use tracing::debug;

use crate::workflow::{Flow, Workflow};

/// Keys every dashboard shares: step jumps, ungated prev/next, primary
pub(crate) fn handle_step_key<F: Flow>(wf: &mut Workflow<F>, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(n) = c.to_digit(10) {
                wf.go_to_step(n as usize);
            }
            true
        }
        KeyCode::Left | KeyCode::Char('h') => {
            wf.prev();
            true
        }
        KeyCode::Right | KeyCode::Char('l') => {
            wf.next();
            true
        }
        KeyCode::Enter => {
            match wf.primary() {
                Ok(outcome) => debug!(flow = wf.flow().name(), ?outcome, "Primary action"),
                Err(err) => debug!(flow = wf.flow().name(), %err, "Primary action unavailable"),
            }
            true
        }
        _ => false,
    }
}

/// Start a side action, logging instead of failing when it is unavailable
pub(crate) fn run_logged<F: Flow>(wf: &mut Workflow<F>, action: F::Action) {
    let label = format!("{action:?}");
    if let Err(err) = wf.run_action(action) {
        debug!(flow = wf.flow().name(), action = %label, %err, "Action unavailable");
    }
}

/// Move a list cursor with ↑/↓ (k/j), clamped to `len`
pub(crate) fn move_cursor(state: &mut ListState, len: usize, code: KeyCode) -> bool {
    if len == 0 {
        state.select(None);
        return matches!(code, KeyCode::Up | KeyCode::Down | KeyCode::Char('k' | 'j'));
    }
    let current = state.selected().unwrap_or(0).min(len - 1);
    let next = match code {
        KeyCode::Up | KeyCode::Char('k') => current.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => (current + 1).min(len - 1),
        _ => return false,
    };
    state.select(Some(next));
    true
}

#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_cursor_clamps() {
        let mut state = ListState::default();
        assert!(move_cursor(&mut state, 3, KeyCode::Up));
        assert_eq!(state.selected(), Some(0));

        for _ in 0..5 {
            move_cursor(&mut state, 3, KeyCode::Char('j'));
        }
        assert_eq!(state.selected(), Some(2));
        assert!(!move_cursor(&mut state, 3, KeyCode::Enter));
    }

    #[test]
    fn test_move_cursor_on_empty_list() {
        let mut state = ListState::default();
        state.select(Some(4));
        assert!(move_cursor(&mut state, 0, KeyCode::Down));
        assert_eq!(state.selected(), None);
    }
}
