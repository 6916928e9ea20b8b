// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (year editing,
// scrolling, confirmation modes).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::protocol::UserCommand;

use super::{StatusKind, StatusLine, ViewState};

/// Maximum number of digits accepted in the year input.
const YEAR_INPUT_MAX_LEN: usize = 4;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator (draw, lock-in, discard, quit). Returns `None`
/// when the key press was handled locally by mutating `ViewState`
/// (year editing, scrolling, entering a confirmation mode).
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: only y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Lock-in confirmation mode
    if view_state.confirm_commit {
        return handle_confirm_commit(key_event, view_state);
    }

    // Year editing mode: capture digits and editing keys
    if view_state.editing_year {
        return handle_year_editing(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // Draw an assignment for the target year
        KeyCode::Char('g') => match view_state.target_year() {
            Some(year) => Some(UserCommand::Generate { year }),
            None => {
                view_state.status = Some(StatusLine::new(
                    format!("`{}` is not a valid year", view_state.year_input),
                    StatusKind::Error,
                ));
                None
            }
        },

        // Edit the target year
        KeyCode::Char('y') => {
            view_state.editing_year = true;
            None
        }

        // Lock in: enter confirmation mode when there is something to lock
        KeyCode::Char('c') => {
            if view_state.proposal.is_some() {
                view_state.confirm_commit = true;
            } else {
                view_state.status = Some(StatusLine::new(
                    "Nothing to lock in -- draw first",
                    StatusKind::Warn,
                ));
            }
            None
        }

        // Discard the pending proposal
        KeyCode::Char('d') => {
            if view_state.proposal.is_some() {
                Some(UserCommand::Discard)
            } else {
                None
            }
        }

        // History scrolling
        KeyCode::Up | KeyCode::Char('k') => {
            scroll_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            scroll_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            scroll_up(view_state, page_size());
            None
        }
        KeyCode::PageDown => {
            scroll_down(view_state, page_size());
            None
        }

        // Clear the status line
        KeyCode::Esc => {
            view_state.status = None;
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while in lock-in confirmation mode.
///
/// - `y` or Enter confirms (sends UserCommand::Commit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_commit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            view_state.confirm_commit = false;
            Some(UserCommand::Commit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_commit = false;
            None
        }
        _ => None, // Block all other input
    }
}

/// Handle key events while editing the target year.
///
/// - Digits are appended (up to four)
/// - Backspace removes the last digit
/// - Enter or Esc exits editing mode
fn handle_year_editing(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Enter | KeyCode::Esc => {
            view_state.editing_year = false;
            None
        }
        KeyCode::Backspace => {
            view_state.year_input.pop();
            None
        }
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if view_state.year_input.len() < YEAR_INPUT_MAX_LEN {
                view_state.year_input.push(c);
            }
            None
        }
        _ => None,
    }
}

/// Scroll the history panel up by the given number of lines.
fn scroll_up(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry("history".to_string())
        .or_insert(0);
    *offset = offset.saturating_sub(lines);
}

/// Scroll the history panel down by the given number of lines.
fn scroll_down(view_state: &mut ViewState, lines: usize) {
    let offset = view_state
        .scroll_offset
        .entry("history".to_string())
        .or_insert(0);
    *offset = offset.saturating_add(lines);
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    10
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
