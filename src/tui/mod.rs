// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::exchange::{Assignment, Year};
use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// Severity of the status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warn,
    Error,
}

/// A transient message shown in the year banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusLine {
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        StatusLine {
            text: text.into(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Exchange display name from config.
    pub exchange_name: String,
    /// Number of configured participants.
    pub participant_count: usize,
    /// All recorded (year, assignment) entries in ascending year order.
    pub history: Vec<(Year, Assignment)>,
    /// The drawn assignment awaiting lock-in, if any.
    pub proposal: Option<(Year, Assignment)>,
    /// Target year text being edited.
    pub year_input: String,
    /// Whether the year input captures keystrokes.
    pub editing_year: bool,
    /// Whether the lock-in confirmation modal is showing.
    pub confirm_commit: bool,
    /// Whether the quit confirmation modal is showing.
    pub confirm_quit: bool,
    /// Transient status message, if any.
    pub status: Option<StatusLine>,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
}

impl ViewState {
    /// Create a view state with the year input pre-filled.
    pub fn new(initial_year: Year) -> Self {
        ViewState {
            exchange_name: String::new(),
            participant_count: 0,
            history: Vec::new(),
            proposal: None,
            year_input: initial_year.to_string(),
            editing_year: false,
            confirm_commit: false,
            confirm_quit: false,
            status: None,
            scroll_offset: HashMap::new(),
        }
    }

    /// Apply a full state snapshot from the app orchestrator.
    pub fn apply_snapshot(&mut self, snapshot: AppSnapshot) {
        self.exchange_name = snapshot.exchange_name;
        self.participant_count = snapshot.participant_count;
        self.history = snapshot.history;
    }

    /// The parsed target year, if the input is a valid year.
    pub fn target_year(&self) -> Option<Year> {
        self.year_input.parse().ok()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(2025)
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.apply_snapshot(*snapshot);
        }
        UiUpdate::Proposal(info) => {
            state.status = Some(StatusLine::new(
                format!("Drawn for {} -- press c to lock in", info.year),
                StatusKind::Info,
            ));
            state.proposal = Some((info.year, info.assignment));
        }
        UiUpdate::ProposalCleared => {
            state.proposal = None;
            state.status = Some(StatusLine::new("Assignment discarded", StatusKind::Info));
        }
        UiUpdate::GenerationFailed { year, message } => {
            state.status = Some(StatusLine::new(
                format!("Draw for {year} failed: {message}"),
                StatusKind::Error,
            ));
        }
        UiUpdate::Committed { year } => {
            state.proposal = None;
            state.status = Some(StatusLine::new(
                format!("Assignments for {year} locked in"),
                StatusKind::Success,
            ));
        }
        UiUpdate::Notice(message) => {
            state.status = Some(StatusLine::new(message, StatusKind::Warn));
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout = build_layout(area);

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::year_banner::render(frame, layout.year_banner, state);
    widgets::proposal::render(frame, layout.proposal, state);
    widgets::history::render(frame, layout.history, state);
    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_commit {
        widgets::confirm::render(frame, area, " Lock in? ", "Lock in this assignment?");
    }
    if state.confirm_quit {
        widgets::confirm::render(frame, area, " Quit? ", "Really quit?");
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    initial_year: Year,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::new(initial_year);

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        let command = input::handle_key(key_event, &mut view_state);
                        if let Some(cmd) = command {
                            let quitting = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quitting {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProposalInfo;

    fn assignment() -> Assignment {
        Assignment::from_pairs([("A", "B"), ("B", "A")])
    }

    #[test]
    fn view_state_new_prefills_year() {
        let state = ViewState::new(2026);
        assert_eq!(state.year_input, "2026");
        assert_eq!(state.target_year(), Some(2026));
        assert!(state.history.is_empty());
        assert!(state.proposal.is_none());
        assert!(state.status.is_none());
        assert!(!state.editing_year);
        assert!(!state.confirm_commit);
        assert!(!state.confirm_quit);
        assert!(state.scroll_offset.is_empty());
    }

    #[test]
    fn target_year_rejects_garbage() {
        let mut state = ViewState::default();
        state.year_input = "20x5".to_string();
        assert_eq!(state.target_year(), None);
        state.year_input.clear();
        assert_eq!(state.target_year(), None);
    }

    #[test]
    fn apply_snapshot_updates_fields() {
        let mut state = ViewState::default();
        let snapshot = AppSnapshot {
            exchange_name: "Family Secret Santa".to_string(),
            participant_count: 14,
            history: vec![(2023, assignment())],
        };
        state.apply_snapshot(snapshot);
        assert_eq!(state.exchange_name, "Family Secret Santa");
        assert_eq!(state.participant_count, 14);
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn apply_ui_update_proposal() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Proposal(Box::new(ProposalInfo {
                year: 2025,
                assignment: assignment(),
            })),
        );
        assert_eq!(state.proposal, Some((2025, assignment())));
        let status = state.status.unwrap();
        assert_eq!(status.kind, StatusKind::Info);
        assert!(status.text.contains("2025"));
    }

    #[test]
    fn apply_ui_update_proposal_cleared() {
        let mut state = ViewState::default();
        state.proposal = Some((2025, assignment()));
        apply_ui_update(&mut state, UiUpdate::ProposalCleared);
        assert!(state.proposal.is_none());
    }

    #[test]
    fn apply_ui_update_committed_clears_proposal() {
        let mut state = ViewState::default();
        state.proposal = Some((2025, assignment()));
        apply_ui_update(&mut state, UiUpdate::Committed { year: 2025 });
        assert!(state.proposal.is_none());
        let status = state.status.unwrap();
        assert_eq!(status.kind, StatusKind::Success);
        assert!(status.text.contains("locked in"));
    }

    #[test]
    fn apply_ui_update_generation_failed() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::GenerationFailed {
                year: 2025,
                message: "no valid assignment".to_string(),
            },
        );
        assert!(state.proposal.is_none());
        let status = state.status.unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("no valid assignment"));
    }

    #[test]
    fn apply_ui_update_notice() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Notice("already locked in".to_string()));
        let status = state.status.unwrap();
        assert_eq!(status.kind, StatusKind::Warn);
    }

    #[test]
    fn apply_ui_update_snapshot_preserves_proposal() {
        let mut state = ViewState::default();
        state.proposal = Some((2025, assignment()));
        apply_ui_update(
            &mut state,
            UiUpdate::Snapshot(Box::new(AppSnapshot {
                exchange_name: "X".to_string(),
                participant_count: 2,
                history: vec![],
            })),
        );
        assert!(state.proposal.is_some());
    }

    #[test]
    fn render_frame_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.exchange_name = "Family Secret Santa".to_string();
        state.participant_count = 14;
        state.history = vec![(2023, assignment()), (2024, assignment())];
        state.proposal = Some((2025, assignment()));
        state.confirm_commit = true;
        terminal
            .draw(|frame| render_frame(frame, &state))
            .unwrap();
    }
}
