// Message types exchanged between the app orchestrator and the TUI.

use crate::exchange::{Assignment, Year};

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Draw a fresh assignment for the given year.
    Generate { year: Year },
    /// Lock the pending proposal into history.
    Commit,
    /// Throw the pending proposal away.
    Discard,
    /// Shut down.
    Quit,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Full application snapshot (sent at startup and after commits).
    Snapshot(Box<AppSnapshot>),
    /// A fresh assignment was drawn and awaits confirmation.
    Proposal(Box<ProposalInfo>),
    /// The pending proposal was discarded.
    ProposalCleared,
    /// A draw exhausted its attempt budget. Retryable.
    GenerationFailed { year: Year, message: String },
    /// The proposal for `year` was locked into history.
    Committed { year: Year },
    /// Non-fatal notice (year already locked, nothing to commit, ...).
    Notice(String),
}

/// Everything the TUI needs to render the static parts of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub exchange_name: String,
    pub participant_count: usize,
    /// All recorded (year, assignment) entries in ascending year order.
    pub history: Vec<(Year, Assignment)>,
}

/// A drawn-but-uncommitted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalInfo {
    pub year: Year,
    pub assignment: Assignment,
}
