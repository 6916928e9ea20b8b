// Application state and orchestration logic.
//
// The central loop that applies user commands from the TUI to the domain
// core and pushes UI updates back. Owns the history, the persistence
// store, and the pending (drawn but uncommitted) proposal.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::exchange::{self, Assignment, History, ProposeError, Year};
use crate::protocol::{AppSnapshot, ProposalInfo, UiUpdate, UserCommand};
use crate::store::HistoryStore;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub history: History,
    pub store: HistoryStore,
    /// The drawn assignment awaiting lock-in, if any.
    pub proposal: Option<(Year, Assignment)>,
}

impl AppState {
    pub fn new(config: Config, history: History, store: HistoryStore) -> Self {
        AppState {
            config,
            history,
            store,
            proposal: None,
        }
    }

    /// Build an `AppSnapshot` from the current application state.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            exchange_name: self.config.exchange.name.clone(),
            participant_count: self.config.exchange.participants.len(),
            history: self
                .history
                .iter()
                .map(|(year, assignment)| (year, assignment.clone()))
                .collect(),
        }
    }

    /// Draw a fresh assignment for `year`, replacing any pending proposal.
    fn draw(&mut self, year: Year) -> Result<Assignment, ProposeError> {
        let mut rng = StdRng::from_entropy();
        let assignment = exchange::propose(year, &self.config.exchange, &self.history, &mut rng)?;
        self.proposal = Some((year, assignment.clone()));
        Ok(assignment)
    }

    /// Lock the pending proposal into history and persist it.
    ///
    /// History is only adopted in memory after the save succeeds, so a
    /// failed write leaves both the file and the in-memory record
    /// unchanged and keeps the proposal pending for a retry.
    fn lock_in(&mut self) -> Result<Option<Year>, String> {
        let Some((year, assignment)) = self.proposal.take() else {
            return Ok(None);
        };

        let mut next = self.history.clone();
        if let Err(e) = exchange::commit(year, assignment.clone(), &mut next) {
            self.proposal = Some((year, assignment));
            return Err(e.to_string());
        }
        if let Err(e) = self.store.save(&next) {
            warn!("failed to persist history: {e}");
            self.proposal = Some((year, assignment));
            return Err(format!("could not save history: {e}"));
        }

        self.history = next;
        Ok(Some(year))
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application loop.
///
/// Sends an initial snapshot, then applies `UserCommand`s until the
/// channel closes or a `Quit` arrives, pushing `UiUpdate`s through
/// `ui_tx` for the TUI render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            Some(cmd) => {
                handle_user_command(&mut state, cmd, &ui_tx).await;
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Handle a single user command, mutating state and pushing updates.
async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Generate { year } => match state.draw(year) {
            Ok(assignment) => {
                info!(year, "proposal drawn");
                let _ = ui_tx
                    .send(UiUpdate::Proposal(Box::new(ProposalInfo { year, assignment })))
                    .await;
            }
            Err(ProposeError::AlreadyRecorded { year }) => {
                let _ = ui_tx
                    .send(UiUpdate::Notice(format!(
                        "Assignments for {year} are already locked in"
                    )))
                    .await;
            }
            Err(ProposeError::Infeasible(e)) => {
                warn!(year, "draw failed: {e}");
                let _ = ui_tx
                    .send(UiUpdate::GenerationFailed {
                        year,
                        message: format!("{e}; draw again or loosen the restrictions"),
                    })
                    .await;
            }
        },

        UserCommand::Commit => match state.lock_in() {
            Ok(Some(year)) => {
                let _ = ui_tx.send(UiUpdate::Committed { year }).await;
                let snapshot = state.build_snapshot();
                let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
            }
            Ok(None) => {
                let _ = ui_tx
                    .send(UiUpdate::Notice("No drawn assignment to lock in".to_string()))
                    .await;
            }
            Err(message) => {
                let _ = ui_tx.send(UiUpdate::Notice(message)).await;
            }
        },

        UserCommand::Discard => {
            if state.proposal.take().is_some() {
                info!("proposal discarded");
                let _ = ui_tx.send(UiUpdate::ProposalCleared).await;
            }
        }

        // Quit is handled by the run loop before dispatch.
        UserCommand::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExchangeConfig;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Helper: a four-person, two-group exchange with empty history,
    /// persisting into the given scratch directory.
    fn test_state(dir: &std::path::Path) -> AppState {
        let exchange = ExchangeConfig::from_groups(
            "Test Exchange",
            10_000,
            &[
                ("east", &["A", "B"], &["west"]),
                ("west", &["C", "D"], &["east"]),
            ],
        );
        let config = Config {
            exchange,
            history_path: "history.json".to_string(),
        };
        let store = HistoryStore::new(dir.join("history.json"));
        AppState::new(config, History::default(), store)
    }

    /// Spawn the app loop and hand back its channels.
    fn spawn_app(
        state: AppState,
    ) -> (
        mpsc::Sender<UserCommand>,
        mpsc::Receiver<UiUpdate>,
        tokio::task::JoinHandle<anyhow::Result<()>>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));
        (cmd_tx, ui_rx, handle)
    }

    #[tokio::test]
    async fn sends_initial_snapshot() {
        let dir = scratch_dir("app_initial_snapshot");
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state(&dir));

        let update = ui_rx.recv().await.unwrap();
        match update {
            UiUpdate::Snapshot(snapshot) => {
                assert_eq!(snapshot.exchange_name, "Test Exchange");
                assert_eq!(snapshot.participant_count, 4);
                assert!(snapshot.history.is_empty());
            }
            other => panic!("expected Snapshot, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn generate_produces_proposal() {
        let dir = scratch_dir("app_generate_proposal");
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state(&dir));

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();

        let update = ui_rx.recv().await.unwrap();
        match update {
            UiUpdate::Proposal(info) => {
                assert_eq!(info.year, 2025);
                assert_eq!(info.assignment.len(), 4);
                assert!(!info.assignment.has_fixed_point());
            }
            other => panic!("expected Proposal, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn commit_persists_and_snapshots() {
        let dir = scratch_dir("app_commit_persists");
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state(&dir));

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();
        let proposal = match ui_rx.recv().await.unwrap() {
            UiUpdate::Proposal(info) => info,
            other => panic!("expected Proposal, got: {other:?}"),
        };

        cmd_tx.send(UserCommand::Commit).await.unwrap();

        match ui_rx.recv().await.unwrap() {
            UiUpdate::Committed { year } => assert_eq!(year, 2025),
            other => panic!("expected Committed, got: {other:?}"),
        }
        match ui_rx.recv().await.unwrap() {
            UiUpdate::Snapshot(snapshot) => {
                assert_eq!(snapshot.history.len(), 1);
                assert_eq!(snapshot.history[0].0, 2025);
                assert_eq!(snapshot.history[0].1, proposal.assignment);
            }
            other => panic!("expected Snapshot, got: {other:?}"),
        }

        // The file must hold exactly what was committed.
        let store = HistoryStore::new(dir.join("history.json"));
        let loaded = store.load().unwrap();
        assert_eq!(loaded.get(2025), Some(&proposal.assignment));

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn commit_without_proposal_is_a_notice() {
        let dir = scratch_dir("app_commit_nothing");
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state(&dir));

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx.send(UserCommand::Commit).await.unwrap();

        match ui_rx.recv().await.unwrap() {
            UiUpdate::Notice(message) => assert!(message.contains("No drawn assignment")),
            other => panic!("expected Notice, got: {other:?}"),
        }

        // Nothing persisted.
        assert!(!dir.join("history.json").exists());

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn generate_for_recorded_year_is_refused() {
        let dir = scratch_dir("app_generate_recorded");
        let mut state = test_state(&dir);
        state
            .history
            .record(2025, Assignment::from_pairs([("A", "C"), ("B", "D"), ("C", "B"), ("D", "A")]))
            .unwrap();
        let (cmd_tx, mut ui_rx, handle) = spawn_app(state);

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();

        match ui_rx.recv().await.unwrap() {
            UiUpdate::Notice(message) => assert!(message.contains("already locked in")),
            other => panic!("expected Notice, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn infeasible_draw_reports_failure() {
        let dir = scratch_dir("app_infeasible");
        // Two participants whose only pairing is already recorded.
        let exchange = ExchangeConfig::from_groups(
            "Tiny",
            200,
            &[("all", &["A", "B"], &["all"])],
        );
        let config = Config {
            exchange,
            history_path: "history.json".to_string(),
        };
        let mut history = History::default();
        history
            .record(2024, Assignment::from_pairs([("A", "B"), ("B", "A")]))
            .unwrap();
        let store = HistoryStore::new(dir.join("history.json"));
        let state = AppState::new(config, history, store);

        let (cmd_tx, mut ui_rx, handle) = spawn_app(state);
        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();

        match ui_rx.recv().await.unwrap() {
            UiUpdate::GenerationFailed { year, message } => {
                assert_eq!(year, 2025);
                assert!(message.contains("draw again"));
            }
            other => panic!("expected GenerationFailed, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn discard_clears_proposal() {
        let dir = scratch_dir("app_discard");
        let (cmd_tx, mut ui_rx, handle) = spawn_app(test_state(&dir));

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();
        let _ = ui_rx.recv().await; // proposal

        cmd_tx.send(UserCommand::Discard).await.unwrap();
        match ui_rx.recv().await.unwrap() {
            UiUpdate::ProposalCleared => {}
            other => panic!("expected ProposalCleared, got: {other:?}"),
        }

        // A commit after the discard has nothing to apply.
        cmd_tx.send(UserCommand::Commit).await.unwrap();
        match ui_rx.recv().await.unwrap() {
            UiUpdate::Notice(message) => assert!(message.contains("No drawn assignment")),
            other => panic!("expected Notice, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failed_save_keeps_proposal_and_history() {
        let dir = scratch_dir("app_failed_save");
        let mut state = test_state(&dir);
        // Point the store at a directory that does not exist.
        state.store = HistoryStore::new(dir.join("missing").join("history.json"));
        let (cmd_tx, mut ui_rx, handle) = spawn_app(state);

        let _ = ui_rx.recv().await; // initial snapshot
        cmd_tx
            .send(UserCommand::Generate { year: 2025 })
            .await
            .unwrap();
        let _ = ui_rx.recv().await; // proposal

        cmd_tx.send(UserCommand::Commit).await.unwrap();
        match ui_rx.recv().await.unwrap() {
            UiUpdate::Notice(message) => assert!(message.contains("could not save")),
            other => panic!("expected Notice, got: {other:?}"),
        }

        // The proposal survived the failed save: a discard still clears it.
        cmd_tx.send(UserCommand::Discard).await.unwrap();
        match ui_rx.recv().await.unwrap() {
            UiUpdate::ProposalCleared => {}
            other => panic!("expected ProposalCleared, got: {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = fs::remove_dir_all(&dir);
    }
}
