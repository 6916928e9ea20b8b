// Gift exchange domain: assignments, history, constraints, and the
// random draw itself.

pub mod assignment;
pub mod constraints;
pub mod generate;
pub mod history;

pub use assignment::{Assignment, Year};
pub use constraints::ConstraintSet;
pub use generate::{generate, GenerateError};
pub use history::{History, HistoryError};

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::config::ExchangeConfig;

#[derive(Debug, Error)]
pub enum ProposeError {
    #[error("assignments for {year} are already locked in")]
    AlreadyRecorded { year: Year },

    #[error(transparent)]
    Infeasible(#[from] GenerateError),
}

/// Draw a fresh assignment for `year` against the recorded history.
///
/// Refuses a year that is already recorded; otherwise builds the
/// constraint set from group rules plus every prior year and runs the
/// rejection sampler. The result is transient until committed.
pub fn propose<R: Rng + ?Sized>(
    year: Year,
    exchange: &ExchangeConfig,
    history: &History,
    rng: &mut R,
) -> Result<Assignment, ProposeError> {
    if history.contains_year(year) {
        return Err(ProposeError::AlreadyRecorded { year });
    }

    let constraints = ConstraintSet::build(exchange, history);
    let assignment = generate(
        &exchange.participants,
        |giver, receiver| constraints.is_allowed(giver, receiver),
        exchange.max_attempts,
        rng,
    )?;

    info!(year, participants = exchange.participants.len(), "assignment drawn");
    Ok(assignment)
}

/// Commit a drawn assignment to history. Append-only: an already-recorded
/// year is rejected and history is left unchanged.
pub fn commit(
    year: Year,
    assignment: Assignment,
    history: &mut History,
) -> Result<(), HistoryError> {
    history.record(year, assignment)?;
    info!(year, "assignment locked in");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
