// The constrained random bijection generator.
//
// Monte-Carlo rejection sampling over permutations: shuffle the receiver
// list, pair it positionally with the fixed giver order, and accept the
// first permutation where every pair passes the constraint predicate.
// Bounded by an attempt ceiling; exhausting the budget cannot distinguish
// an infeasible instance from an unlucky feasible one.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use super::assignment::Assignment;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no valid assignment found within {attempts} attempts")]
    Infeasible { attempts: u32 },
}

/// Draw a random assignment over `givers` satisfying `is_allowed` for
/// every (giver, receiver) pair.
///
/// `givers` fixes the enumeration order; each attempt pairs it with a
/// freshly shuffled copy of itself. Returns the first valid permutation,
/// or `Infeasible` once `max_attempts` shuffles have been rejected.
pub fn generate<R: Rng + ?Sized>(
    givers: &[String],
    is_allowed: impl Fn(&str, &str) -> bool,
    max_attempts: u32,
    rng: &mut R,
) -> Result<Assignment, GenerateError> {
    let mut receivers: Vec<&str> = givers.iter().map(String::as_str).collect();

    for attempt in 0..max_attempts {
        receivers.shuffle(rng);
        if pairs_valid(givers, &receivers, &is_allowed) {
            debug!(attempt, "valid assignment found");
            return Ok(Assignment::from_pairs(
                givers.iter().map(String::as_str).zip(receivers.iter().copied()),
            ));
        }
    }

    Err(GenerateError::Infeasible {
        attempts: max_attempts,
    })
}

/// True iff every positional (giver, receiver) pair passes the predicate.
fn pairs_valid(
    givers: &[String],
    receivers: &[&str],
    is_allowed: &impl Fn(&str, &str) -> bool,
) -> bool {
    givers
        .iter()
        .zip(receivers)
        .all(|(giver, receiver)| is_allowed(giver, receiver))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
