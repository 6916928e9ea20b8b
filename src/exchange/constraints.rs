// Forbidden-receiver sets derived from group rules and history.

use std::collections::{HashMap, HashSet};

use crate::config::ExchangeConfig;

use super::history::History;

/// Per-giver forbidden receivers, precomputed once per draw.
///
/// A receiver is forbidden for a giver when any of the following holds:
/// - receiver == giver (self-assignment is always forbidden),
/// - the receiver's group is not in the giver's group allow-list,
/// - the giver was assigned that receiver in any recorded year.
#[derive(Debug, Clone)]
pub struct ConstraintSet {
    forbidden: HashMap<String, HashSet<String>>,
}

impl ConstraintSet {
    /// Build the constraint set for the configured exchange against the
    /// recorded history.
    pub fn build(exchange: &ExchangeConfig, history: &History) -> Self {
        let mut forbidden: HashMap<String, HashSet<String>> = HashMap::new();

        for giver in &exchange.participants {
            let entry = forbidden.entry(giver.clone()).or_default();
            entry.insert(giver.clone());

            for receiver in &exchange.participants {
                if !exchange.group_allows(giver, receiver) {
                    entry.insert(receiver.clone());
                }
            }

            for receiver in history.past_receivers(giver) {
                entry.insert(receiver.to_string());
            }
        }

        ConstraintSet { forbidden }
    }

    /// True iff `receiver` may legally be assigned to `giver`.
    pub fn is_allowed(&self, giver: &str, receiver: &str) -> bool {
        match self.forbidden.get(giver) {
            Some(set) => !set.contains(receiver),
            // Unknown giver: nothing is known to forbid the pairing. The
            // generator only ever asks about configured participants.
            None => giver != receiver,
        }
    }

    /// Number of receivers forbidden for `giver`.
    pub fn forbidden_count(&self, giver: &str) -> usize {
        self.forbidden.get(giver).map_or(0, HashSet::len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
