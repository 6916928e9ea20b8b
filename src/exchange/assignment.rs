// One year's giver -> receiver mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Calendar year keying one exchange round.
pub type Year = u16;

/// A complete giver -> receiver mapping for a single year.
///
/// A valid assignment is a permutation of the participant set: every
/// participant appears exactly once as a giver and exactly once as a
/// receiver. Serialized transparently as a JSON object
/// (`{"Ellie": "Sam", ...}`), which is the on-disk history entry shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    pairs: BTreeMap<String, String>,
}

impl Assignment {
    /// Build an assignment from (giver, receiver) pairs.
    pub fn from_pairs<I, G, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (G, R)>,
        G: Into<String>,
        R: Into<String>,
    {
        Assignment {
            pairs: pairs
                .into_iter()
                .map(|(g, r)| (g.into(), r.into()))
                .collect(),
        }
    }

    /// The receiver assigned to `giver`, if any.
    pub fn receiver_for(&self, giver: &str) -> Option<&str> {
        self.pairs.get(giver).map(String::as_str)
    }

    /// Iterate over (giver, receiver) pairs in giver order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if this assignment is a permutation of `participants`:
    /// givers and receivers each cover the participant set exactly once.
    pub fn is_permutation_of(&self, participants: &[String]) -> bool {
        use std::collections::BTreeSet;

        let roster: BTreeSet<&str> = participants.iter().map(String::as_str).collect();
        if roster.len() != participants.len() || self.pairs.len() != roster.len() {
            return false;
        }

        let givers: BTreeSet<&str> = self.pairs.keys().map(String::as_str).collect();
        let receivers: BTreeSet<&str> = self.pairs.values().map(String::as_str).collect();
        givers == roster && receivers == roster
    }

    /// True if any participant is assigned to themselves.
    pub fn has_fixed_point(&self) -> bool {
        self.pairs.iter().any(|(g, r)| g == r)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
