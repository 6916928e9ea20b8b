// The append-only record of past assignments, keyed by year.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::assignment::{Assignment, Year};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("assignments for {year} are already locked in")]
    YearAlreadyRecorded { year: Year },
}

/// All recorded assignments, ordered by year.
///
/// Immutable once written except for appending a new year. Serialized
/// transparently as a JSON object keyed by year
/// (`{"2023": {...}, "2024": {...}}`), the on-disk history file shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    years: BTreeMap<Year, Assignment>,
}

/// The built-in seed record. Years already exchanged before this tool
/// existed; merged into any loaded history for years the file lacks.
const SEED_2023: &[(&str, &str)] = &[
    ("Ellie", "Sam"),
    ("Dave", "Laura"),
    ("Joe", "Zack"),
    ("Zack", "Caleb"),
    ("Sam", "Erin"),
    ("Kirk", "Adrienne"),
    ("Erin", "Kirk"),
    ("Maggie", "Emme"),
    ("Emme", "Joe"),
    ("Natalie", "Dave"),
    ("Laura", "Maggie"),
    ("Amber", "Ellie"),
    ("Adrienne", "Amber"),
    ("Caleb", "Natalie"),
];

const SEED_2024: &[(&str, &str)] = &[
    ("Natalie", "Ellie"),
    ("Dave", "Emme"),
    ("Emme", "Amber"),
    ("Adrienne", "Sam"),
    ("Ellie", "Zack"),
    ("Caleb", "Kirk"),
    ("Erin", "Natalie"),
    ("Maggie", "Erin"),
    ("Sam", "Maggie"),
    ("Zack", "Adrienne"),
    ("Laura", "Caleb"),
    ("Amber", "Dave"),
    ("Kirk", "Joe"),
    ("Joe", "Laura"),
];

impl History {
    /// The compiled-in default historical record (2023 and 2024).
    pub fn builtin() -> Self {
        let mut years = BTreeMap::new();
        years.insert(2023, Assignment::from_pairs(SEED_2023.iter().copied()));
        years.insert(2024, Assignment::from_pairs(SEED_2024.iter().copied()));
        History { years }
    }

    pub fn contains_year(&self, year: Year) -> bool {
        self.years.contains_key(&year)
    }

    pub fn get(&self, year: Year) -> Option<&Assignment> {
        self.years.get(&year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// The most recent recorded year, if any.
    pub fn latest_year(&self) -> Option<Year> {
        self.years.keys().next_back().copied()
    }

    /// Iterate over (year, assignment) entries in ascending year order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Year, &Assignment)> {
        self.years.iter().map(|(y, a)| (*y, a))
    }

    /// Append the assignment for a new year. History is append-only:
    /// re-recording an existing year is an error, never an overwrite.
    pub fn record(&mut self, year: Year, assignment: Assignment) -> Result<(), HistoryError> {
        if self.years.contains_key(&year) {
            return Err(HistoryError::YearAlreadyRecorded { year });
        }
        self.years.insert(year, assignment);
        Ok(())
    }

    /// Merge `defaults` into this history, inserting only years absent
    /// here. Loaded file content stays authoritative for any year it
    /// already contains.
    pub fn merge_defaults(&mut self, defaults: History) {
        for (year, assignment) in defaults.years {
            self.years.entry(year).or_insert(assignment);
        }
    }

    /// Every receiver `giver` has been assigned to in any recorded year.
    pub fn past_receivers<'a>(&'a self, giver: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.years
            .values()
            .filter_map(move |assignment| assignment.receiver_for(giver))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
