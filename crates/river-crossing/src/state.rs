//! World snapshots: who stands on which bank and where the boat is.
//!
//! A [`State`] is a plain value. Successors are built as fresh snapshots
//! and nothing is mutated once a state has been handed to the search.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ConfigIssue, Result};
use crate::puzzle::{Person, PuzzleConfig, Side};

/// The people on one bank, kept sorted by the [`Person`] total order so
/// that equal banks compare and hash equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bank(SmallVec<[Person; 8]>);

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, person: &Person) -> bool {
        self.0.binary_search(person).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> + '_ {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Person] {
        &self.0
    }

    /// Insert keeping the order. Returns false if already present.
    pub fn insert(&mut self, person: Person) -> bool {
        match self.0.binary_search(&person) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, person);
                true
            }
        }
    }

    pub fn remove(&mut self, person: &Person) -> bool {
        match self.0.binary_search(person) {
            Ok(pos) => {
                self.0.remove(pos);
                true
            }
            Err(_) => false,
        }
    }
}

impl FromIterator<Person> for Bank {
    fn from_iter<I: IntoIterator<Item = Person>>(iter: I) -> Self {
        let mut bank = Bank::new();
        for person in iter {
            bank.insert(person);
        }
        bank
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, person) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", person)?;
        }
        Ok(())
    }
}

/// One configuration of the world
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub left_bank: Bank,
    pub right_bank: Bank,
    pub boat_side: Side,
}

impl State {
    /// Everybody on the left bank, boat on the left.
    pub fn initial(config: &PuzzleConfig) -> Self {
        Self {
            left_bank: config.roster.iter().copied().collect(),
            right_bank: Bank::new(),
            boat_side: Side::Left,
        }
    }

    /// Build a state from explicit bank contents, checking it against the
    /// roster: every person on exactly one bank, nobody from outside.
    pub fn new(
        config: &PuzzleConfig,
        left: impl IntoIterator<Item = Person>,
        right: impl IntoIterator<Item = Person>,
        boat_side: Side,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut left_bank = Bank::new();
        let mut right_bank = Bank::new();

        for (bank, people) in [
            (&mut left_bank, left.into_iter().collect::<Vec<_>>()),
            (&mut right_bank, right.into_iter().collect::<Vec<_>>()),
        ] {
            for person in people {
                if !config.contains(&person) {
                    return Err(ConfigIssue::Unknown(person).into());
                }
                if !seen.insert(person) {
                    return Err(ConfigIssue::Duplicate(person).into());
                }
                bank.insert(person);
            }
        }

        let state = Self {
            left_bank,
            right_bank,
            boat_side,
        };
        state.validate(config)?;
        Ok(state)
    }

    /// Place `left` on the left bank and the rest of the roster on the right.
    pub fn with_left_bank(
        config: &PuzzleConfig,
        left: impl IntoIterator<Item = Person>,
        boat_side: Side,
    ) -> Result<Self> {
        let left: Vec<Person> = left.into_iter().collect();
        let right: Vec<Person> = config
            .roster
            .iter()
            .filter(|p| !left.contains(p))
            .copied()
            .collect();
        Self::new(config, left, right, boat_side)
    }

    /// Check that the banks partition the roster.
    pub fn validate(&self, config: &PuzzleConfig) -> Result<()> {
        for person in self.left_bank.iter().chain(self.right_bank.iter()) {
            if !config.contains(person) {
                return Err(ConfigIssue::Unknown(*person).into());
            }
        }
        for person in self.left_bank.iter() {
            if self.right_bank.contains(person) {
                return Err(ConfigIssue::Duplicate(*person).into());
            }
        }
        for person in &config.roster {
            if !self.left_bank.contains(person) && !self.right_bank.contains(person) {
                return Err(ConfigIssue::Missing(*person).into());
            }
        }
        Ok(())
    }

    pub fn bank(&self, side: Side) -> &Bank {
        match side {
            Side::Left => &self.left_bank,
            Side::Right => &self.right_bank,
        }
    }

    /// The bank the boat is docked at
    pub fn boat_bank(&self) -> &Bank {
        self.bank(self.boat_side)
    }

    /// Everyone crossed and the boat is on the right
    pub fn is_goal(&self) -> bool {
        self.left_bank.is_empty() && self.boat_side == Side::Right
    }

    /// Same state seen from the other shore.
    pub fn mirrored(&self) -> Self {
        Self {
            left_bank: self.right_bank.clone(),
            right_bank: self.left_bank.clone(),
            boat_side: self.boat_side.opposite(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boat = match self.boat_side {
            Side::Left => "[boat] ~~~~~~",
            Side::Right => "~~~~~~ [boat]",
        };
        write!(f, "{} | {} | {}", self.left_bank, boat, self.right_bank)
    }
}
