//! Puzzle representation types: who takes part, where the boat is, and
//! which safety rules apply.
//!
//! A [`PuzzleConfig`] deserializes directly from a JSON puzzle file, so
//! variants (smaller families, bigger boats, relaxed rules) can be solved
//! side by side without touching the search code.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigIssue, Result};

/// Role of a person. Declaration order is the total order used for
/// deterministic move enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Police,
    Father,
    Mother,
    Thief,
    Son,
    Daughter,
}

impl Role {
    /// Only police and parents may row the boat.
    pub fn is_operator(self) -> bool {
        matches!(self, Role::Police | Role::Father | Role::Mother)
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Police => "Police",
            Role::Father => "Father",
            Role::Mother => "Mother",
            Role::Thief => "Thief",
            Role::Son => "Son",
            Role::Daughter => "Daughter",
        }
    }
}

/// One individual on the roster.
///
/// `ordinal` tells apart people sharing a role (two sons, two daughters).
/// It is 0 for a role that occurs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Person {
    pub role: Role,
    #[serde(default)]
    pub ordinal: u8,
}

impl Person {
    pub fn new(role: Role) -> Self {
        Self { role, ordinal: 0 }
    }

    pub fn numbered(role: Role, ordinal: u8) -> Self {
        Self { role, ordinal }
    }

    pub fn is_operator(&self) -> bool {
        self.role.is_operator()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ordinal == 0 {
            f.write_str(self.role.name())
        } else {
            write!(f, "{}{}", self.role.name(), self.ordinal)
        }
    }
}

/// River bank, also used for the boat position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Arrow for the direction of a crossing that starts on this side
    pub fn arrow(self) -> &'static str {
        match self {
            Side::Left => "->",
            Side::Right => "<-",
        }
    }
}

/// A constraint both banks have to satisfy after every crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyRule {
    /// The thief may not share a bank with anyone unless police is there
    ThiefNeedsPolice,
    /// The father may not be with a daughter unless the mother is there
    FatherNeedsMother,
    /// The mother may not be with a son unless the father is there
    MotherNeedsFather,
}

impl SafetyRule {
    pub const ALL: [SafetyRule; 3] = [
        SafetyRule::ThiefNeedsPolice,
        SafetyRule::FatherNeedsMother,
        SafetyRule::MotherNeedsFather,
    ];
}

fn default_boat_capacity() -> usize {
    2
}

fn default_rules() -> Vec<SafetyRule> {
    SafetyRule::ALL.to_vec()
}

/// The complete puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    pub roster: Vec<Person>,
    #[serde(default = "default_boat_capacity")]
    pub boat_capacity: usize,
    #[serde(default = "default_rules")]
    pub rules: Vec<SafetyRule>,
}

impl PuzzleConfig {
    pub fn new(roster: Vec<Person>) -> Self {
        Self {
            roster,
            boat_capacity: default_boat_capacity(),
            rules: default_rules(),
        }
    }

    /// Police, thief and a family of two sons and two daughters.
    pub fn classic() -> Self {
        Self::new(vec![
            Person::new(Role::Police),
            Person::new(Role::Father),
            Person::new(Role::Mother),
            Person::new(Role::Thief),
            Person::numbered(Role::Son, 1),
            Person::numbered(Role::Son, 2),
            Person::numbered(Role::Daughter, 1),
            Person::numbered(Role::Daughter, 2),
        ])
    }

    /// Police, thief and a family with one son and one daughter.
    pub fn family() -> Self {
        Self::new(vec![
            Person::new(Role::Police),
            Person::new(Role::Thief),
            Person::new(Role::Father),
            Person::new(Role::Mother),
            Person::new(Role::Son),
            Person::new(Role::Daughter),
        ])
    }

    pub fn with_boat_capacity(mut self, capacity: usize) -> Self {
        self.boat_capacity = capacity;
        self
    }

    pub fn with_rules(mut self, rules: Vec<SafetyRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Load a puzzle from a JSON file
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: PuzzleConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the roster and the boat before any search.
    ///
    /// Roster size is not capped: the state space doubles with every
    /// person, so keeping the roster small enough to search is up to the
    /// caller.
    pub fn validate(&self) -> Result<()> {
        if self.roster.is_empty() {
            return Err(ConfigIssue::Other("roster is empty".to_string()).into());
        }
        if self.boat_capacity == 0 {
            return Err(
                ConfigIssue::Other("boat capacity must be at least 1".to_string()).into(),
            );
        }

        let mut seen = HashSet::new();
        for person in &self.roster {
            if !seen.insert(*person) {
                return Err(ConfigIssue::Duplicate(*person).into());
            }
        }
        Ok(())
    }

    pub fn contains(&self, person: &Person) -> bool {
        self.roster.contains(person)
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::classic()
    }
}
