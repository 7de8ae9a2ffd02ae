//! Error types for the river crossing solver.
//!
//! Only caller mistakes are errors. A search that finds no crossing plan
//! reports that through [`SearchOutcome`](crate::solver::SearchOutcome).

use thiserror::Error;

use crate::puzzle::Person;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),

    #[error("Depth limit must be positive, got {0}")]
    InvalidDepthLimit(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a roster or a state was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("{0} is not part of the roster")]
    Unknown(Person),

    #[error("{0} appears more than once")]
    Duplicate(Person),

    #[error("{0} is on neither bank")]
    Missing(Person),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Role;

    #[test]
    fn test_config_issue_converts() {
        let err: PuzzleError = ConfigIssue::Duplicate(Person::new(Role::Thief)).into();
        assert!(matches!(
            err,
            PuzzleError::InvalidConfiguration(ConfigIssue::Duplicate(_))
        ));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Thief appears more than once"
        );
    }
}
