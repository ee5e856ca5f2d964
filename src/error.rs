//! Errors that abort a decision.
//!
//! Cutoffs, roots without legal moves and searches that run out of time are ordinary
//! outcomes and are reported through [`crate::score_record::SearchResult`] instead.

/// Failures of the game adapter contract or of the engine configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// `undo_move` did not restore the position hashed before the matching `perform_move`.
    #[error("undo did not restore the position at ply {ply}: expected hash {expected:#018x}, found {found:#018x}")]
    UndoMismatch {
        /// Hash before the move was applied.
        expected: u64,
        /// Hash after the move was undone.
        found: u64,
        /// Distance from the root of the node that applied the move.
        ply: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for engine operations.
pub type SearchOutcome<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use crate::error::SearchError;

    #[test]
    fn messages_name_the_problem() {
        let err = SearchError::UndoMismatch {
            expected: 0x10,
            found: 0x11,
            ply: 3,
        };
        let text = err.to_string();
        assert!(text.contains("ply 3"));
        assert!(text.contains("0x0000000000000010"));

        let err = SearchError::InvalidConfig("max_depth must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "invalid search configuration: max_depth must be at least 1"
        );
    }
}
