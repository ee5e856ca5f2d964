use crate::error::{SearchError, SearchOutcome};
use crate::history::DEFAULT_DRAW_THRESHOLD;
use crate::score::{MAX_HEURISTIC, MAX_PLY, Score};
use serde::{Deserialize, Serialize};

/// Deepest iteration the driver starts by default.
pub const DEFAULT_MAX_DEPTH: u8 = 64;

/// Number of cache slots by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

/// Plain, serializable engine settings.
///
/// Every field has a default, so a partial document (for example `{"max_depth": 6}`) is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Deepest iteration the driver will start.
    pub max_depth: u8,
    /// Slots in the evaluation cache; zero disables it.
    pub cache_capacity: usize,
    /// Value of a drawn branch from the searching side's point of view.
    pub draw_score: Score,
    /// Occurrence count at which a repeated position is scored as a draw.
    pub draw_threshold: u32,
    /// Skip siblings once `alpha >= beta`. Turning it off gives a full-width minimax.
    pub alpha_beta_pruning: bool,
    /// Compare hashes around every `undo_move` and abort on mismatch.
    pub verify_undo: bool,
    /// Shuffle equally ranked quiet moves.
    pub random_tie_break: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            draw_score: 0,
            draw_threshold: DEFAULT_DRAW_THRESHOLD,
            alpha_beta_pruning: true,
            verify_undo: cfg!(debug_assertions),
            random_tie_break: false,
        }
    }
}

impl SearchConfig {
    /// Checks that every value is in range.
    pub fn validate(&self) -> SearchOutcome<()> {
        if self.max_depth == 0 {
            return Err(SearchError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if self.max_depth as usize >= MAX_PLY {
            return Err(SearchError::InvalidConfig(format!(
                "max_depth must be below {MAX_PLY}, got {}",
                self.max_depth
            )));
        }
        if self.draw_threshold < 2 {
            return Err(SearchError::InvalidConfig(format!(
                "draw_threshold must be at least 2, got {}",
                self.draw_threshold
            )));
        }
        if self.draw_score.abs() > MAX_HEURISTIC {
            return Err(SearchError::InvalidConfig(format!(
                "draw_score {} overlaps the decisive range",
                self.draw_score
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::WIN_SCORE;

    #[test]
    fn default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let zero_depth = SearchConfig {
            max_depth: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            zero_depth.validate(),
            Err(SearchError::InvalidConfig(_))
        ));

        let low_threshold = SearchConfig {
            draw_threshold: 1,
            ..SearchConfig::default()
        };
        assert!(low_threshold.validate().is_err());

        let decisive_draw = SearchConfig {
            draw_score: WIN_SCORE,
            ..SearchConfig::default()
        };
        assert!(decisive_draw.validate().is_err());

        let too_deep = SearchConfig {
            max_depth: 200,
            ..SearchConfig::default()
        };
        assert!(too_deep.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_depth": 6, "draw_score": -15}"#).unwrap();
        assert_eq!(config.max_depth, 6);
        assert_eq!(config.draw_score, -15);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(config.alpha_beta_pruning);
    }

    #[test]
    fn json_round_trip() {
        let config = SearchConfig {
            max_depth: 9,
            cache_capacity: 0,
            random_tie_break: true,
            ..SearchConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
