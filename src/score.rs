//! The numeric scale shared by the evaluator, the cache and the search.

/// A search value in side-to-move terms: positive is good for the player being asked.
pub type Score = i32;

/// Value of a win at the root. Wins found `n` plies deep score `WIN_SCORE - n`.
pub const WIN_SCORE: Score = 100_000;

/// Strictly larger than any value the search can return; used for the initial window.
pub const INFINITY: Score = WIN_SCORE + 1;

/// Maximum distance from the root the search may reach.
pub const MAX_PLY: usize = 128;

/// Deepest search that keeps every decisive value inside the decisive band.
pub const MAX_DEPTH: u8 = (MAX_PLY - 1) as u8;

/// Smallest magnitude of a decisive value.
pub const DECISIVE_THRESHOLD: Score = WIN_SCORE - MAX_PLY as Score;

/// Largest magnitude a heuristic evaluation is allowed to have.
pub const MAX_HEURISTIC: Score = DECISIVE_THRESHOLD - 1;

/// Score of winning `ply` plies from the root.
#[inline]
pub fn win_in(ply: usize) -> Score {
    WIN_SCORE - ply as Score
}

/// Score of losing `ply` plies from the root.
#[inline]
pub fn loss_in(ply: usize) -> Score {
    -WIN_SCORE + ply as Score
}

/// Returns `true` for proven wins and losses.
#[inline]
pub fn is_decisive(score: Score) -> bool {
    score.abs() >= DECISIVE_THRESHOLD
}

/// Number of plies to the end of the game for a decisive score.
pub fn plies_to_end(score: Score) -> Option<usize> {
    if is_decisive(score) {
        Some((WIN_SCORE - score.abs()) as usize)
    } else {
        None
    }
}

/// Keeps heuristic values out of the decisive band.
#[inline]
pub fn clamp_heuristic(score: Score) -> Score {
    score.clamp(-MAX_HEURISTIC, MAX_HEURISTIC)
}

/// Converts a root-relative decisive score into one relative to the node at `ply`.
/// Non-decisive scores pass through.
#[inline]
pub fn to_cache(score: Score, ply: usize) -> Score {
    if score >= DECISIVE_THRESHOLD {
        score + ply as Score
    } else if score <= -DECISIVE_THRESHOLD {
        score - ply as Score
    } else {
        score
    }
}

/// Inverse of [`to_cache`].
#[inline]
pub fn from_cache(score: Score, ply: usize) -> Score {
    if score >= DECISIVE_THRESHOLD {
        score - ply as Score
    } else if score <= -DECISIVE_THRESHOLD {
        score + ply as Score
    } else {
        score
    }
}
