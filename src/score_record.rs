use crate::board::GameOutcome;
use crate::score::{Score, is_decisive, plies_to_end};

/// Result of searching one node.
///
/// Created when a node returns and consumed by its caller. A record whose `complete` flag is
/// `false` was cut short by the deadline: its value only covers the moves examined so far and
/// must not be trusted as the value of the node.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord<M> {
    /// Best value found.
    pub value: Score,
    /// Move achieving `value`. `None` for leaves, terminal nodes and nodes aborted before any
    /// move was examined.
    pub best_move: Option<M>,
    /// Remaining depth the node was searched with.
    pub depth: u8,
    /// `false` when the deadline interrupted the search of this node.
    pub complete: bool,
    /// `true` when a repetition draw fed into `value`, which then only holds for the line
    /// that led to the node. Such records are never cached.
    pub path_dependent: bool,
}

impl<M> ScoreRecord<M> {
    /// A fully evaluated node without a move.
    pub fn leaf(value: Score, depth: u8) -> Self {
        ScoreRecord {
            value,
            best_move: None,
            depth,
            complete: true,
            path_dependent: false,
        }
    }

    /// A draw by repetition on the current line.
    pub fn repetition(value: Score, depth: u8) -> Self {
        ScoreRecord {
            path_dependent: true,
            ..ScoreRecord::leaf(value, depth)
        }
    }

    /// A node whose search never started because the deadline had passed.
    pub fn aborted(depth: u8) -> Self {
        ScoreRecord {
            value: 0,
            best_move: None,
            depth,
            complete: false,
            path_dependent: false,
        }
    }

    /// Returns `true` when the value is a proven win or loss.
    pub fn is_decisive(&self) -> bool {
        is_decisive(self.value)
    }

    pub(crate) fn negated(self) -> Self {
        ScoreRecord {
            value: -self.value,
            ..self
        }
    }
}

/// How a decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// At least one depth completed; the move is the best of the deepest completed depth.
    Searched,
    /// No depth completed before the deadline; the move comes from move ordering or from the
    /// part of depth 1 that was examined.
    Fallback,
    /// The root position is over or the side to move has no legal move.
    GameOver(GameOutcome),
}

/// Counters collected during a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes entered.
    pub nodes: u64,
    /// Beta cutoffs.
    pub cutoffs: u64,
    /// Cutoffs produced by the first move tried (ordering quality).
    pub first_move_cutoffs: u64,
    /// Cache lookups.
    pub cache_probes: u64,
    /// Cache lookups that ended the node without searching it.
    pub cache_hits: u64,
    /// Branches scored as draws by repetition.
    pub repetition_draws: u64,
    /// Nodes that returned early because the search had to stop.
    pub aborted_nodes: u64,
}

impl SearchStats {
    /// Share of cutoffs caused by the first move, in percent.
    pub fn first_move_rate(&self) -> f64 {
        if self.cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.cutoffs as f64 * 100.0
        }
    }

    /// Share of cache lookups that ended the node, in percent.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.cache_probes == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.cache_probes as f64 * 100.0
        }
    }
}

/// The answer of the iterative deepening driver.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<M> {
    /// Move to play. Always present unless the root has no legal move.
    pub best_move: Option<M>,
    /// Value of `best_move` from the point of view of the side to move at the root.
    pub score: Score,
    /// Deepest fully completed iteration, 0 if none completed.
    pub depth: u8,
    /// Expected continuation, starting with `best_move`.
    pub pv: Vec<M>,
    pub kind: DecisionKind,
    pub stats: SearchStats,
}

impl<M> SearchResult<M> {
    /// Number of plies until the game ends if the score is decisive.
    pub fn plies_to_end(&self) -> Option<usize> {
        plies_to_end(self.score)
    }

    /// Returns `true` when no depth finished and the move is a best effort.
    pub fn is_fallback(&self) -> bool {
        self.kind == DecisionKind::Fallback
    }
}
