use crate::board::{Board, Player};
use std::collections::HashMap;

/// Default number of occurrences at which a position counts as a repetition draw.
pub const DEFAULT_DRAW_THRESHOLD: u32 = 3;

/// Occurrence counts of the positions of the real game.
///
/// Owned by the outer game loop, which records every position actually reached (including
/// the one the next search starts from). The search only reads it: hypothetical lines are
/// tracked separately so they never leak into the game record.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    counts: HashMap<(u64, Player), u32>,
    total: usize,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current position of `board` with its side to move.
    pub fn record<T: Board>(&mut self, board: &T) {
        self.record_hash(board.get_hash(), board.get_current_player());
    }

    /// Records a position by hash.
    pub fn record_hash(&mut self, hash: u64, side_to_move: Player) {
        *self.counts.entry((hash, side_to_move)).or_insert(0) += 1;
        self.total += 1;
    }

    /// Removes one occurrence of the current position of `board`, e.g. when a move is taken
    /// back. Returns `false` if the position was not recorded.
    pub fn unrecord<T: Board>(&mut self, board: &T) -> bool {
        self.unrecord_hash(board.get_hash(), board.get_current_player())
    }

    /// Removes one occurrence by hash. Returns `false` if the position was not recorded.
    pub fn unrecord_hash(&mut self, hash: u64, side_to_move: Player) -> bool {
        let key = (hash, side_to_move);
        match self.counts.get_mut(&key) {
            Some(count) => {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&key);
                }
                self.total -= 1;
                true
            }
            None => false,
        }
    }

    /// How many times the position has been recorded.
    pub fn occurrences(&self, hash: u64, side_to_move: Player) -> u32 {
        self.counts.get(&(hash, side_to_move)).copied().unwrap_or(0)
    }

    /// The occurrence count the position of `board` would have if it were reached once more
    /// with `next_side_to_move` to play.
    pub fn would_repeat<T: Board>(&self, board: &T, next_side_to_move: Player) -> u32 {
        self.occurrences(board.get_hash(), next_side_to_move) + 1
    }

    /// Number of recorded positions, repetitions included.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn clear(&mut self) {
        self.counts.clear();
        self.total = 0;
    }
}

/// Positions on the current search line below the root, in order.
///
/// Combined with a [`HistoryLedger`] it answers how often a position has occurred in the real
/// game plus the hypothetical line leading to it.
#[derive(Debug, Default)]
pub(crate) struct SearchPath {
    stack: Vec<(u64, Player)>,
}

impl SearchPath {
    pub(crate) fn push(&mut self, hash: u64, side_to_move: Player) {
        self.stack.push((hash, side_to_move));
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
    }

    /// Occurrences of the position on the path.
    pub(crate) fn occurrences(&self, hash: u64, side_to_move: Player) -> u32 {
        self.stack
            .iter()
            .filter(|&&entry| entry == (hash, side_to_move))
            .count() as u32
    }
}
