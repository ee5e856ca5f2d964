//! Move ordering.
//!
//! The order in which moves are searched never changes the value of a node, only how many
//! siblings alpha-beta can skip. When several moves share the best value the first one
//! searched is reported, so different orderings (including the optional random tie-break)
//! may pick different but equally good moves.

use crate::board::{Board, GameOutcome, Player};
use crate::random::RandomGenerator;
use crate::score::MAX_PLY;

/// Ordering class of a move, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MoveClass {
    /// Nothing special known about the move.
    Quiet = 0,
    /// A quiet move that caused a cutoff at the same ply elsewhere in the tree.
    Killer = 1,
    /// The adapter rates it as a capture, threat or other forcing move.
    Tactical = 2,
    /// Playing it ends the game in the mover's favor.
    Winning = 3,
    /// Best move of an earlier search of this position.
    Remembered = 4,
}

/// Orders the legal moves of a node and keeps the killer moves per ply.
pub struct NodeExpander<M> {
    killers: Vec<[Option<M>; 2]>,
}

impl<M: Clone + PartialEq> Default for NodeExpander<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone + PartialEq> NodeExpander<M> {
    pub fn new() -> Self {
        Self {
            killers: vec![[None, None]; MAX_PLY],
        }
    }

    /// Classifies `b_move` without applying it, except for the immediate-win probe.
    pub fn classify<T: Board<Move = M>>(
        &self,
        board: &mut T,
        b_move: &M,
        side: Player,
        ply: usize,
        remembered: Option<&M>,
    ) -> (MoveClass, i32) {
        if remembered == Some(b_move) {
            return (MoveClass::Remembered, 0);
        }

        board.perform_move(b_move);
        let outcome = board.get_outcome();
        board.undo_move(b_move);
        if outcome.winner() == Some(side) {
            return (MoveClass::Winning, 0);
        }
        if outcome == GameOutcome::InProgress {
            let priority = board.move_priority(b_move, side);
            if priority > 0 {
                return (MoveClass::Tactical, priority);
            }
            if self.is_killer(ply, b_move) {
                return (MoveClass::Killer, priority);
            }
            return (MoveClass::Quiet, priority);
        }
        (MoveClass::Quiet, board.move_priority(b_move, side))
    }

    /// Returns `moves` sorted so that the most promising come first.
    ///
    /// Ties keep the adapter's order unless `random` is given, in which case they are
    /// shuffled.
    pub fn order<T: Board<Move = M>, K: RandomGenerator>(
        &self,
        board: &mut T,
        moves: Vec<M>,
        side: Player,
        ply: usize,
        remembered: Option<&M>,
        mut random: Option<&mut K>,
    ) -> Vec<M> {
        if moves.len() < 2 {
            return moves;
        }

        let mut keyed: Vec<(MoveClass, i32, i32, M)> = moves
            .into_iter()
            .map(|b_move| {
                let (class, priority) = self.classify(board, &b_move, side, ply, remembered);
                let jitter = match random.as_deref_mut() {
                    Some(rg) => rg.next(),
                    None => 0,
                };
                (class, priority, jitter, b_move)
            })
            .collect();

        keyed.sort_by(|a, b| (b.0, b.1, b.2).cmp(&(a.0, a.1, a.2)));
        keyed.into_iter().map(|(_, _, _, b_move)| b_move).collect()
    }

    /// Remembers a quiet move that caused a cutoff at `ply`.
    pub fn record_killer(&mut self, ply: usize, b_move: &M) {
        if ply >= self.killers.len() {
            return;
        }
        let slots = &mut self.killers[ply];
        if slots[0].as_ref() == Some(b_move) {
            return;
        }
        slots[1] = slots[0].take();
        slots[0] = Some(b_move.clone());
    }

    /// Returns `true` if `b_move` is one of the killers stored for `ply`.
    pub fn is_killer(&self, ply: usize, b_move: &M) -> bool {
        self.killers
            .get(ply)
            .is_some_and(|slots| slots.iter().any(|k| k.as_ref() == Some(b_move)))
    }

    /// Forgets all killer moves.
    pub fn clear(&mut self) {
        for slots in self.killers.iter_mut() {
            *slots = [None, None];
        }
    }
}
