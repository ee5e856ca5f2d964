use crate::score::Score;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The central trait of the library, defining the interface for a game state.
///
/// To search a custom game, this trait must be implemented. The engine never clones the board:
/// it mutates it in place through strictly nested `perform_move` / `undo_move` pairs and
/// leaves it exactly as it found it when a search returns.
pub trait Board {
    /// The type representing a move in the game. This could be a simple `u8` for a board position
    /// or a more complex struct for games with intricate actions.
    type Move: Clone + PartialEq + Debug;

    /// Returns the player whose turn it is to make a move.
    fn get_current_player(&self) -> Player;

    /// Returns the current outcome of the game.
    fn get_outcome(&self) -> GameOutcome;

    /// Returns all legal moves of `side` in the current state. An empty list means `side`
    /// has no move available.
    fn get_available_moves(&self, side: Player) -> Vec<Self::Move>;

    /// Applies a given move to the board, modifying its state.
    fn perform_move(&mut self, b_move: &Self::Move);

    /// Reverts the most recent `perform_move` of `b_move`.
    ///
    /// After `perform_move(m)` followed by `undo_move(m)` the board must be identical to what
    /// it was before, including its hash.
    fn undo_move(&mut self, b_move: &Self::Move);

    /// Static heuristic score of the position, positive when it favors `perspective`.
    ///
    /// Values are clamped by the engine below the decisive band, so the scale only has to be
    /// consistent across calls.
    fn evaluate(&self, perspective: Player) -> Score;

    /// Returns a hash value for the current board state.
    ///
    /// Used as the key of the evaluation cache and of the repetition ledger, so equal
    /// positions must hash equally. Cached values are stored from the side to move's point of
    /// view, so the hash must also tell apart positions that differ only in who is to move.
    /// Games where the side to move follows from the position alone (tic-tac-toe) get this
    /// for free; others have to mix it in, like [`crate::boards::cycle_game::CycleGame`].
    fn get_hash(&self) -> u64;

    /// Classifies a non-terminal position in which `side` has no legal move.
    ///
    /// The default treats it as a loss for `side`. Games where this is a stalemate
    /// should return [`GameOutcome::Draw`].
    fn no_moves_outcome(&self, side: Player) -> GameOutcome {
        GameOutcome::Lose(side)
    }

    /// Ordering hint for tactical moves (captures, threats, blocks). Higher is tried earlier.
    fn move_priority(&self, _b_move: &Self::Move, _side: Player) -> i32 {
        0
    }
}

/// Represents the possible outcomes of a game.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The game is still ongoing.
    InProgress,
    /// The given player has won.
    Win(Player),
    /// The given player has lost.
    Lose(Player),
    /// The game has ended in a draw.
    Draw,
}

impl GameOutcome {
    /// Returns `true` when the game is over.
    pub fn is_terminal(&self) -> bool {
        *self != GameOutcome::InProgress
    }

    /// Returns the winner of a decisive outcome.
    pub fn winner(&self) -> Option<Player> {
        match *self {
            GameOutcome::Win(player) => Some(player),
            GameOutcome::Lose(player) => Some(player.opponent()),
            GameOutcome::InProgress | GameOutcome::Draw => None,
        }
    }
}

/// The two sides of a two-player game.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Serialize, Deserialize)]
pub enum Player {
    /// The player who moves first.
    First = 1,
    /// The player who moves second.
    Second = 2,
}

impl Player {
    /// Returns the other side.
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }
}

/// How a cached value relates to the true value of a position.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Bound {
    /// The value is exact: the search completed inside the window.
    Exact = 0,
    /// The true value is at least the stored one (beta cutoff).
    Lower = 1,
    /// The true value is at most the stored one (fail low).
    Upper = 2,
}

#[cfg(test)]
mod tests {
    use crate::board::{GameOutcome, Player};

    #[test]
    fn winner_of_outcomes() {
        assert_eq!(GameOutcome::Win(Player::First).winner(), Some(Player::First));
        assert_eq!(GameOutcome::Lose(Player::First).winner(), Some(Player::Second));
        assert_eq!(GameOutcome::Draw.winner(), None);
        assert_eq!(GameOutcome::InProgress.winner(), None);
    }

    #[test]
    fn only_in_progress_is_not_terminal() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Draw.is_terminal());
        assert!(GameOutcome::Lose(Player::Second).is_terminal());
    }

    #[test]
    fn opponent_is_involution() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(Player::First.opponent().opponent(), Player::First);
    }
}
