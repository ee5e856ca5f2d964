use crate::board::{Board, GameOutcome, Player};
use crate::score::Score;
use std::fmt;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Ordering hint for a move that completes a line.
const WINNING_PRIORITY: i32 = 200;
/// Ordering hint for a move that stops the opponent from completing a line.
const BLOCKING_PRIORITY: i32 = 100;

/// An implementation of the `Board` trait for the game of Tic-Tac-Toe.
///
/// The board is represented by a 9-element array, where each element corresponds to a cell.
/// A move is represented by a `u8` from 0 to 8. X is [`Player::First`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicTacToeBoard {
    current_player: Player,
    field: [Option<Player>; 9],
    outcome: GameOutcome,
}

impl TicTacToeBoard {
    /// Creates a board from a sequence of moves played from the empty position.
    pub fn from_moves(moves: &[u8]) -> Self {
        let mut board = TicTacToeBoard::default();
        for b_move in moves {
            board.perform_move(b_move);
        }
        board
    }

    /// Returns the mark in cell `index`.
    pub fn cell(&self, index: usize) -> Option<Player> {
        self.field.get(index).copied().flatten()
    }

    fn compute_outcome(&self) -> GameOutcome {
        for line in LINES {
            if let Some(player) = self.field[line[0]] {
                if self.field[line[1]] == Some(player) && self.field[line[2]] == Some(player) {
                    return GameOutcome::Win(player);
                }
            }
        }

        if self.field.iter().any(|x| x.is_none()) {
            GameOutcome::InProgress
        } else {
            GameOutcome::Draw
        }
    }

    /// Returns `true` if `player` would complete a line by marking `cell`.
    fn completes_line(&self, cell: usize, player: Player) -> bool {
        LINES.iter().filter(|line| line.contains(&cell)).any(|line| {
            line.iter()
                .filter(|&&c| c != cell)
                .all(|&c| self.field[c] == Some(player))
        })
    }
}

impl Default for TicTacToeBoard {
    /// Creates a new Tic-Tac-Toe board with player 'X' starting.
    fn default() -> Self {
        Self {
            current_player: Player::First,
            field: [None; 9],
            outcome: GameOutcome::InProgress,
        }
    }
}

impl Board for TicTacToeBoard {
    type Move = u8;

    fn get_current_player(&self) -> Player {
        self.current_player
    }

    fn get_outcome(&self) -> GameOutcome {
        self.outcome
    }

    fn get_available_moves(&self, side: Player) -> Vec<Self::Move> {
        if self.outcome != GameOutcome::InProgress || side != self.current_player {
            return Vec::new();
        }

        self.field
            .iter()
            .enumerate()
            .filter(|(_, x)| x.is_none())
            .map(|(i, _)| i as u8)
            .collect()
    }

    fn perform_move(&mut self, b_move: &Self::Move) {
        self.field[*b_move as usize] = Some(self.current_player);
        self.current_player = self.current_player.opponent();
        self.outcome = self.compute_outcome();
    }

    fn undo_move(&mut self, b_move: &Self::Move) {
        self.field[*b_move as usize] = None;
        self.current_player = self.current_player.opponent();
        self.outcome = self.compute_outcome();
    }

    /// Open lines: one mark is worth 1, two marks are worth 10.
    fn evaluate(&self, perspective: Player) -> Score {
        let mut score = 0;
        for line in LINES {
            let mine = line
                .iter()
                .filter(|&&c| self.field[c] == Some(perspective))
                .count();
            let theirs = line
                .iter()
                .filter(|&&c| self.field[c] == Some(perspective.opponent()))
                .count();
            let weight = |n: usize| match n {
                1 => 1,
                2 => 10,
                _ => 0,
            };
            if theirs == 0 {
                score += weight(mine);
            }
            if mine == 0 {
                score -= weight(theirs);
            }
        }
        score
    }

    fn get_hash(&self) -> u64 {
        let mut hash = 0;
        for (i, &cell) in self.field.iter().enumerate() {
            let cell_value = match cell {
                None => 0,
                Some(Player::First) => 1,
                Some(Player::Second) => 2,
            };
            hash += cell_value * 3u64.pow(i as u32);
        }
        hash
    }

    /// A full board without a line is already a draw, so this is never reached by the engine.
    fn no_moves_outcome(&self, _side: Player) -> GameOutcome {
        GameOutcome::Draw
    }

    fn move_priority(&self, b_move: &Self::Move, side: Player) -> i32 {
        let cell = *b_move as usize;
        if self.completes_line(cell, side) {
            WINNING_PRIORITY
        } else if self.completes_line(cell, side.opponent()) {
            BLOCKING_PRIORITY
        } else {
            0
        }
    }
}

impl fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let mark = match self.field[row * 3 + col] {
                    None => '.',
                    Some(Player::First) => 'X',
                    Some(Player::Second) => 'O',
                };
                write!(f, "{mark}")?;
            }
            if row < 2 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
