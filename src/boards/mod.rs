//! Contains pre-made implementations of the `Board` trait.

/// A game on a small directed graph where positions repeat.
pub mod cycle_game;
/// A `Board` implementation for the game of Tic-Tac-Toe.
pub mod tic_tac_toe;
/// A game given explicitly as a tree, handy for constructing puzzles.
pub mod tree_game;
