//! A small and simple library for time-bounded alpha-beta game tree search.
//!
//! This library provides a generic negamax search with alpha-beta pruning, driven by iterative
//! deepening under a wall-clock deadline. It works for any two-player, zero-sum, turn-based
//! game that implements the [`board::Board`] trait: the engine mutates the board in place with
//! `perform_move` / `undo_move` and never clones it.
//!
//! Along the way it keeps an evaluation cache, orders moves (remembered best move, immediate
//! wins, tactical moves, killers), scores repeated positions as draws and always answers with
//! a legal move, even when no depth finished in time.
//!
//! # Example
//!
//! ```rust
//! use alphabeta_lib::board::Player;
//! use alphabeta_lib::boards::tic_tac_toe::TicTacToeBoard;
//! use alphabeta_lib::random::CustomNumberGenerator;
//! use alphabeta_lib::search::AlphaBetaSearch;
//! use std::time::Duration;
//!
//! // Create a new Tic-Tac-Toe board
//! let mut board = TicTacToeBoard::default();
//!
//! // Create and configure a new search instance using the builder
//! let mut search = AlphaBetaSearch::builder()
//!     .with_random_generator(CustomNumberGenerator::default())
//!     .with_max_depth(9)
//!     .with_alpha_beta_pruning(true)
//!     .build();
//!
//! // Search for at most one second
//! let result = search
//!     .decide(&mut board, Player::First, Duration::from_secs(1))
//!     .unwrap();
//!
//! println!("The best move is: {:?} (score {})", result.best_move, result.score);
//! assert!(result.best_move.is_some());
//! ```

/// Contains the `Board` trait and related enums that define the interface for a game.
pub mod board;
/// Contains pre-made implementations of the `Board` trait.
pub mod boards;
/// The evaluation cache (transposition table).
pub mod cache;
/// Serializable engine settings.
pub mod config;
/// Deadlines and other limits of a decision.
pub mod deadline;
/// The iterative deepening driver.
pub mod deepening;
/// Error type of the engine.
pub mod error;
/// Move ordering and killer moves.
pub mod expander;
/// Repetition tracking across the game and the search line.
pub mod history;
/// Contains traits and implementations for random number generation.
pub mod random;
/// The score scale and its decisive band.
pub mod score;
/// Results of searching a node and of a whole decision.
pub mod score_record;
/// The core module of the library, containing the `AlphaBetaSearch` implementation.
pub mod search;
