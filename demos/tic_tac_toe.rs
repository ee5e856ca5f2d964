extern crate alphabeta_lib;

use alphabeta_lib::board::{Board, GameOutcome};
use alphabeta_lib::boards::tic_tac_toe::TicTacToeBoard;
use alphabeta_lib::deadline::SearchLimits;
use alphabeta_lib::history::HistoryLedger;
use alphabeta_lib::random::StandardRandomGenerator;
use alphabeta_lib::search::AlphaBetaSearch;
use std::time::Duration;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Create a new Tic-Tac-Toe board and the record of the game
    let mut board = TicTacToeBoard::default();
    let mut ledger = HistoryLedger::new();
    ledger.record(&board);

    // Create a new search instance that shuffles equally good moves
    let mut search = AlphaBetaSearch::builder()
        .with_random_tie_break(true)
        .with_random_generator(StandardRandomGenerator)
        .build();

    // Let the engine play both sides, 200 ms per move
    while !board.get_outcome().is_terminal() {
        let side = board.get_current_player();
        let limits = SearchLimits::with_time(Duration::from_millis(200));
        let result = match search.decide_with_limits(&mut board, side, limits, &ledger) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("search failed: {e}");
                return;
            }
        };

        let Some(b_move) = result.best_move else {
            break;
        };
        println!(
            "{side:?} plays {b_move} (score {}, depth {}, pv {:?})",
            result.score, result.depth, result.pv
        );
        board.perform_move(&b_move);
        ledger.record(&board);
        println!("{board}\n");
    }

    // Perfect play on both sides always ends in a draw
    let outcome = board.get_outcome();
    println!("The game ended with: {outcome:?}");
    assert_eq!(outcome, GameOutcome::Draw);
}
