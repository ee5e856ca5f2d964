//! Iterative deepening on top of [`AlphaBetaSearch`].
//!
//! The driver searches depth 1, 2, ... until the limits run out and answers with the best move
//! of the deepest depth that finished. An interrupted depth never overrides a finished one.

use crate::board::{Board, GameOutcome, Player};
use crate::deadline::SearchLimits;
use crate::error::SearchOutcome;
use crate::history::HistoryLedger;
use crate::random::RandomGenerator;
use crate::score::{INFINITY, MAX_DEPTH, Score, clamp_heuristic};
use crate::score_record::{DecisionKind, ScoreRecord, SearchResult};
use crate::search::AlphaBetaSearch;
use std::time::{Duration, Instant};

/// Growth of the iteration time assumed until two depths have been timed.
const DEFAULT_GROWTH: f64 = 3.0;
const MIN_GROWTH: f64 = 1.5;
const MAX_GROWTH: f64 = 5.0;

impl<T: Board, K: RandomGenerator> AlphaBetaSearch<T, K> {
    /// Chooses a move for `side` within `budget`.
    ///
    /// Knows nothing about earlier positions of the game, so repetitions are only detected
    /// inside the search tree. Use [`AlphaBetaSearch::decide_with_limits`] to pass the history.
    pub fn decide(
        &mut self,
        board: &mut T,
        side: Player,
        budget: Duration,
    ) -> SearchOutcome<SearchResult<T::Move>> {
        self.decide_with_limits(
            board,
            side,
            SearchLimits::with_time(budget),
            &HistoryLedger::default(),
        )
    }

    /// Chooses a move for `side` within `limits`, treating positions of `ledger` as already
    /// played.
    ///
    /// The ledger should contain the current position. The board is returned unchanged.
    /// Fails only when an `undo_move` did not restore the board.
    pub fn decide_with_limits(
        &mut self,
        board: &mut T,
        side: Player,
        limits: SearchLimits,
        ledger: &HistoryLedger,
    ) -> SearchOutcome<SearchResult<T::Move>> {
        let started = Instant::now();
        self.start_episode(limits, side);

        let outcome = board.get_outcome();
        if outcome.is_terminal() {
            return Ok(self.game_over(board, outcome, side));
        }
        let moves = board.get_available_moves(side);
        if moves.is_empty() {
            let outcome = board.no_moves_outcome(side);
            return Ok(self.game_over(board, outcome, side));
        }

        let max_depth = limits
            .max_depth
            .unwrap_or(self.config.max_depth)
            .clamp(1, MAX_DEPTH);

        let mut best: Option<ScoreRecord<T::Move>> = None;
        let mut partial_move = None;
        let mut previous_time: Option<Duration> = None;

        for depth in 1..=max_depth {
            if self.should_stop() {
                break;
            }
            let iteration_start = Instant::now();
            let record = self.negamax(board, ledger, depth, 0, -INFINITY, INFINITY, side);
            if let Some(fault) = self.fault.take() {
                return Err(fault);
            }

            if !record.complete {
                log::debug!(
                    "depth {depth} interrupted after {} nodes",
                    self.stats.nodes
                );
                if best.is_none() {
                    partial_move = record.best_move;
                }
                break;
            }

            let elapsed = iteration_start.elapsed();
            let pv = self.principal_variation(board, record.best_move.as_ref(), side, depth);
            log::debug!(
                "depth {depth}: score {} pv {:?} nodes {} in {:?}",
                record.value,
                pv,
                self.stats.nodes,
                elapsed
            );

            self.root_hint = record.best_move.clone();
            let decisive = record.is_decisive();
            best = Some(record);
            if decisive {
                break;
            }

            if let Some(remaining) = self.limits.deadline.remaining() {
                let growth = match previous_time {
                    Some(prev) if !prev.is_zero() => (elapsed.as_secs_f64() / prev.as_secs_f64())
                        .clamp(MIN_GROWTH, MAX_GROWTH),
                    _ => DEFAULT_GROWTH,
                };
                let estimate = elapsed.mul_f64(growth);
                if estimate > remaining {
                    log::debug!(
                        "depth {} would take about {:?}, {:?} left",
                        depth + 1,
                        estimate,
                        remaining
                    );
                    break;
                }
            }
            previous_time = Some(elapsed);
        }

        let result = match best {
            Some(record) => {
                let pv = self.principal_variation(
                    board,
                    record.best_move.as_ref(),
                    side,
                    record.depth,
                );
                SearchResult {
                    best_move: record.best_move,
                    score: record.value,
                    depth: record.depth,
                    pv,
                    kind: DecisionKind::Searched,
                    stats: self.stats.clone(),
                }
            }
            None => {
                let best_move = match partial_move {
                    Some(b_move) => Some(b_move),
                    None => self
                        .expander
                        .order::<T, K>(board, moves, side, 0, None, None)
                        .into_iter()
                        .next(),
                };
                log::warn!("no depth completed, falling back to {best_move:?}");
                SearchResult {
                    pv: best_move.iter().cloned().collect(),
                    best_move,
                    score: clamp_heuristic(board.evaluate(side)),
                    depth: 0,
                    kind: DecisionKind::Fallback,
                    stats: self.stats.clone(),
                }
            }
        };

        log::info!(
            "{side:?} plays {:?}: score {}, depth {}, {} nodes in {:?}",
            result.best_move,
            result.score,
            result.depth,
            result.stats.nodes,
            started.elapsed()
        );
        Ok(result)
    }

    /// Scores every root move with a full-window search of `depth` plies, best first.
    ///
    /// Equal scores keep the adapter's move order. Depths beyond [`MAX_DEPTH`] are searched
    /// as `MAX_DEPTH`.
    pub fn analyze_root(
        &mut self,
        board: &mut T,
        side: Player,
        depth: u8,
        ledger: &HistoryLedger,
    ) -> SearchOutcome<Vec<(T::Move, Score)>> {
        self.start_episode(SearchLimits::default(), side);

        let mut scored = Vec::new();
        if board.get_outcome().is_terminal() {
            return Ok(scored);
        }

        let root = board.get_hash();
        let root_on_path = ledger.occurrences(root, side) == 0;
        if root_on_path {
            self.path.push(root, side);
        }

        let child_depth = depth.clamp(1, MAX_DEPTH) - 1;
        for b_move in board.get_available_moves(side) {
            board.perform_move(&b_move);
            let child = self
                .negamax(board, ledger, child_depth, 1, -INFINITY, INFINITY, side.opponent())
                .negated();
            board.undo_move(&b_move);
            if let Some(fault) = self.fault.take() {
                return Err(fault);
            }
            scored.push((b_move, child.value));
        }

        if root_on_path {
            self.path.pop();
        }

        scored.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(scored)
    }

    fn game_over(
        &self,
        board: &T,
        outcome: GameOutcome,
        side: Player,
    ) -> SearchResult<T::Move> {
        let score = match outcome {
            GameOutcome::InProgress => clamp_heuristic(board.evaluate(side)),
            outcome => self.outcome_value(outcome, side, 0),
        };
        log::info!("no move to search for {side:?}: {outcome:?}");
        SearchResult {
            best_move: None,
            score,
            depth: 0,
            pv: Vec::new(),
            kind: DecisionKind::GameOver(outcome),
            stats: self.stats.clone(),
        }
    }

    /// Follows the cached best moves from the root, starting with `first`.
    fn principal_variation(
        &self,
        board: &mut T,
        first: Option<&T::Move>,
        side: Player,
        depth: u8,
    ) -> Vec<T::Move> {
        let mut line = Vec::new();
        let Some(first) = first else {
            return line;
        };

        let mut seen = vec![board.get_hash()];
        let mut next = Some(first.clone());
        let mut to_move = side;
        while let Some(b_move) = next.take() {
            board.perform_move(&b_move);
            line.push(b_move);
            to_move = to_move.opponent();

            if line.len() >= depth as usize || board.get_outcome().is_terminal() {
                break;
            }
            let hash = board.get_hash();
            if seen.contains(&hash) {
                break;
            }
            seen.push(hash);
            next = self
                .cache
                .best_move(hash)
                .filter(|m| board.get_available_moves(to_move).contains(m));
        }

        for b_move in line.iter().rev() {
            board.undo_move(b_move);
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::cycle_game::CycleGame;
    use crate::boards::tic_tac_toe::TicTacToeBoard;
    use crate::boards::tree_game::TreeGame;
    use crate::random::CustomNumberGenerator;
    use crate::score::win_in;

    use proptest::prelude::*;

    type TreeSearch = AlphaBetaSearch<TreeGame, CustomNumberGenerator>;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// First wins in three plies with move 2, which looks worst at depth 1 and 2.
    /// Move 0 looks best at depth 1 and 2.
    fn win_in_three() -> TreeGame {
        let mut game = TreeGame::new(0);
        let root = game.root_id();

        let lure = game.add_child(root, 900);
        for value in [800, 100, 800, 800] {
            game.add_child(lure, value);
        }
        let quiet = game.add_child(root, 0);
        for value in [50, 60] {
            game.add_child(quiet, value);
        }
        let winning = game.add_child(root, -500);
        for _ in 0..4 {
            let reply = game.add_child(winning, -400);
            game.add_child(reply, 0);
            game.add_terminal(reply, GameOutcome::Win(Player::First));
        }
        let quiet = game.add_child(root, 0);
        for value in [60, 50] {
            game.add_child(quiet, value);
        }
        game
    }

    fn nodes_to_finish(depth: u8) -> u64 {
        let mut game = win_in_three();
        let mut search = TreeSearch::default();
        let result = search
            .decide_with_limits(
                &mut game,
                Player::First,
                SearchLimits::with_depth(depth),
                &HistoryLedger::default(),
            )
            .unwrap();
        assert_eq!(result.depth, depth);
        result.stats.nodes
    }

    #[test]
    fn finds_the_forced_win() {
        init_logger();
        for (pruning, shuffle) in [(true, false), (false, false), (true, true)] {
            // arrange
            let mut game = win_in_three();
            let before = game.get_hash();
            let mut search: TreeSearch = AlphaBetaSearch::builder()
                .with_alpha_beta_pruning(pruning)
                .with_random_tie_break(shuffle)
                .with_random_generator(CustomNumberGenerator::new(7))
                .build();

            // act
            let result = search
                .decide(&mut game, Player::First, Duration::from_secs(10))
                .unwrap();

            // assert
            assert_eq!(result.best_move, Some(2));
            assert_eq!(result.score, win_in(3));
            assert_eq!(result.depth, 3);
            assert_eq!(result.plies_to_end(), Some(3));
            assert_eq!(result.kind, DecisionKind::Searched);
            assert_eq!(result.pv.len(), 3);
            assert_eq!(result.pv[0], 2);
            assert_eq!(game.get_hash(), before);
        }
    }

    #[test]
    fn shallow_depths_prefer_the_lure() {
        let mut game = win_in_three();
        let mut search = TreeSearch::default();

        let result = search
            .decide_with_limits(
                &mut game,
                Player::First,
                SearchLimits::with_depth(2),
                &HistoryLedger::default(),
            )
            .unwrap();

        assert_eq!(result.best_move, Some(0));
        assert_eq!(result.score, 100);
        assert_eq!(result.pv, vec![0, 1]);
    }

    #[test]
    fn interrupted_depth_never_overrides_finished_one() {
        // arrange
        init_logger();
        let finished = nodes_to_finish(2);
        let next = nodes_to_finish(3);
        assert!(next > finished + 1);

        for extra in 1..(next - finished) {
            let mut game = win_in_three();
            let mut search = TreeSearch::default();

            // act
            let result = search
                .decide_with_limits(
                    &mut game,
                    Player::First,
                    SearchLimits::default().nodes(finished + extra),
                    &HistoryLedger::default(),
                )
                .unwrap();

            // assert
            assert_eq!(result.depth, 2, "node budget {}", finished + extra);
            assert_eq!(result.best_move, Some(0));
            assert_eq!(result.score, 100);
            assert_eq!(result.kind, DecisionKind::Searched);
        }
    }

    #[test]
    fn falls_back_when_nothing_finishes() {
        let mut game = win_in_three();
        let mut search = TreeSearch::default();

        let by_nodes = search
            .decide_with_limits(
                &mut game,
                Player::First,
                SearchLimits::default().nodes(1),
                &HistoryLedger::default(),
            )
            .unwrap();
        assert!(by_nodes.is_fallback());
        assert_eq!(by_nodes.depth, 0);
        assert!(by_nodes.best_move.is_some_and(|m| m < 4));

        let by_time = search
            .decide(&mut game, Player::First, Duration::ZERO)
            .unwrap();
        assert!(by_time.is_fallback());
        assert_eq!(by_time.score, 0);
        assert_eq!(by_time.pv.len(), 1);
    }

    #[test]
    fn finished_game_is_reported() {
        let mut board = TicTacToeBoard::default();
        for m in [0, 3, 1, 4, 2] {
            board.perform_move(&m);
        }
        let mut search: AlphaBetaSearch<TicTacToeBoard, CustomNumberGenerator> =
            AlphaBetaSearch::default();

        let result = search
            .decide(&mut board, Player::Second, Duration::from_secs(1))
            .unwrap();

        assert_eq!(result.best_move, None);
        assert_eq!(
            result.kind,
            DecisionKind::GameOver(GameOutcome::Win(Player::First))
        );
        assert!(result.score < 0);
        assert!(result.plies_to_end() == Some(0));
    }

    #[test]
    fn tic_tac_toe_is_a_draw() {
        let mut board = TicTacToeBoard::default();
        let mut search: AlphaBetaSearch<TicTacToeBoard, CustomNumberGenerator> =
            AlphaBetaSearch::default();

        let result = search
            .decide_with_limits(
                &mut board,
                Player::First,
                SearchLimits::with_depth(9),
                &HistoryLedger::default(),
            )
            .unwrap();

        assert_eq!(result.score, 0);
        assert_eq!(result.depth, 9);
        assert!(result.best_move.is_some());
        assert!(result.stats.cutoffs > 0);
    }

    #[test]
    fn blocks_the_immediate_threat() {
        // X holds 0 and 1; O must take 2
        let mut board = TicTacToeBoard::default();
        for m in [0, 4, 1] {
            board.perform_move(&m);
        }
        let mut search: AlphaBetaSearch<TicTacToeBoard, CustomNumberGenerator> =
            AlphaBetaSearch::default();

        let result = search
            .decide(&mut board, Player::Second, Duration::from_secs(5))
            .unwrap();

        assert_eq!(result.best_move, Some(2));
    }

    #[test]
    fn repetition_in_history_scores_as_draw() {
        // arrange: B and A have both been seen twice
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut ledger = HistoryLedger::new();
        for _ in 0..2 {
            ledger.record_hash(CycleGame::hash_of(CycleGame::A, Player::First), Player::First);
            ledger.record(&board);
        }
        let mut search: AlphaBetaSearch<CycleGame, CustomNumberGenerator> =
            AlphaBetaSearch::builder().with_draw_score(-25).build();

        // act
        let scored = search.analyze_root(&mut board, side, 1, &ledger).unwrap();

        // assert
        let to_a = scored.iter().find(|(m, _)| *m == CycleGame::A).unwrap();
        assert_eq!(to_a.1, -25);
        assert!(search.stats().repetition_draws > 0);
    }

    #[test]
    fn without_history_the_cycle_is_scored_statically() {
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut search: AlphaBetaSearch<CycleGame, CustomNumberGenerator> =
            AlphaBetaSearch::builder().with_draw_score(-25).build();

        let scored = search
            .analyze_root(&mut board, side, 1, &HistoryLedger::default())
            .unwrap();

        let to_a = scored.iter().find(|(m, _)| *m == CycleGame::A).unwrap();
        assert_eq!(to_a.1, -300);
        assert_eq!(search.stats().repetition_draws, 0);
    }

    #[test]
    fn repetition_inside_the_tree_scores_as_draw() {
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut ledger = HistoryLedger::new();
        ledger.record(&board);
        let mut search: AlphaBetaSearch<CycleGame, CustomNumberGenerator> =
            AlphaBetaSearch::builder().with_draw_score(-25).build();

        let scored = search.analyze_root(&mut board, side, 6, &ledger).unwrap();

        assert_eq!(scored[0], (CycleGame::A, -25));
        assert_eq!(scored[1], (CycleGame::C, -1000));
    }

    #[test]
    fn cycle_decision_avoids_the_losing_exit() {
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut ledger = HistoryLedger::new();
        ledger.record(&board);
        let mut search: AlphaBetaSearch<CycleGame, CustomNumberGenerator> =
            AlphaBetaSearch::builder().with_max_depth(8).build();

        let result = search
            .decide_with_limits(&mut board, side, SearchLimits::default(), &ledger)
            .unwrap();

        assert_eq!(result.best_move, Some(CycleGame::A));
        assert_eq!(result.score, 0);
        assert_eq!(board.get_hash(), CycleGame::two_cycle().get_hash());
    }

    fn cycle_search(cache_capacity: usize) -> AlphaBetaSearch<CycleGame, CustomNumberGenerator> {
        AlphaBetaSearch::builder()
            .with_draw_score(-25)
            .with_cache_capacity(cache_capacity)
            .build()
    }

    #[test]
    fn cache_keeps_repetition_draws_across_depths() {
        init_logger();
        for depth in [4, 5, 6, 8] {
            // arrange
            let mut board = CycleGame::two_cycle();
            let side = board.get_current_player();
            let mut ledger = HistoryLedger::new();
            ledger.record(&board);
            let mut cached = cycle_search(1 << 10);
            let mut uncached = cycle_search(0);

            // act
            let with_cache = cached
                .decide_with_limits(&mut board, side, SearchLimits::with_depth(depth), &ledger)
                .unwrap();
            let without_cache = uncached
                .decide_with_limits(&mut board, side, SearchLimits::with_depth(depth), &ledger)
                .unwrap();

            // assert
            assert_eq!(with_cache.score, -25, "depth {depth}");
            assert_eq!(with_cache.best_move, Some(CycleGame::A));
            assert!(with_cache.stats.repetition_draws > 0);
            assert_eq!(with_cache.score, without_cache.score);
            assert_eq!(with_cache.depth, depth);
        }
    }

    #[test]
    fn decide_counts_the_root_as_an_occurrence() {
        // no history: B is seen at the root, at ply 2 and is drawn at ply 4
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut search: AlphaBetaSearch<CycleGame, CustomNumberGenerator> =
            AlphaBetaSearch::builder()
                .with_draw_score(-25)
                .with_max_depth(4)
                .build();

        let result = search
            .decide(&mut board, side, Duration::from_secs(5))
            .unwrap();

        assert_eq!(result.depth, 4);
        assert_eq!(result.score, -25);
        assert_eq!(result.best_move, Some(CycleGame::A));
        assert!(result.stats.repetition_draws > 0);
        assert_eq!(board.get_hash(), CycleGame::two_cycle().get_hash());
    }

    #[test]
    fn analysis_counts_the_root_without_history() {
        let mut board = CycleGame::two_cycle();
        let side = board.get_current_player();
        let mut search = cycle_search(0);

        let scored = search
            .analyze_root(&mut board, side, 4, &HistoryLedger::default())
            .unwrap();

        assert_eq!(scored[0], (CycleGame::A, -25));
    }

    #[test]
    fn analysis_depth_is_capped() {
        let mut game = win_in_three();
        let mut search = TreeSearch::default();

        let scored = search
            .analyze_root(&mut game, Player::First, u8::MAX, &HistoryLedger::default())
            .unwrap();

        assert_eq!(scored[0], (2, win_in(3)));
        assert!(crate::score::is_decisive(scored[0].1));
    }

    #[test]
    fn analysis_is_sorted_and_leaves_board_untouched() {
        let mut game = win_in_three();
        let before = game.get_hash();
        let mut search = TreeSearch::default();

        let scored = search
            .analyze_root(&mut game, Player::First, 3, &HistoryLedger::default())
            .unwrap();

        assert_eq!(scored.len(), 4);
        assert_eq!(scored[0], (2, win_in(3)));
        assert!(scored.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(game.get_hash(), before);
    }

    proptest! {
        #[test]
        fn deeper_choice_is_never_worse(seed in 0i64..100_000, depth in 1u8..5) {
            let mut game = TreeGame::random(&mut CustomNumberGenerator::new(seed), depth + 1, 3);
            let mut search = TreeSearch::default();

            let shallow = search
                .decide_with_limits(
                    &mut game,
                    Player::First,
                    SearchLimits::with_depth(depth),
                    &HistoryLedger::default(),
                )
                .unwrap();
            let deep = search
                .decide_with_limits(
                    &mut game,
                    Player::First,
                    SearchLimits::with_depth(depth + 1),
                    &HistoryLedger::default(),
                )
                .unwrap();
            let scored = search
                .analyze_root(&mut game, Player::First, deep.depth, &HistoryLedger::default())
                .unwrap();

            let value_of = |m: &usize| scored.iter().find(|(b, _)| b == m).map(|(_, v)| *v);
            let shallow_value = shallow.best_move.as_ref().and_then(value_of);
            let deep_value = deep.best_move.as_ref().and_then(value_of);
            prop_assert!(deep_value >= shallow_value);
            prop_assert_eq!(deep_value, Some(deep.score));
        }
    }
}
