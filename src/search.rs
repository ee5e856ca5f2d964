use crate::board::{Board, Bound, GameOutcome, Player};
use crate::cache::EvaluationCache;
use crate::config::SearchConfig;
use crate::deadline::SearchLimits;
use crate::error::{SearchError, SearchOutcome};
use crate::expander::NodeExpander;
use crate::history::{HistoryLedger, SearchPath};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use crate::score::{INFINITY, MAX_DEPTH, Score, clamp_heuristic, loss_in, win_in};
use crate::score_record::{ScoreRecord, SearchStats};

/// A pair of bounds `(alpha, beta)` with `alpha <= beta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub alpha: Score,
    pub beta: Score,
}

impl SearchWindow {
    /// Returns `None` when `alpha > beta`.
    pub fn new(alpha: Score, beta: Score) -> Option<Self> {
        if alpha <= beta {
            Some(Self { alpha, beta })
        } else {
            None
        }
    }

    /// The window that excludes nothing.
    pub fn full() -> Self {
        Self {
            alpha: -INFINITY,
            beta: INFINITY,
        }
    }

    /// The same window seen from the other side.
    pub fn flipped(self) -> Self {
        Self {
            alpha: -self.beta,
            beta: -self.alpha,
        }
    }
}

impl Default for SearchWindow {
    fn default() -> Self {
        SearchWindow::full()
    }
}

/// Time-bounded alpha-beta search over any [`Board`].
///
/// Holds the configuration and the per-episode state (evaluation cache, killer moves,
/// counters). The board itself is borrowed for the duration of each call and handed back
/// unchanged.
pub struct AlphaBetaSearch<T: Board, K: RandomGenerator> {
    pub(crate) config: SearchConfig,
    pub(crate) cache: EvaluationCache<T::Move>,
    pub(crate) expander: NodeExpander<T::Move>,
    pub(crate) random: K,
    pub(crate) limits: SearchLimits,
    pub(crate) path: SearchPath,
    pub(crate) stats: SearchStats,
    pub(crate) perspective: Player,
    pub(crate) root_hint: Option<T::Move>,
    pub(crate) stopped: bool,
    pub(crate) fault: Option<SearchError>,
}

impl<T: Board, K: RandomGenerator> Default for AlphaBetaSearch<T, K> {
    fn default() -> Self {
        AlphaBetaSearchBuilder::new().build()
    }
}

/// A builder for creating instances of `AlphaBetaSearch`.
pub struct AlphaBetaSearchBuilder<T: Board, K: RandomGenerator> {
    config: SearchConfig,
    random_generator: K,
    _board: std::marker::PhantomData<T>,
}

impl<T: Board, K: RandomGenerator> Default for AlphaBetaSearchBuilder<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Board, K: RandomGenerator> AlphaBetaSearchBuilder<T, K> {
    /// Creates a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
            random_generator: K::default(),
            _board: std::marker::PhantomData,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the deepest iteration the driver will start.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Sets the number of cache slots. Zero disables the evaluation cache.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Sets the value of a draw from the searching side's point of view.
    pub fn with_draw_score(mut self, score: Score) -> Self {
        self.config.draw_score = score;
        self
    }

    /// Sets how many occurrences of a position make a repetition draw.
    pub fn with_draw_threshold(mut self, threshold: u32) -> Self {
        self.config.draw_threshold = threshold;
        self
    }

    /// Enables or disables alpha-beta pruning.
    pub fn with_alpha_beta_pruning(mut self, use_abp: bool) -> Self {
        self.config.alpha_beta_pruning = use_abp;
        self
    }

    /// Enables or disables the hash check after every undo.
    pub fn with_undo_verification(mut self, verify: bool) -> Self {
        self.config.verify_undo = verify;
        self
    }

    /// Shuffles equally ranked moves using the random generator.
    pub fn with_random_tie_break(mut self, shuffle: bool) -> Self {
        self.config.random_tie_break = shuffle;
        self
    }

    /// Sets the random number generator used for tie-breaking.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Builds the `AlphaBetaSearch` instance with the configured parameters.
    pub fn build(self) -> AlphaBetaSearch<T, K> {
        AlphaBetaSearch::new(self.config, self.random_generator)
    }

    /// Like [`AlphaBetaSearchBuilder::build`], but rejects out-of-range settings.
    pub fn try_build(self) -> SearchOutcome<AlphaBetaSearch<T, K>> {
        self.config.validate()?;
        Ok(self.build())
    }
}

impl<T: Board, K: RandomGenerator> AlphaBetaSearch<T, K> {
    /// Returns a new builder for `AlphaBetaSearch`.
    pub fn builder() -> AlphaBetaSearchBuilder<T, K> {
        AlphaBetaSearchBuilder::new()
    }

    /// Creates a new `AlphaBetaSearch` instance.
    ///
    /// It is recommended to use the builder pattern via `AlphaBetaSearch::builder()` instead.
    pub fn new(config: SearchConfig, rg: K) -> Self {
        Self {
            cache: EvaluationCache::new(config.cache_capacity),
            expander: NodeExpander::new(),
            random: rg,
            limits: SearchLimits::default(),
            path: SearchPath::default(),
            stats: SearchStats::default(),
            perspective: Player::First,
            root_hint: None,
            stopped: false,
            fault: None,
            config,
        }
    }

    /// Creates an engine from a validated configuration.
    pub fn from_config(config: SearchConfig, rg: K) -> SearchOutcome<Self> {
        config.validate()?;
        Ok(Self::new(config, rg))
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Counters of the last episode.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// The evaluation cache of the last episode.
    pub fn cache(&self) -> &EvaluationCache<T::Move> {
        &self.cache
    }

    /// Searches `board` to a fixed `depth` and returns the value from `perspective`'s point
    /// of view, together with the best move for `side_to_move`.
    ///
    /// The search is unbounded in time and knows nothing about the game's past; see
    /// [`AlphaBetaSearch::search_with`] for both.
    pub fn search(
        &mut self,
        board: &mut T,
        depth: u8,
        window: SearchWindow,
        side_to_move: Player,
        perspective: Player,
    ) -> SearchOutcome<ScoreRecord<T::Move>> {
        self.search_with(
            board,
            &HistoryLedger::default(),
            depth,
            window,
            side_to_move,
            perspective,
            SearchLimits::default(),
        )
    }

    /// [`AlphaBetaSearch::search`] with a game history and limits.
    ///
    /// A record with `complete == false` means the limits stopped the search early. Depths
    /// beyond [`MAX_DEPTH`] are searched as `MAX_DEPTH`.
    #[allow(clippy::too_many_arguments)]
    pub fn search_with(
        &mut self,
        board: &mut T,
        ledger: &HistoryLedger,
        depth: u8,
        window: SearchWindow,
        side_to_move: Player,
        perspective: Player,
        limits: SearchLimits,
    ) -> SearchOutcome<ScoreRecord<T::Move>> {
        self.start_episode(limits, perspective);

        let depth = depth.min(MAX_DEPTH);
        let window = if side_to_move == perspective {
            window
        } else {
            window.flipped()
        };
        let record = self.negamax(board, ledger, depth, 0, window.alpha, window.beta, side_to_move);
        if let Some(fault) = self.fault.take() {
            return Err(fault);
        }

        Ok(if side_to_move == perspective {
            record
        } else {
            record.negated()
        })
    }

    /// Resets everything that lives for one top-level decision.
    pub(crate) fn start_episode(&mut self, limits: SearchLimits, perspective: Player) {
        self.cache.clear();
        self.expander.clear();
        self.path.clear();
        self.stats = SearchStats::default();
        self.limits = limits;
        self.perspective = perspective;
        self.root_hint = None;
        self.stopped = false;
        self.fault = None;
    }

    /// Checks the limits. Once they are exhausted the search stays stopped.
    #[inline]
    pub(crate) fn should_stop(&mut self) -> bool {
        if !self.stopped && self.limits.exhausted(self.stats.nodes) {
            self.stopped = true;
        }
        self.stopped
    }

    /// Value of a draw for `side`.
    pub(crate) fn draw_value(&self, side: Player) -> Score {
        if side == self.perspective {
            self.config.draw_score
        } else {
            -self.config.draw_score
        }
    }

    /// Value of a finished game for `side`, `ply` moves from the root.
    pub(crate) fn outcome_value(&self, outcome: GameOutcome, side: Player, ply: usize) -> Score {
        match outcome.winner() {
            Some(winner) if winner == side => win_in(ply),
            Some(_) => loss_in(ply),
            None => self.draw_value(side),
        }
    }

    /// The negamax tree walk. Values are from `side`'s point of view.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn negamax(
        &mut self,
        board: &mut T,
        ledger: &HistoryLedger,
        depth: u8,
        ply: usize,
        alpha: Score,
        beta: Score,
        side: Player,
    ) -> ScoreRecord<T::Move> {
        if self.should_stop() {
            self.stats.aborted_nodes += 1;
            return ScoreRecord::aborted(depth);
        }
        self.stats.nodes += 1;

        let outcome = board.get_outcome();
        if outcome.is_terminal() {
            return ScoreRecord::leaf(self.outcome_value(outcome, side, ply), depth);
        }

        let hash = board.get_hash();
        let earlier = ledger.occurrences(hash, side) + self.path.occurrences(hash, side);
        if ply > 0 && earlier + 1 >= self.config.draw_threshold {
            self.stats.repetition_draws += 1;
            log::trace!(
                "repetition draw at ply {ply} (hash {hash:#x}, seen {})",
                earlier + 1
            );
            return ScoreRecord::repetition(self.draw_value(side), depth);
        }

        // the root counts as an occurrence unless the ledger already holds it
        let on_path = ply > 0 || earlier == 0;
        if on_path {
            self.path.push(hash, side);
        }

        let record = self.expand(board, ledger, hash, depth, ply, alpha, beta, side, earlier > 0);

        if on_path {
            self.path.pop();
        }
        record
    }

    /// Searches the moves of a non-terminal node.
    ///
    /// `repeated` nodes have occurred before on the game or the line, so a cached value
    /// computed in another context may hide a repetition below them.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &mut self,
        board: &mut T,
        ledger: &HistoryLedger,
        hash: u64,
        depth: u8,
        ply: usize,
        mut alpha: Score,
        beta: Score,
        side: Player,
        repeated: bool,
    ) -> ScoreRecord<T::Move> {
        let moves = board.get_available_moves(side);
        if moves.is_empty() {
            return match board.no_moves_outcome(side) {
                GameOutcome::InProgress => {
                    ScoreRecord::leaf(clamp_heuristic(board.evaluate(side)), depth)
                }
                outcome => ScoreRecord::leaf(self.outcome_value(outcome, side, ply), depth),
            };
        }

        if depth == 0 {
            return ScoreRecord::leaf(clamp_heuristic(board.evaluate(side)), 0);
        }

        let mut remembered = None;
        if !self.cache.is_disabled() {
            self.stats.cache_probes += 1;
        }
        if let Some(hit) = self.cache.probe(hash, depth, ply, alpha, beta) {
            match hit.value {
                // the root always searches so that it reports a move of this iteration
                Some(value) if ply > 0 && !repeated => {
                    self.stats.cache_hits += 1;
                    log::trace!("cache hit at ply {ply}: {value} (hash {hash:#x})");
                    return ScoreRecord {
                        value,
                        best_move: hit.best_move,
                        depth,
                        complete: true,
                        path_dependent: false,
                    };
                }
                _ => remembered = hit.best_move,
            }
        }
        if remembered.is_none() && ply == 0 {
            remembered = self.root_hint.clone();
        }

        let random = if self.config.random_tie_break {
            Some(&mut self.random)
        } else {
            None
        };
        let ordered = self
            .expander
            .order(board, moves, side, ply, remembered.as_ref(), random);

        let original_alpha = alpha;
        let mut best = ScoreRecord {
            value: -INFINITY,
            best_move: None,
            depth,
            complete: true,
            path_dependent: false,
        };

        let pruning = self.config.alpha_beta_pruning;
        for (i, b_move) in ordered.iter().enumerate() {
            // without pruning every child is searched exactly
            let (child_alpha, child_beta) = if pruning {
                (-beta, -alpha)
            } else {
                (-INFINITY, INFINITY)
            };
            board.perform_move(b_move);
            let child = self
                .negamax(board, ledger, depth - 1, ply + 1, child_alpha, child_beta, side.opponent())
                .negated();
            board.undo_move(b_move);

            // only the first mismatch is reported
            if self.config.verify_undo && self.fault.is_none() {
                let found = board.get_hash();
                if found != hash {
                    log::warn!("undo of {b_move:?} at ply {ply} did not restore the position");
                    self.fault = Some(SearchError::UndoMismatch {
                        expected: hash,
                        found,
                        ply,
                    });
                    self.stopped = true;
                    best.complete = false;
                    return best;
                }
            }

            if !child.complete {
                best.complete = false;
                break;
            }
            best.path_dependent |= child.path_dependent;

            if child.value > best.value {
                best.value = child.value;
                best.best_move = Some(b_move.clone());
            }
            if best.value > alpha {
                alpha = best.value;
            }
            if alpha >= beta && pruning {
                self.stats.cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if board.move_priority(b_move, side) <= 0 {
                    self.expander.record_killer(ply, b_move);
                }
                log::trace!("cutoff at ply {ply} after {} of {} moves", i + 1, ordered.len());
                break;
            }
        }

        if best.complete && !best.path_dependent {
            let bound = if !pruning {
                Bound::Exact
            } else if best.value <= original_alpha {
                Bound::Upper
            } else if best.value >= beta {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.cache
                .store(hash, depth, ply, best.value, bound, best.best_move.clone());
        }
        best
    }
}

impl<T: Board> AlphaBetaSearch<T, StandardRandomGenerator> {
    /// An engine with the default configuration.
    pub fn with_defaults() -> Self {
        AlphaBetaSearchBuilder::new().build()
    }
}
