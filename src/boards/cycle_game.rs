use crate::board::{Board, GameOutcome, Player};
use crate::score::Score;

/// A game on a directed graph in which positions can repeat.
///
/// A move is the index of the node moved to. Each node carries a static value from
/// [`Player::First`]'s point of view; the game never ends by itself, and a node without
/// outgoing edges is scored by its value.
#[derive(Debug, Clone)]
pub struct CycleGame {
    values: Vec<Score>,
    edges: Vec<Vec<usize>>,
    start_player: Player,
    path: Vec<usize>,
}

impl CycleGame {
    /// Node `A` of [`CycleGame::two_cycle`].
    pub const A: usize = 0;
    /// Node `B` of [`CycleGame::two_cycle`].
    pub const B: usize = 1;
    /// Node `C` of [`CycleGame::two_cycle`].
    pub const C: usize = 2;

    /// Creates a game that starts at `start` with `side_to_move` to play.
    ///
    /// Edges pointing outside the graph are dropped.
    pub fn new(
        values: Vec<Score>,
        mut edges: Vec<Vec<usize>>,
        start: usize,
        side_to_move: Player,
    ) -> Self {
        let nodes = values.len();
        edges.resize(nodes, Vec::new());
        for targets in edges.iter_mut() {
            targets.retain(|&t| t < nodes);
        }
        Self {
            values,
            edges,
            start_player: side_to_move,
            path: vec![start.min(nodes.saturating_sub(1))],
        }
    }

    /// `A <-> B -> C`, starting at `B` with [`Player::Second`] to move.
    ///
    /// From `First`'s point of view `A` is worth 300, `B` -100 and the dead end `C` 1000, so
    /// `Second` can only avoid `C` by going back and forth between `A` and `B`.
    pub fn two_cycle() -> Self {
        CycleGame::new(
            vec![300, -100, 1000],
            vec![vec![Self::B], vec![Self::A, Self::C], vec![]],
            Self::B,
            Player::Second,
        )
    }

    /// Hash of `node` with `side_to_move` to play.
    pub fn hash_of(node: usize, side_to_move: Player) -> u64 {
        let side = match side_to_move {
            Player::First => 0,
            Player::Second => 1,
        };
        ((node as u64) << 1) | side
    }

    /// The node the game is at.
    pub fn node(&self) -> usize {
        self.path.last().copied().unwrap_or(0)
    }
}

impl Board for CycleGame {
    type Move = usize;

    fn get_current_player(&self) -> Player {
        if self.path.len() % 2 == 1 {
            self.start_player
        } else {
            self.start_player.opponent()
        }
    }

    fn get_outcome(&self) -> GameOutcome {
        GameOutcome::InProgress
    }

    fn get_available_moves(&self, side: Player) -> Vec<Self::Move> {
        if side != self.get_current_player() {
            return Vec::new();
        }
        self.edges.get(self.node()).cloned().unwrap_or_default()
    }

    fn perform_move(&mut self, b_move: &Self::Move) {
        self.path.push(*b_move);
    }

    fn undo_move(&mut self, _b_move: &Self::Move) {
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    fn evaluate(&self, perspective: Player) -> Score {
        let value = self.values.get(self.node()).copied().unwrap_or(0);
        match perspective {
            Player::First => value,
            Player::Second => -value,
        }
    }

    fn get_hash(&self) -> u64 {
        CycleGame::hash_of(self.node(), self.get_current_player())
    }

    /// Dead ends are scored statically.
    fn no_moves_outcome(&self, _side: Player) -> GameOutcome {
        GameOutcome::InProgress
    }
}
