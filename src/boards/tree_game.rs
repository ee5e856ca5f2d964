use crate::board::{Board, GameOutcome, Player};
use crate::random::RandomGenerator;
use crate::score::Score;
use ego_tree::{NodeId, NodeRef, Tree};

const ENDINGS: [GameOutcome; 3] = [
    GameOutcome::Win(Player::First),
    GameOutcome::Win(Player::Second),
    GameOutcome::Draw,
];

/// One position of a [`TreeGame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    /// Unique key, used as the position hash.
    pub key: u64,
    /// Static value from [`Player::First`]'s point of view.
    pub value: Score,
    /// Outcome when the node ends the game.
    pub outcome: GameOutcome,
}

/// A game given explicitly as a tree of positions.
///
/// A move is the index of a child of the current node. [`Player::First`] moves at the root and
/// the players alternate. Childless nodes that are not terminal are scored by their value.
pub struct TreeGame {
    tree: Tree<TreeNode>,
    path: Vec<NodeId>,
    next_key: u64,
}

impl TreeGame {
    /// A game consisting of the root alone.
    pub fn new(root_value: Score) -> Self {
        let tree = Tree::new(TreeNode {
            key: 1,
            value: root_value,
            outcome: GameOutcome::InProgress,
        });
        let root = tree.root().id();
        Self {
            tree,
            path: vec![root],
            next_key: 1,
        }
    }

    /// Generates a tree `depth` plies deep with 1 to `max_branching` children per node.
    ///
    /// About one child in ten ends the game.
    pub fn random<K: RandomGenerator>(rng: &mut K, depth: u8, max_branching: u8) -> Self {
        let mut game = TreeGame::new(rng.next_range(-1000, 1001));
        let root = game.root_id();
        game.grow(rng, root, depth, max_branching.max(1));
        game
    }

    fn grow<K: RandomGenerator>(
        &mut self,
        rng: &mut K,
        parent: NodeId,
        depth: u8,
        max_branching: u8,
    ) {
        if depth == 0 {
            return;
        }
        let count = rng.next_range(1, max_branching as i32 + 1);
        for _ in 0..count {
            if rng.next_range(0, 10) == 0 {
                let outcome = rng
                    .get_random_from_vec(&ENDINGS)
                    .copied()
                    .unwrap_or(GameOutcome::Draw);
                self.add_terminal(parent, outcome);
                continue;
            }
            let child = self.add_child(parent, rng.next_range(-1000, 1001));
            self.grow(rng, child, depth - 1, max_branching);
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    /// Appends a non-terminal child to `parent` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this game.
    pub fn add_child(&mut self, parent: NodeId, value: Score) -> NodeId {
        self.insert(parent, value, GameOutcome::InProgress)
    }

    /// Appends a child that ends the game with `outcome`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this game.
    pub fn add_terminal(&mut self, parent: NodeId, outcome: GameOutcome) -> NodeId {
        self.insert(parent, 0, outcome)
    }

    fn insert(&mut self, parent: NodeId, value: Score, outcome: GameOutcome) -> NodeId {
        self.next_key += 1;
        let node = TreeNode {
            key: self.next_key,
            value,
            outcome,
        };
        match self.tree.get_mut(parent) {
            Some(mut parent) => parent.append(node).id(),
            None => panic!("node {parent:?} is not part of this game"),
        }
    }

    /// Number of positions in the game.
    pub fn node_count(&self) -> usize {
        self.tree.nodes().count()
    }

    /// Number of moves played from the root.
    pub fn ply(&self) -> usize {
        self.path.len() - 1
    }

    fn current(&self) -> NodeRef<'_, TreeNode> {
        self.path
            .last()
            .and_then(|&id| self.tree.get(id))
            .unwrap_or_else(|| self.tree.root())
    }
}

impl Board for TreeGame {
    type Move = usize;

    fn get_current_player(&self) -> Player {
        if self.ply() % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    fn get_outcome(&self) -> GameOutcome {
        self.current().value().outcome
    }

    fn get_available_moves(&self, side: Player) -> Vec<Self::Move> {
        if side != self.get_current_player() || self.get_outcome().is_terminal() {
            return Vec::new();
        }
        (0..self.current().children().count()).collect()
    }

    /// # Panics
    ///
    /// Panics if the current node has no child with index `b_move`.
    fn perform_move(&mut self, b_move: &Self::Move) {
        let child = self.current().children().nth(*b_move).map(|c| c.id());
        match child {
            Some(id) => self.path.push(id),
            None => panic!("move {b_move} is not legal at ply {}", self.ply()),
        }
    }

    fn undo_move(&mut self, _b_move: &Self::Move) {
        if self.path.len() > 1 {
            self.path.pop();
        }
    }

    fn evaluate(&self, perspective: Player) -> Score {
        let value = self.current().value().value;
        match perspective {
            Player::First => value,
            Player::Second => -value,
        }
    }

    fn get_hash(&self) -> u64 {
        self.current().value().key
    }

    /// Leaves of the tree are scored statically.
    fn no_moves_outcome(&self, _side: Player) -> GameOutcome {
        GameOutcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, GameOutcome, Player};
    use crate::boards::tree_game::TreeGame;
    use crate::random::CustomNumberGenerator;
    use proptest::prelude::*;

    #[test]
    fn moves_walk_the_tree() {
        // arrange
        let mut game = TreeGame::new(5);
        let root = game.root_id();
        let a = game.add_child(root, 10);
        game.add_child(root, -10);
        game.add_terminal(a, GameOutcome::Win(Player::Second));

        // act
        game.perform_move(&0);

        // assert
        assert_eq!(game.get_current_player(), Player::Second);
        assert_eq!(game.evaluate(Player::First), 10);
        assert_eq!(game.evaluate(Player::Second), -10);
        assert_eq!(game.get_available_moves(Player::Second), vec![0]);
        assert!(game.get_available_moves(Player::First).is_empty());

        game.perform_move(&0);
        assert_eq!(game.get_outcome(), GameOutcome::Win(Player::Second));
        assert!(game.get_available_moves(Player::First).is_empty());

        game.undo_move(&0);
        game.undo_move(&0);
        assert_eq!(game.ply(), 0);
        assert_eq!(game.get_available_moves(Player::First), vec![0, 1]);
        assert_eq!(game.node_count(), 4);
    }

    #[test]
    fn leaves_have_no_moves_and_no_outcome() {
        let game = TreeGame::new(3);
        assert!(game.get_available_moves(Player::First).is_empty());
        assert_eq!(game.no_moves_outcome(Player::First), GameOutcome::InProgress);
        assert_eq!(game.get_outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn random_trees_are_reproducible() {
        let a = TreeGame::random(&mut CustomNumberGenerator::new(5), 4, 3);
        let b = TreeGame::random(&mut CustomNumberGenerator::new(5), 4, 3);
        assert_eq!(a.node_count(), b.node_count());
        assert_eq!(a.evaluate(Player::First), b.evaluate(Player::First));
        assert!(!a.get_available_moves(Player::First).is_empty());
    }

    proptest! {
        #[test]
        fn perform_then_undo_restores_hash(seed in 0i64..10_000, walk in prop::collection::vec(0usize..4, 0..6)) {
            let mut game = TreeGame::random(&mut CustomNumberGenerator::new(seed), 6, 4);
            let start = game.get_hash();
            let mut played = Vec::new();
            let mut hashes = vec![start];

            for choice in walk {
                let moves = game.get_available_moves(game.get_current_player());
                if moves.is_empty() {
                    break;
                }
                let b_move = moves[choice % moves.len()];
                game.perform_move(&b_move);
                played.push(b_move);
                hashes.push(game.get_hash());
            }

            for b_move in played.iter().rev() {
                hashes.pop();
                game.undo_move(b_move);
                prop_assert_eq!(Some(&game.get_hash()), hashes.last());
            }
            prop_assert_eq!(game.get_hash(), start);
            prop_assert_eq!(game.ply(), 0);
        }
    }
}
