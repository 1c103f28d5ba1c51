//! The search tree: owns the structural root and tracks the active search root.
//!
//! Grounded on `hexwar-mcts/src/tree.rs`'s `MctsTree` (owns root, exposes `best_move`,
//! `move_statistics`) and on `native/mcts.h`'s `_root`/`_current_root` fields plus
//! `update_with_move`/`update_with_move_index`/`reset`.

use std::sync::Arc;

use crate::error::{EngineError, Result};
use crate::node::Node;
use crate::state::GameState;

/// Owns a rooted tree of `Node<S>` and tracks which node is the active search root.
///
/// Re-rooting (`update_with_move`/`update_with_move_index`) advances `current_root` to a
/// child, preserving that child's accumulated statistics; everything above it stays
/// allocated (reachable via `parent()`) but is no longer visited by search.
pub struct Tree<S: GameState> {
    #[allow(dead_code)]
    root: Arc<Node<S>>,
    current_root: Arc<Node<S>>,
}

impl<S: GameState> Tree<S> {
    pub fn new() -> Self {
        let root = Node::new_root();
        Self {
            root: root.clone(),
            current_root: root,
        }
    }

    pub fn current_root(&self) -> &Arc<Node<S>> {
        &self.current_root
    }

    /// `(moves, visit_counts)` of the active root's children, in expansion order.
    pub fn move_counts(&self) -> (Vec<S::Move>, Vec<u64>) {
        self.current_root
            .children_snapshot()
            .into_iter()
            .map(|(mv, child)| (mv, child.n_visit()))
            .unzip()
    }

    /// Advance the active root to the child reached by `mv`, pre-expanding the new root with
    /// `next_state`'s environment weights if it is an unexplored environment leaf.
    ///
    /// If the active root is itself still an unexplored leaf (no children to search), this
    /// is a no-op: the tree simply loses whatever prior work it had. Only once the root has
    /// children does a move absent from them count as a hard error.
    pub fn update_with_move(&mut self, next_state: &S, mv: S::Move) -> Result<()> {
        if self.current_root.is_leaf() {
            return Ok(());
        }
        let children = self.current_root.children_snapshot();
        let found = children.into_iter().find(|(m, _)| *m == mv);
        let Some((_, child)) = found else {
            return Err(EngineError::UnknownMove);
        };
        self.current_root = child;
        self.pre_expand_env_leaf(next_state);
        Ok(())
    }

    /// Identical to `update_with_move` but selects the child by index, avoiding a linear
    /// search over moves.
    pub fn update_with_move_index(&mut self, next_state: &S, index: usize) -> Result<()> {
        if self.current_root.is_leaf() {
            return Ok(());
        }
        let children = self.current_root.children_snapshot();
        let len = children.len();
        let Some((_, child)) = children.into_iter().nth(index) else {
            return Err(EngineError::ChildIndexOutOfRange { index, len });
        };
        self.current_root = child;
        self.pre_expand_env_leaf(next_state);
        Ok(())
    }

    fn pre_expand_env_leaf(&self, next_state: &S) {
        if next_state.is_env_move() && self.current_root.is_leaf() {
            Node::try_expand(&self.current_root, next_state.env_move_weights());
        }
    }

    /// Drop the entire tree and start over with a fresh root.
    pub fn reset(&mut self) {
        let root = Node::new_root();
        self.root = root.clone();
        self.current_root = root;
    }
}

impl<S: GameState> Default for Tree<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Outcome, Turn};

    #[derive(Clone)]
    struct Stub {
        moved: Vec<u8>,
    }

    impl GameState for Stub {
        type Move = u8;
        fn current_player(&self) -> Turn {
            Turn::Player(0)
        }
        fn game_ended(&self) -> bool {
            false
        }
        fn winner(&self) -> Option<Outcome> {
            None
        }
        fn legal_moves(&self) -> Vec<u8> {
            vec![0, 1]
        }
        fn env_move_weights(&self) -> Vec<(u8, f64)> {
            vec![]
        }
        fn do_move(&mut self, mv: u8) {
            self.moved.push(mv);
        }
    }

    #[test]
    fn test_fresh_tree_has_empty_move_counts() {
        let tree: Tree<Stub> = Tree::new();
        let (moves, counts) = tree.move_counts();
        assert!(moves.is_empty());
        assert!(counts.is_empty());
    }

    #[test]
    fn test_update_with_move_unknown_is_error() {
        let mut tree: Tree<Stub> = Tree::new();
        Node::try_expand(tree.current_root(), vec![(0u8, 1.0)]);
        let state = Stub { moved: vec![] };
        assert!(tree.update_with_move(&state, 99).is_err());
    }

    #[test]
    fn test_update_with_move_advances_root() {
        let mut tree: Tree<Stub> = Tree::new();
        Node::try_expand(tree.current_root(), vec![(0u8, 0.5), (1u8, 0.5)]);
        let child_before = tree.current_root().children_snapshot()[0].1.clone();
        child_before.update(1.0);
        let state = Stub { moved: vec![] };
        tree.update_with_move(&state, 0).unwrap();
        assert_eq!(tree.current_root().n_visit(), 1);
    }

    #[test]
    fn test_reset_clears_tree() {
        let mut tree: Tree<Stub> = Tree::new();
        Node::try_expand(tree.current_root(), vec![(0u8, 1.0)]);
        tree.reset();
        assert!(tree.current_root().is_leaf());
    }
}
