//! Single-path descent, terminal-value resolution, and back-propagation.
//!
//! Grounded on `hexwar-mcts/src/search.rs`'s sequential search loop and on
//! `native/mcts.h`'s `_playout_single_path`/`_backprop_single_path`.

use std::sync::Arc;

use rand::Rng;

use crate::node::Node;
use crate::state::{GameState, Outcome, Turn};

/// One node visited during a descent, together with whose turn it was on arrival.
pub struct VisitedNode<S: GameState> {
    pub node: Arc<Node<S>>,
    pub player: Turn,
}

/// The path recorded by a single descent, from the active root to the leaf.
pub type Path<S> = Vec<VisitedNode<S>>;

/// Where a descent landed.
pub enum DescentOutcome<S: GameState> {
    /// The descent reached a game-over state; the value is already known.
    Terminal { path: Path<S>, value: f64 },
    /// The descent reached a non-terminal, unexpanded player-turn leaf; it needs evaluation.
    Staged { path: Path<S>, state: S, leaf: Arc<Node<S>> },
}

/// Value of a terminal state from its own `current_player`'s perspective: +1 if that player
/// won, -1 if they lost, 0 for a draw.
pub fn terminal_value<S: GameState>(state: &S) -> f64 {
    match state.winner() {
        None => 0.0,
        Some(Outcome::Draw) => 0.0,
        Some(Outcome::Player(winner)) => {
            if state.current_player() == Turn::Player(winner) {
                1.0
            } else {
                -1.0
            }
        }
    }
}

/// Descend from `root` (whose associated game state is `root_state`) to a leaf: a
/// not-yet-expanded player-turn node, or a terminal state. Environment leaves are expanded
/// and sampled through in the same descent rather than being returned, since they carry no
/// evaluation cost.
///
/// Adds one virtual loss to every node visited; callers are responsible for removing it,
/// either via `backpropagate` or `unwind_virtual_loss`.
pub fn descend<S: GameState>(
    root: &Arc<Node<S>>,
    root_state: &S,
    c_puct: f64,
    rng: &mut impl Rng,
) -> DescentOutcome<S> {
    let mut state = root_state.clone();
    let mut node = root.clone();
    let mut path: Path<S> = Vec::new();

    loop {
        node.add_virtual_loss();
        path.push(VisitedNode {
            node: node.clone(),
            player: state.current_player(),
        });

        if state.game_ended() {
            let value = terminal_value(&state);
            return DescentOutcome::Terminal { path, value };
        }

        let is_env = state.is_env_move();
        if node.is_leaf() {
            if is_env {
                Node::try_expand(&node, state.env_move_weights());
                let (mv, child) = Node::env_select(&node, rng);
                state.do_move(mv);
                node = child;
            } else {
                let leaf = node.clone();
                return DescentOutcome::Staged { path, state, leaf };
            }
        } else {
            let (mv, child) = if is_env {
                Node::env_select(&node, rng)
            } else {
                Node::select(&node, c_puct, rng)
            };
            state.do_move(mv);
            node = child;
        }
    }
}

/// Back-propagate `value` (expressed from the perspective of the player to move at the
/// leaf — the last entry in `path`) to every node on the path, removing each node's virtual
/// loss as it goes.
pub fn backpropagate<S: GameState>(path: &Path<S>, value: f64) {
    let Some(last) = path.last() else { return };
    let last_player = last.player;
    for entry in path.iter().rev() {
        entry.node.remove_virtual_loss();
        entry.node.update(signed_value(entry.player, last_player, value));
    }
}

/// Undo the virtual losses added along `path` without recording any visit or value — used
/// when a staged leaf's expansion was aborted because another worker expanded it first.
pub fn unwind_virtual_loss<S: GameState>(path: &Path<S>) {
    for entry in path.iter().rev() {
        entry.node.remove_virtual_loss();
    }
}

fn signed_value(player: Turn, last_player: Turn, value: f64) -> f64 {
    match (player, last_player) {
        (Turn::Player(a), Turn::Player(b)) if a == b => value,
        (Turn::Player(_), Turn::Player(_)) => -value,
        _ => 0.0,
    }
}
