//! Coalesces leaf-evaluation requests into fixed-size batches for the external evaluator.
//!
//! Grounded on `hexwar-mcts/src/search.rs`'s batch-buffer handling and on
//! `native/mcts_pybind.cpp`'s scratch-buffer-backed batched policy call
//! (`_eval_and_backprop_batch`). Terminal and non-terminal leaves share one buffer per
//! SPEC_FULL.md §4.3: a terminal playout costs nothing on the evaluator but still
//! contributes statistics, so starving it until a batch of non-terminal leaves fills would
//! hurt throughput for no reason.

use crate::evaluator::Evaluator;
use crate::node::Node;
use crate::playout::{backpropagate, unwind_virtual_loss, Path};
use crate::state::GameState;

struct StagedLeaf<S: GameState> {
    path: Path<S>,
    state: S,
}

struct TerminalLeaf<S: GameState> {
    path: Path<S>,
    value: f64,
}

/// Accumulates staged and already-resolved leaves until `eval_batch_size` entries have
/// arrived, or the caller forces a partial flush when a worker's budget runs out.
pub struct Batch<S: GameState> {
    eval_batch_size: usize,
    staged: Vec<StagedLeaf<S>>,
    terminal: Vec<TerminalLeaf<S>>,
}

impl<S: GameState> Batch<S> {
    pub fn new(eval_batch_size: usize) -> Self {
        Self {
            eval_batch_size,
            staged: Vec::with_capacity(eval_batch_size),
            terminal: Vec::new(),
        }
    }

    pub fn push_staged(&mut self, path: Path<S>, state: S) {
        self.staged.push(StagedLeaf { path, state });
    }

    pub fn push_terminal(&mut self, path: Path<S>, value: f64) {
        self.terminal.push(TerminalLeaf { path, value });
    }

    pub fn len(&self) -> usize {
        self.staged.len() + self.terminal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.eval_batch_size
    }

    /// Evaluate every staged leaf in one call, expand and back-propagate each, then
    /// back-propagate the already-known terminal outcomes, and clear the buffers.
    ///
    /// If a staged node was expanded by another worker in the meantime, its evaluation
    /// result is dropped and its path's virtual losses are unwound instead of backpropagated,
    /// per SPEC_FULL.md §4.3.
    pub fn flush(&mut self, evaluator: &dyn Evaluator<S>, scratch: &mut [f64]) {
        if !self.staged.is_empty() {
            let states: Vec<S> = self.staged.iter().map(|l| l.state.clone()).collect();
            let results = evaluator.evaluate(&states, scratch);
            for (leaf, result) in self.staged.drain(..).zip(results) {
                let Some(last_node) = leaf.path.last().map(|v| v.node.clone()) else {
                    continue;
                };
                if Node::try_expand(&last_node, result.priors) {
                    backpropagate(&leaf.path, result.value);
                } else {
                    unwind_virtual_loss(&leaf.path);
                }
            }
        }
        for leaf in self.terminal.drain(..) {
            backpropagate(&leaf.path, leaf.value);
        }
    }
}
