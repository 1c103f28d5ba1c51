//! The external policy-value evaluator contract.
//!
//! Grounded on `native/mcts_pybind.cpp`'s policy-function lambda: a batch of states goes in
//! together with a pre-allocated scratch buffer the evaluator encodes into in place, and a
//! `(priors, value)` pair comes out per state, avoiding a per-call allocation on the hot path.

use crate::state::GameState;

/// Per-state result of a batched evaluation: move priors (parallel to `legal_moves()`, same
/// order) and a scalar value in `[-1, 1]` for the state's current player.
pub struct EvalResult<S: GameState> {
    pub priors: Vec<(S::Move, f64)>,
    pub value: f64,
}

/// A learned policy-value network, or any stand-in a caller supplies.
///
/// `evaluate` may block or call out to another runtime (e.g. a GPU inference server); the
/// engine never holds any lock of its own while invoking it, so implementations are free to
/// do as little or as much synchronization internally as they need.
pub trait Evaluator<S: GameState>: Send + Sync {
    /// Evaluate a batch of non-terminal states.
    ///
    /// `scratch` is a buffer of capacity `compact_state_size * eval_batch_size` the
    /// implementation may use to encode states without allocating; only the first
    /// `states.len() * compact_state_size` entries are meaningful for this call.
    fn evaluate(&self, states: &[S], scratch: &mut [f64]) -> Vec<EvalResult<S>>;
}
