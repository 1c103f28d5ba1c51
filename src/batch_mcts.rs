//! Batch-MCTS: many independent games searched in parallel, sharing one batching discipline
//! across all of them.
//!
//! Grounded on `native/mcts.h`'s multi-game batching note and on
//! `hexwar-tournament/src/match_play.rs`'s `par_iter` parallel-games pattern: each worker
//! owns a disjoint slice of games and sweeps over it, producing at most one staged leaf per
//! game per sweep before flushing — matching SPEC_FULL.md §4.8.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::batch::Batch;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::evaluator::Evaluator;
use crate::node::Node;
use crate::playout::{descend, DescentOutcome};
use crate::pool::WorkerPool;
use crate::state::GameState;
use crate::tree::Tree;

fn partition_indices(n: usize, workers: usize) -> Vec<Vec<usize>> {
    let mut slices = vec![Vec::new(); workers];
    for i in 0..n {
        slices[i % workers].push(i);
    }
    slices
}

/// Pick the argmax-visit move and return a one-hot distribution over it, ties broken by
/// first occurrence — used when the caller wants a committed move rather than a training
/// target (SPEC_FULL.md §4.6, `small_temp == true`).
fn one_hot<M: Copy>(moves: Vec<M>, counts: Vec<u64>) -> (Vec<M>, Vec<f64>) {
    if moves.is_empty() {
        return (moves, Vec::new());
    }
    let mut argmax = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[argmax] {
            argmax = i;
        }
    }
    let probs = (0..counts.len())
        .map(|i| if i == argmax { 1.0 } else { 0.0 })
        .collect();
    (moves, probs)
}

/// Normalize visit counts to a probability distribution; all-zero if nothing was visited.
fn normalized<M>(moves: Vec<M>, counts: Vec<u64>) -> (Vec<M>, Vec<f64>) {
    let total: u64 = counts.iter().sum();
    let probs = if total == 0 {
        vec![0.0; counts.len()]
    } else {
        counts.iter().map(|&c| c as f64 / total as f64).collect()
    };
    (moves, probs)
}

/// One independent tree per game, searched together under the same worker pool and
/// evaluator.
pub struct BatchMcts<S: GameState, E: Evaluator<S> + 'static> {
    config: EngineConfig,
    evaluator: Arc<E>,
    pool: WorkerPool,
    trees: Vec<Tree<S>>,
}

impl<S: GameState, E: Evaluator<S> + 'static> BatchMcts<S, E> {
    pub fn new(config: EngineConfig, evaluator: E, n_games: usize) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.thread_pool_size)?;
        tracing::info!(
            n_games,
            thread_pool_size = config.thread_pool_size,
            eval_batch_size = config.eval_batch_size,
            "batch MCTS engine constructed"
        );
        Ok(Self {
            config,
            evaluator: Arc::new(evaluator),
            pool,
            trees: (0..n_games).map(|_| Tree::new()).collect(),
        })
    }

    pub fn num_games(&self) -> usize {
        self.trees.len()
    }

    /// Run the configured playout budget once across every game's tree, and return each
    /// game's `(moves, probabilities)` — a one-hot distribution if `small_temp`, else visit
    /// counts normalized to sum to one.
    pub fn get_move_probs(&mut self, states: &[S], small_temp: bool) -> Vec<(Vec<S::Move>, Vec<f64>)> {
        assert_eq!(
            states.len(),
            self.trees.len(),
            "one state is required per game"
        );

        for (tree, state) in self.trees.iter().zip(states) {
            let root = tree.current_root();
            if root.is_leaf() && state.is_env_move() {
                Node::try_expand(root, state.env_move_weights());
            }
        }

        let roots: Vec<Arc<Node<S>>> = self
            .trees
            .iter()
            .map(|tree| tree.current_root().clone())
            .collect();
        let slices = partition_indices(roots.len(), self.config.thread_pool_size);
        let c_puct = self.config.c_puct;
        let n_playout = self.config.n_playout;
        let eval_batch_size = self.config.eval_batch_size;
        let compact_state_size = self.config.compact_state_size;
        let evaluator = &*self.evaluator;

        self.pool.scope(|scope| {
            for (worker_id, indices) in slices.into_iter().enumerate() {
                let roots = &roots;
                scope.spawn(move |_| {
                    let mut rng = ChaCha8Rng::seed_from_u64(worker_id as u64);
                    let mut batch: Batch<S> = Batch::new(eval_batch_size);
                    let mut scratch = vec![0.0f64; eval_batch_size * compact_state_size];
                    for _sweep in 0..n_playout {
                        for &i in &indices {
                            match descend(&roots[i], &states[i], c_puct, &mut rng) {
                                DescentOutcome::Terminal { path, value } => {
                                    batch.push_terminal(path, value)
                                }
                                DescentOutcome::Staged { path, state, .. } => {
                                    batch.push_staged(path, state)
                                }
                            }
                            if batch.is_full() {
                                batch.flush(evaluator, &mut scratch);
                            }
                        }
                    }
                    if !batch.is_empty() {
                        batch.flush(evaluator, &mut scratch);
                    }
                    tracing::trace!(worker_id, "batch worker finished its games slice");
                });
            }
        });

        self.trees
            .iter()
            .map(|tree| {
                let (moves, counts) = tree.move_counts();
                if small_temp {
                    one_hot(moves, counts)
                } else {
                    normalized(moves, counts)
                }
            })
            .collect()
    }

    /// Re-root game `i`'s tree onto the child reached by `mv`.
    pub fn update_with_move(&mut self, game: usize, next_state: &S, mv: S::Move) -> Result<()> {
        self.trees[game].update_with_move(next_state, mv)
    }

    pub fn reset(&mut self, game: usize) {
        self.trees[game].reset();
    }
}
