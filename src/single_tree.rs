//! Single-tree MCTS: one tree, many workers descending it concurrently.
//!
//! Level 1 orchestration grounded on `hexwar-mcts/src/lib.rs`'s `MctsPlayer` (`best_move`,
//! `search_with_stats`) and on `native/mcts.h`'s `MCTS<State>` class (`get_move_counts`,
//! `update_with_move`, `update_with_move_index`, `reset`).

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

/// Splits `total` playouts across `workers` as evenly as possible; the first
/// `total % workers` workers get one extra, matching `native/mcts.h`'s playout partitioning.
fn partition_budget(total: usize, workers: usize) -> Vec<usize> {
    let base = total / workers;
    let rem = total % workers;
    (0..workers)
        .map(|i| base + usize::from(i < rem))
        .collect()
}

/// A single search tree, searched by `config.thread_pool_size` workers sharing one
/// evaluator and one worker pool.
pub struct SingleTreeMcts<S: GameState, E: Evaluator<S> + 'static> {
    config: EngineConfig,
    evaluator: Arc<E>,
    pool: WorkerPool,
    tree: Tree<S>,
}

impl<S: GameState, E: Evaluator<S> + 'static> SingleTreeMcts<S, E> {
    pub fn new(config: EngineConfig, evaluator: E) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.thread_pool_size)?;
        tracing::info!(
            c_puct = config.c_puct,
            n_playout = config.n_playout,
            thread_pool_size = config.thread_pool_size,
            eval_batch_size = config.eval_batch_size,
            "single-tree MCTS engine constructed"
        );
        Ok(Self {
            config,
            evaluator: Arc::new(evaluator),
            pool,
            tree: Tree::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the configured playout budget from `root_state` and return the active root's
    /// `(moves, visit_counts)`. Returns empty vectors if the root is already terminal.
    pub fn get_move_counts(&mut self, root_state: &S) -> (Vec<S::Move>, Vec<u64>) {
        if root_state.game_ended() {
            tracing::debug!("get_move_counts called on a terminal root; returning empty counts");
            return (Vec::new(), Vec::new());
        }

        let root = self.tree.current_root().clone();
        if root.is_leaf() && root_state.is_env_move() {
            Node::try_expand(&root, root_state.env_move_weights());
        }

        let budgets = partition_budget(self.config.n_playout, self.config.thread_pool_size);
        let c_puct = self.config.c_puct;
        let eval_batch_size = self.config.eval_batch_size;
        let compact_state_size = self.config.compact_state_size;
        let evaluator = &*self.evaluator;

        self.pool.scope(|scope| {
            for (worker_id, budget) in budgets.into_iter().enumerate() {
                let root = root.clone();
                let root_state = root_state.clone();
                scope.spawn(move |_| {
                    run_worker(
                        worker_id,
                        budget,
                        &root,
                        &root_state,
                        c_puct,
                        eval_batch_size,
                        compact_state_size,
                        evaluator,
                    );
                });
            }
        });

        self.tree.move_counts()
    }

    /// Advance the active root to the child reached by `mv`, preserving its accumulated
    /// statistics.
    pub fn update_with_move(&mut self, next_state: &S, mv: S::Move) -> Result<()> {
        self.tree.update_with_move(next_state, mv)
    }

    pub fn update_with_move_index(&mut self, next_state: &S, index: usize) -> Result<()> {
        self.tree.update_with_move_index(next_state, index)
    }

    /// Drop the tree and start over.
    pub fn reset(&mut self) {
        self.tree.reset();
    }

    /// The move with the most visits after a search, or `None` if the root has no children.
    pub fn best_move(&mut self, root_state: &S) -> Option<S::Move> {
        let (moves, counts) = self.get_move_counts(root_state);
        moves
            .into_iter()
            .zip(counts)
            .max_by_key(|(_, n)| *n)
            .map(|(mv, _)| mv)
    }
}

#[allow(clippy::too_many_arguments)]
fn run_worker<S: GameState, E: Evaluator<S>>(
    worker_id: usize,
    budget: usize,
    root: &Arc<Node<S>>,
    root_state: &S,
    c_puct: f64,
    eval_batch_size: usize,
    compact_state_size: usize,
    evaluator: &E,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(worker_id as u64);
    let mut batch: Batch<S> = Batch::new(eval_batch_size);
    let mut scratch = vec![0.0f64; eval_batch_size * compact_state_size];

    for _ in 0..budget {
        match descend(root, root_state, c_puct, &mut rng) {
            DescentOutcome::Terminal { path, value } => batch.push_terminal(path, value),
            DescentOutcome::Staged { path, state, .. } => batch.push_staged(path, state),
        }
        if batch.is_full() {
            batch.flush(evaluator, &mut scratch);
        }
    }
    if !batch.is_empty() {
        batch.flush(evaluator, &mut scratch);
    }
    tracing::trace!(worker_id, budget, "worker finished its playout budget");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvalResult;
    use crate::state::{Outcome, Turn};

    #[test]
    fn test_partition_budget_spreads_remainder() {
        assert_eq!(partition_budget(10, 3), vec![4, 3, 3]);
        assert_eq!(partition_budget(9, 3), vec![3, 3, 3]);
        assert_eq!(partition_budget(1, 4), vec![1, 0, 0, 0]);
    }

    #[derive(Clone)]
    struct TerminalAtRoot;

    impl GameState for TerminalAtRoot {
        type Move = u8;
        fn current_player(&self) -> Turn {
            Turn::Player(0)
        }
        fn game_ended(&self) -> bool {
            true
        }
        fn winner(&self) -> Option<Outcome> {
            Some(Outcome::Player(0))
        }
        fn legal_moves(&self) -> Vec<u8> {
            vec![]
        }
        fn env_move_weights(&self) -> Vec<(u8, f64)> {
            vec![]
        }
        fn do_move(&mut self, _mv: u8) {}
    }

    struct NeverCalledEvaluator;
    impl Evaluator<TerminalAtRoot> for NeverCalledEvaluator {
        fn evaluate(
            &self,
            _states: &[TerminalAtRoot],
            _scratch: &mut [f64],
        ) -> Vec<EvalResult<TerminalAtRoot>> {
            panic!("evaluator must not be called for a terminal root");
        }
    }

    #[test]
    fn test_terminal_root_returns_empty_counts_without_evaluating() {
        let config = EngineConfig::single_threaded(100);
        let mut engine = SingleTreeMcts::new(config, NeverCalledEvaluator).unwrap();
        let (moves, counts) = engine.get_move_counts(&TerminalAtRoot);
        assert!(moves.is_empty());
        assert!(counts.is_empty());
    }

    #[derive(Clone)]
    struct OneMoveLoss {
        moved: bool,
    }

    struct UniformEvaluator;
    impl Evaluator<OneMoveLoss> for UniformEvaluator {
        fn evaluate(
            &self,
            states: &[OneMoveLoss],
            _scratch: &mut [f64],
        ) -> Vec<EvalResult<OneMoveLoss>> {
            states
                .iter()
                .map(|_| EvalResult {
                    priors: vec![(0u8, 1.0)],
                    value: 0.0,
                })
                .collect()
        }
    }

    impl GameState for OneMoveLoss {
        type Move = u8;
        fn current_player(&self) -> Turn {
            Turn::Player(if self.moved { 1 } else { 0 })
        }
        fn game_ended(&self) -> bool {
            self.moved
        }
        fn winner(&self) -> Option<Outcome> {
            self.moved.then_some(Outcome::Player(1))
        }
        fn legal_moves(&self) -> Vec<u8> {
            vec![0]
        }
        fn env_move_weights(&self) -> Vec<(u8, f64)> {
            vec![]
        }
        fn do_move(&mut self, _mv: u8) {
            self.moved = true;
        }
    }

    #[test]
    fn test_single_legal_move_gets_all_the_visits() {
        let config = EngineConfig::single_threaded(10);
        let mut engine = SingleTreeMcts::new(config, UniformEvaluator).unwrap();
        let (moves, counts) = engine.get_move_counts(&OneMoveLoss { moved: false });
        assert_eq!(moves, vec![0u8]);
        // one playout is spent discovering and expanding the root itself before any
        // descent reaches this child, so the child sees n_playout - 1 visits.
        assert_eq!(counts, vec![9]);
    }
}
