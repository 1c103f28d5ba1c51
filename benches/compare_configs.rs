//! Throughput comparison across thread-pool and batch-size configurations.
//!
//! Measures playouts/second for a tiny synthetic game across a handful of
//! `EngineConfig`s, the same plain-`Instant` style as the teacher's player-comparison
//! benchmark (no `criterion`, `harness = false`).

use std::time::Instant;

use banqi_mcts::{EngineConfig, EvalResult, Evaluator, GameState, Outcome, SingleTreeMcts, Turn};

#[derive(Clone)]
struct CountdownGame {
    remaining: u8,
    player: u8,
}

impl GameState for CountdownGame {
    type Move = u8;

    fn current_player(&self) -> Turn {
        Turn::Player(self.player)
    }

    fn game_ended(&self) -> bool {
        self.remaining == 0
    }

    fn winner(&self) -> Option<Outcome> {
        self.game_ended().then_some(Outcome::Player(self.player))
    }

    fn legal_moves(&self) -> Vec<u8> {
        vec![0, 1]
    }

    fn env_move_weights(&self) -> Vec<(u8, f64)> {
        Vec::new()
    }

    fn do_move(&mut self, _mv: u8) {
        self.remaining -= 1;
        self.player = 1 - self.player;
    }
}

struct UniformEvaluator;

impl Evaluator<CountdownGame> for UniformEvaluator {
    fn evaluate(&self, states: &[CountdownGame], _scratch: &mut [f64]) -> Vec<EvalResult<CountdownGame>> {
        states
            .iter()
            .map(|_| EvalResult {
                priors: vec![(0u8, 0.5), (1u8, 0.5)],
                value: 0.0,
            })
            .collect()
    }
}

fn run_config(label: &str, config: EngineConfig) {
    let mut engine = SingleTreeMcts::new(config.clone(), UniformEvaluator).unwrap();
    let root = CountdownGame {
        remaining: 6,
        player: 0,
    };
    let start = Instant::now();
    let (_moves, counts) = engine.get_move_counts(&root);
    let elapsed = start.elapsed();
    let total: u64 = counts.iter().sum();
    let playouts_per_sec = total as f64 / elapsed.as_secs_f64().max(1e-9);
    println!(
        "{label:<28} threads={:<3} batch={:<3} playouts={total:<8} time={:>8.3}ms  {:>10.0} playouts/s",
        config.thread_pool_size,
        config.eval_batch_size,
        elapsed.as_secs_f64() * 1000.0,
        playouts_per_sec,
    );
}

fn main() {
    println!("MCTS config comparison\n");

    run_config(
        "single-threaded, batch=1",
        EngineConfig::single_threaded(20_000),
    );
    run_config(
        "4 threads, batch=8",
        EngineConfig {
            n_playout: 20_000,
            thread_pool_size: 4,
            eval_batch_size: 8,
            ..EngineConfig::default()
        },
    );
    run_config(
        "8 threads, batch=32",
        EngineConfig {
            n_playout: 20_000,
            thread_pool_size: 8,
            eval_batch_size: 32,
            ..EngineConfig::default()
        },
    );
}
