//! Parallel, batched Monte Carlo Tree Search over an abstract two-adversary stochastic game.
//!
//! This crate has no opinion on what game is being played — it knows how to grow and search
//! a tree given a [`state::GameState`] implementation and a [`evaluator::Evaluator`] the
//! caller supplies. Concrete game rules, the evaluator's network, and any I/O around this
//! engine live outside this crate.
//!
//! ## Architecture
//!
//! - Level 1: [`single_tree::SingleTreeMcts`], [`batch_mcts::BatchMcts`] (orchestration)
//! - Level 2: [`tree::Tree`], [`batch::Batch`] (tree management, batching scheduler)
//! - Level 3: [`node::Node`] selection/expansion, [`playout`] descend/backprop
//! - Level 4: [`sync`], [`pool`] (atomics, worker pool)

mod batch;
mod batch_mcts;
mod config;
mod error;
mod evaluator;
mod node;
mod playout;
mod pool;
mod single_tree;
mod state;
mod sync;
mod tree;

pub use batch_mcts::BatchMcts;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use evaluator::{EvalResult, Evaluator};
pub use single_tree::SingleTreeMcts;
pub use state::{GameState, Outcome, Turn};
