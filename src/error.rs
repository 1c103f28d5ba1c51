//! Typed errors for everything that is a caller mistake or a pre-flight failure.
//!
//! Deep invariant violations inside a worker's hot path (an environment turn with no legal
//! outcomes, backpropagation overrunning the active root) are bugs in the caller's
//! `GameState` implementation, not recoverable conditions — those panic rather than
//! returning one of these variants, per the contract-violation design in SPEC_FULL.md §7.

use thiserror::Error;

/// Errors returned by engine construction and tree management.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool with {threads} threads: {source}")]
    PoolInit {
        threads: usize,
        #[source]
        source: rayon::ThreadPoolBuildError,
    },

    #[error("move not found among the active root's children during re-rooting")]
    UnknownMove,

    #[error("child index {index} out of range (root has {len} children)")]
    ChildIndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
