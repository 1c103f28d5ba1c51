//! Engine configuration.
//!
//! Mirrors `native/mcts.h`'s constructor (`c_puct`, `n_playout`, `thread_pool_size`,
//! `eval_batch_size`, `compact_state_size`) and `hexwar-mcts`'s `MctsConfig` shape: a plain
//! value type with a `Default` and named presets, validated once before any thread spawns.

use crate::error::{EngineError, Result};

/// Tunables for a single-tree or batch MCTS engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// PUCT exploration constant. Larger values favor exploration via prior.
    pub c_puct: f64,
    /// Total playouts per `get_move_counts` call.
    pub n_playout: usize,
    /// Degree of parallelism: number of worker threads in the pool.
    pub thread_pool_size: usize,
    /// Maximum number of staged leaves flushed to the evaluator in one call.
    pub eval_batch_size: usize,
    /// Per-state encoded width, in scratch-buffer units, that the evaluator expects.
    pub compact_state_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            c_puct: 1.5,
            n_playout: 1600,
            thread_pool_size: 4,
            eval_batch_size: 8,
            compact_state_size: 9 * 4 * 4 + 2 * 4 + 1,
        }
    }
}

impl EngineConfig {
    /// A configuration with a single worker and a batch size of one — useful for tests that
    /// need deterministic, serially-equivalent exploration order (SPEC_FULL.md R2).
    pub fn single_threaded(n_playout: usize) -> Self {
        Self {
            n_playout,
            thread_pool_size: 1,
            eval_batch_size: 1,
            ..Default::default()
        }
    }

    /// Set the exploration constant, builder-style.
    pub fn with_c_puct(mut self, c_puct: f64) -> Self {
        self.c_puct = c_puct;
        self
    }

    /// Reject zero/negative fields before any thread is spawned.
    pub fn validate(&self) -> Result<()> {
        if !(self.c_puct > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "c_puct must be positive, got {}",
                self.c_puct
            )));
        }
        if self.n_playout == 0 {
            return Err(EngineError::InvalidConfig(
                "n_playout must be positive".into(),
            ));
        }
        if self.thread_pool_size == 0 {
            return Err(EngineError::InvalidConfig(
                "thread_pool_size must be positive".into(),
            ));
        }
        if self.eval_batch_size == 0 {
            return Err(EngineError::InvalidConfig(
                "eval_batch_size must be positive".into(),
            ));
        }
        if self.compact_state_size == 0 {
            return Err(EngineError::InvalidConfig(
                "compact_state_size must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.n_playout, 1600);
        assert_eq!(config.thread_pool_size, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_single_threaded() {
        let config = EngineConfig::single_threaded(10);
        assert_eq!(config.n_playout, 10);
        assert_eq!(config.thread_pool_size, 1);
        assert_eq!(config.eval_batch_size, 1);
    }

    #[test]
    fn test_config_rejects_zero_playout() {
        let config = EngineConfig {
            n_playout: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_nonpositive_c_puct() {
        let config = EngineConfig::default().with_c_puct(0.0);
        assert!(config.validate().is_err());
    }
}
