//! Atomic floating-point accumulation.
//!
//! `AtomicU64` has no atomic add for the `f64` it bit-represents, so `W` is accumulated via
//! a compare-exchange retry loop — the direct translation of `native/threading.hpp`'s
//! `atomic_add<T>` template, which exists there for exactly the same reason (no hardware
//! atomic add for floating point).

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomically add `delta` to the `f64` stored (as its bit pattern) in `cell`, returning the
/// previous value.
pub fn atomic_add_f64(cell: &AtomicU64, delta: f64) -> f64 {
    let mut current = cell.load(Ordering::Relaxed);
    loop {
        let current_val = f64::from_bits(current);
        let new_val = current_val + delta;
        match cell.compare_exchange_weak(
            current,
            new_val.to_bits(),
            Ordering::AcqRel,
            Ordering::Relaxed,
        ) {
            Ok(_) => return current_val,
            Err(observed) => current = observed,
        }
    }
}

/// Load the `f64` currently stored in `cell`.
pub fn atomic_load_f64(cell: &AtomicU64) -> f64 {
    f64::from_bits(cell.load(Ordering::Acquire))
}

/// Construct a fresh atomic cell holding `value`.
pub fn new_atomic_f64(value: f64) -> AtomicU64 {
    AtomicU64::new(value.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_load() {
        let cell = new_atomic_f64(0.0);
        atomic_add_f64(&cell, 1.5);
        atomic_add_f64(&cell, -0.5);
        assert!((atomic_load_f64(&cell) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_concurrent_adds_sum_correctly() {
        use std::sync::Arc;
        let cell = Arc::new(new_atomic_f64(0.0));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cell = Arc::clone(&cell);
                scope.spawn(move || {
                    for _ in 0..1000 {
                        atomic_add_f64(&cell, 1.0);
                    }
                });
            }
        });
        assert!((atomic_load_f64(&cell) - 8000.0).abs() < 1e-6);
    }
}
