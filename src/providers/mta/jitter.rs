//! Swappable randomness for time jitter and branch-terminus selection.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws used by the arrivals board: the forward
/// offset applied to stale reports and the choice among branch termini.
pub trait JitterSource: Send + Sync {
    /// Uniform draw in `[min, max]`.
    fn uniform(&self, min: u32, max: u32) -> u32;

    /// Uniform index into a collection of `len` elements. `len` must be > 0.
    fn pick(&self, len: usize) -> usize;
}

/// Production source backed by the thread-local RNG.
pub struct ThreadRngJitter;

impl JitterSource for ThreadRngJitter {
    fn uniform(&self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }

    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Deterministic source for tests, seeded once and stepped on every draw.
pub struct SeededJitter(Mutex<StdRng>);

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(StdRng::seed_from_u64(seed)))
    }
}

impl JitterSource for SeededJitter {
    fn uniform(&self, min: u32, max: u32) -> u32 {
        self.0.lock().expect("jitter rng lock poisoned").random_range(min..=max)
    }

    fn pick(&self, len: usize) -> usize {
        self.0.lock().expect("jitter rng lock poisoned").random_range(0..len)
    }
}
