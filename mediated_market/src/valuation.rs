//! Injected sources of uniform random values
//!
//! The core never touches a global RNG. Generation and sampling draw from a
//! `ValuationSource`, so each trial can be seeded on its own and tests can
//! replay exact draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies uniform values on the closed interval `[min, max]`
pub trait ValuationSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// `StdRng`-backed source
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        SeededSource {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ValuationSource for SeededSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        self.rng.random_range(min..=max)
    }
}

/// Replays a fixed sequence of unit-interval draws, cycling when exhausted
///
/// Each stored value `u` in `[0, 1]` becomes `min + u * (max - min)`, so the
/// same script works for valuations and for Bernoulli picks.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f64>) -> Self {
        ScriptedSource { draws, next: 0 }
    }

    /// Number of draws consumed so far
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl ValuationSource for ScriptedSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if self.draws.is_empty() {
            return min;
        }
        let u = self.draws[self.next % self.draws.len()];
        self.next += 1;
        min + u * (max - min)
    }
}
