/*!
 * Random Sources
 * Injectable uniform draws for the instruction mix
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform draws in `[0, 1)` used to classify instructions
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// Pseudo-random source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: StdRng,
}

impl SeededSource {
    /// Reproducible sequence for a given seed
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fresh sequence seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, then keeps returning the last one.
///
/// Lets a harness force an exact compute/I/O sequence.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    last: f64,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        let draws: VecDeque<f64> = draws.into_iter().collect();
        let last = draws.back().copied().unwrap_or(0.0);
        Self { draws, last }
    }

    /// Source that always returns `value`
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.last)
    }
}
