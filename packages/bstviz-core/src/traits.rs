use std::ops::RangeInclusive;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ids::Value;

/// Pluggable randomness for random populate, so tests can script or seed the draws.
pub trait ValueSource {
    /// Draw a batch size from `range`.
    fn draw_count(&mut self, range: RangeInclusive<usize>) -> usize;
    /// Draw a candidate value from `range`.
    fn draw_value(&mut self, range: RangeInclusive<Value>) -> Value;
}

/// Uniform draws from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<ChaCha8Rng> {
    /// Reproducible source: the same seed yields the same draws on every platform.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> ValueSource for RngSource<R> {
    fn draw_count(&mut self, range: RangeInclusive<usize>) -> usize {
        self.rng.gen_range(range)
    }

    fn draw_value(&mut self, range: RangeInclusive<Value>) -> Value {
        self.rng.gen_range(range)
    }
}
