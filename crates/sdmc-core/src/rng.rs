//! Deterministic per-episode RNG.
//!
//! # Determinism strategy
//!
//! Every stochastic operation of an episode draws from one explicitly passed
//! `EpisodeRng`; there is no process-wide generator.  The simulator seeds it
//! from `EpisodeConfig::seed`, so a batch gives each episode its own config
//! seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Point;

/// Episode-owned deterministic RNG.
///
/// Owned by the simulator of one episode; parallel batches give each worker
/// its own episode and therefore its own RNG.
pub struct EpisodeRng(SmallRng);

impl EpisodeRng {
    pub fn new(seed: u64) -> Self {
        EpisodeRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A displacement with each component uniform in `[-scale, scale]`.
    ///
    /// Returns the origin for `scale <= 0` without consuming randomness.
    pub fn jitter(&mut self, scale: f64) -> Point {
        if !(scale > 0.0) {
            return Point::ORIGIN;
        }
        Point::new(self.gen_range(-scale..=scale), self.gen_range(-scale..=scale))
    }
}
