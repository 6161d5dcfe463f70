//! Seeded random source for track generation
//!
//! Hazard placement must replay identically for the same seed, so the track
//! never touches thread-local or OS randomness.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Deterministic RNG that remembers its seed for snapshots and restarts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRng {
    seed: u64,
    #[serde(skip, default = "SpawnRng::unseeded")]
    rng: Pcg32,
}

impl SpawnRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn unseeded() -> Pcg32 {
        Pcg32::seed_from_u64(0)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform value in `[0, 1)`
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform value in `[min, max]`; returns `min` for an empty range
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}

/// Derive the seed for run `generation` from a base seed (splitmix64 finalizer)
pub fn run_seed(base: u64, generation: u32) -> u64 {
    let mut z = base.wrapping_add((generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
