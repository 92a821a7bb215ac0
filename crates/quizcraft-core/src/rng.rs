//! Random number generator abstraction.
//!
//! Production code wraps a real RNG in [`SystemRng`]. Tests inject a seeded
//! or scripted implementation so shuffles are reproducible. Any
//! [`DeterministicRng`] is a full [`RngCore`], so callers shuffle and sample
//! with `rand::seq` directly.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Source of randomness shared by the game engine.
pub trait DeterministicRng: RngCore + Send + Sync {}

impl<R: RngCore + Send + Sync> DeterministicRng for R {}

/// Entropy-seeded RNG for production use.
#[derive(Debug, Clone)]
pub struct SystemRng(StdRng);

impl SystemRng {
    /// Seeds a new generator from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// Seeds a new generator from a fixed value.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RngCore for SystemRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.0.fill_bytes(dst);
    }
}
