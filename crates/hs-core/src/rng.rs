//! Deterministic per-generator and simulation-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Every (patient, order kind) generator gets its own independent `SmallRng`
//! seeded by:
//!
//!   seed = global_seed XOR (order_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive order ids uniformly across the seed space.
//! This means:
//!
//! - Generators never share RNG state, so the draws of one patient do not
//!   depend on how many orders another patient placed.
//! - Adding patients at the end of the ward does not disturb the streams of
//!   existing ones, so runs stay reproducible under a fixed seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;

use crate::{Order, OrderId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── PatientRng ────────────────────────────────────────────────────────────────

/// RNG stream owned by one order generator.
pub struct PatientRng(SmallRng);

impl PatientRng {
    /// Seed deterministically from the run's global seed and an order stream.
    pub fn new(global_seed: u64, order: Order) -> Self {
        let OrderId(stream) = order.id();
        let seed = global_seed ^ (stream as u64).wrapping_mul(MIXING_CONSTANT);
        PatientRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Draw one value from `dist`.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: D) -> T {
        dist.sample(&mut self.0)
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for everything that is not a patient stream
/// (e.g. an in-process actuator drawing robot travel times).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: D) -> T {
        dist.sample(&mut self.0)
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
