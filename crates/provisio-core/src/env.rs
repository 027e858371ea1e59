//! Environment abstraction for deterministic testing.
//!
//! The `Environment` trait decouples the simulator from the process-wide
//! random source. Every connection attempt draws from the environment it was
//! constructed with, which enables:
//!
//! - Deterministic Simulation: a seeded or scripted environment makes a whole
//!   provisioning run reproducible, including which devices fail.
//!
//! - Production Runtime: the CLI plugs in OS entropy without any change to
//!   the simulator.
//!
//! # Invariants
//!
//! - Determinism: Given the same seed, `random_bytes()` produces the same
//!   sequence
//! - Range: `random_unit()` always returns a value in `[0, 1)`
//! - Isolation: Implementations must not share global state

use std::sync::{Arc, Mutex, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Abstract environment providing randomness.
///
/// Only the byte source is required; the numeric helpers are derived from it
/// so that every implementation produces identical draws for identical bytes.
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    ///
    /// # Invariants
    ///
    /// - Determinism during simulations: Given the same RNG seed, this produces
    ///   the same sequence of bytes
    /// - Independence: Successive calls are uncorrelated
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a uniform value in `[0, 1)`.
    ///
    /// Uses the top 53 bits of a `u64` so every result is exactly
    /// representable as an `f64`.
    #[allow(clippy::cast_precision_loss)]
    fn random_unit(&self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.random_u64() >> 11) as f64 * SCALE
    }
}

/// Reproducible environment backed by a seeded ChaCha stream.
///
/// Clones share the same stream, so a simulator and the code that built it
/// observe a single sequence of draws.
#[derive(Clone, Debug)]
pub struct SeededEnv {
    seed: u64,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl SeededEnv {
    /// Create an environment whose draws are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, rng: Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))) }
    }

    /// The seed this environment was created with.
    ///
    /// Log it: it is all that is needed to replay a run.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Environment for SeededEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        // A poisoned lock still holds a valid RNG state.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.fill_bytes(buffer);
    }
}
