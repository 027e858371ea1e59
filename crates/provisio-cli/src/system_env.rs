//! Production Environment implementation using OS randomness.
//!
//! This module provides `SystemEnv`, the production implementation of the
//! `Environment` trait, and `RuntimeEnv`, which lets the CLI switch to a
//! seeded stream when a run has to be reproducible.

use provisio_core::{Environment, SeededEnv};

/// Production environment drawing from the OS entropy pool.
#[derive(Clone, Debug, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).unwrap_or_else(|e| {
            // NOTE: Should never fail on supported platforms. Zeros make every
            // attempt connect, which keeps the run alive instead of panicking.
            tracing::error!("getrandom failed: {}", e);
            buffer.fill(0);
        });
    }
}

/// Environment selected at startup.
#[derive(Clone, Debug)]
pub enum RuntimeEnv {
    /// OS randomness; outcomes differ on every run.
    System(SystemEnv),
    /// Seeded stream; the same seed replays the same run.
    Seeded(SeededEnv),
}

impl RuntimeEnv {
    /// Seeded when `seed` is given, system randomness otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::Seeded(SeededEnv::with_seed(seed)),
            None => Self::System(SystemEnv::new()),
        }
    }
}

impl Environment for RuntimeEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        match self {
            Self::System(env) => env.random_bytes(buffer),
            Self::Seeded(env) => env.random_bytes(buffer),
        }
    }
}
