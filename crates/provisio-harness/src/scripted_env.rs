//! Environment that replays a fixed script of draws.
//!
//! Each connection attempt consumes exactly one draw, so a script of outcomes
//! maps one-to-one onto attempts in the order the simulator makes them. The
//! script cycles once exhausted; a single-element script therefore forces
//! every attempt the same way.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use provisio_core::Environment;

/// Draw that succeeds for every success rate above zero.
const SUCCESS_DRAW: f64 = 0.0;

/// Largest draw below 1.0; fails for every success rate below one.
const FAILURE_DRAW: f64 = 1.0 - f64::EPSILON / 2.0;

/// Scripted, shareable source of draws.
///
/// Clones share the cursor, matching how a seeded environment shares its
/// stream.
#[derive(Clone, Debug)]
pub struct ScriptedEnv {
    draws: Arc<Vec<f64>>,
    cursor: Arc<AtomicUsize>,
}

impl ScriptedEnv {
    /// Replay raw draws in `[0, 1)`.
    ///
    /// Values outside that range are clamped into it. An empty script behaves
    /// like [`ScriptedEnv::always_succeed`].
    pub fn from_draws(draws: impl IntoIterator<Item = f64>) -> Self {
        let mut draws: Vec<f64> = draws.into_iter().map(|d| d.clamp(0.0, FAILURE_DRAW)).collect();
        if draws.is_empty() {
            draws.push(SUCCESS_DRAW);
        }
        Self { draws: Arc::new(draws), cursor: Arc::new(AtomicUsize::new(0)) }
    }

    /// Replay attempt outcomes: `true` connects, `false` fails.
    ///
    /// Holds for any success rate strictly between 0 and 1.
    pub fn from_outcomes(outcomes: &[bool]) -> Self {
        Self::from_draws(
            outcomes.iter().map(|&success| if success { SUCCESS_DRAW } else { FAILURE_DRAW }),
        )
    }

    /// Every attempt connects.
    pub fn always_succeed() -> Self {
        Self::from_outcomes(&[true])
    }

    /// Every attempt fails.
    pub fn always_fail() -> Self {
        Self::from_outcomes(&[false])
    }

    /// Number of draws consumed so far, across all clones.
    pub fn draws_taken(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    fn next_draw(&self) -> f64 {
        let i = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.draws[i % self.draws.len()]
    }
}

impl Environment for ScriptedEnv {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn random_bytes(&self, buffer: &mut [u8]) {
        // Encode the draw so the default `random_unit` decodes it back.
        let bits = ((self.next_draw() * (1u64 << 53) as f64) as u64) << 11;
        for (dst, src) in buffer.iter_mut().zip(bits.to_be_bytes().iter().cycle()) {
            *dst = *src;
        }
    }

    fn random_unit(&self) -> f64 {
        self.next_draw()
    }
}
