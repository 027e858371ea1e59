//! Deterministic test harness for the Provisio simulator.
//!
//! Provides scripted implementations of the `Environment` trait and a
//! scenario runner, so that every connection outcome in a run can be pinned
//! down and whole runs can be replayed.
//!
//! # Why Deterministic Simulation?
//!
//! A provisioning run is driven by random draws. Tests that rely on the
//! process-wide RNG can only assert statistical properties. With the harness:
//!
//! - **Forced outcomes**: `ScriptedEnv` decides each attempt up front
//! - **Replay**: the same seed produces the same log, device for device
//! - **Built-in oracle**: every scenario is checked against the run invariants

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod scenario;
mod scripted_env;

pub use scenario::{
    HarnessEnv, Oracle, Scenario, ScenarioError, ScenarioOutcome, check_invariants,
};
pub use scripted_env::ScriptedEnv;
