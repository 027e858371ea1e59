//! Scenario runner for whole provisioning runs.
//!
//! A scenario builds a simulator, runs the initial and troubleshooting
//! passes, captures what happened, checks the run invariants and finally
//! hands the captured outcome to an optional oracle.
//!
//! ```rust,ignore
//! let outcome = Scenario::new()
//!     .with_devices(25)
//!     .with_seed(7)
//!     .oracle(Box::new(|outcome| {
//!         if outcome.summary.disconnected == 0 { Ok(()) } else { Err("stragglers".into()) }
//!     }))
//!     .run()?;
//! ```

use provisio_core::{
    ConfigError, ConnectionLogEntry, ConnectionStatus, Device, DeviceId, Environment,
    NetworkCredentials, ProvisioningSimulator, ProvisioningSummary, SeededEnv, SimulatorConfig,
};
use thiserror::Error;

use crate::ScriptedEnv;

/// Caller-supplied check run against a finished scenario.
pub type Oracle = Box<dyn Fn(&ScenarioOutcome) -> Result<(), String>>;

/// Errors from running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The simulator rejected the configuration.
    #[error("invalid scenario configuration: {0}")]
    Config(#[from] ConfigError),

    /// A run invariant did not hold.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    /// The caller's oracle rejected the outcome.
    #[error("oracle failed: {0}")]
    OracleFailed(String),
}

/// Everything observable about a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    /// Device statuses after the initial pass, in roster order.
    pub after_initial: Vec<ConnectionStatus>,
    /// Device statuses after troubleshooting, in roster order.
    pub final_statuses: Vec<ConnectionStatus>,
    /// Full connection log.
    pub log: Vec<ConnectionLogEntry>,
    /// Counts at the end of the run.
    pub summary: ProvisioningSummary,
}

impl ScenarioOutcome {
    /// Number of devices that failed the initial pass.
    pub fn failed_after_initial(&self) -> usize {
        self.after_initial.iter().filter(|&&s| s == ConnectionStatus::Failed).count()
    }
}

/// Where a scenario's draws come from.
#[derive(Clone, Debug)]
pub enum HarnessEnv {
    /// Seeded ChaCha stream.
    Seeded(SeededEnv),
    /// Fixed script.
    Scripted(ScriptedEnv),
}

impl Environment for HarnessEnv {
    fn random_bytes(&self, buffer: &mut [u8]) {
        match self {
            Self::Seeded(env) => env.random_bytes(buffer),
            Self::Scripted(env) => env.random_bytes(buffer),
        }
    }

    fn random_unit(&self) -> f64 {
        match self {
            Self::Seeded(env) => env.random_unit(),
            Self::Scripted(env) => env.random_unit(),
        }
    }
}

/// Builder for a single provisioning run.
pub struct Scenario {
    devices: u32,
    ssid: String,
    config: SimulatorConfig,
    env: HarnessEnv,
    oracle: Option<Oracle>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Ten devices, default success rate, seed 0.
    pub fn new() -> Self {
        Self {
            devices: 10,
            ssid: "sim-network".to_owned(),
            config: SimulatorConfig::default(),
            env: HarnessEnv::Seeded(SeededEnv::with_seed(0)),
            oracle: None,
        }
    }

    /// Roster size.
    #[must_use]
    pub fn with_devices(mut self, devices: u32) -> Self {
        self.devices = devices;
        self
    }

    /// Network name reported by the simulator.
    #[must_use]
    pub fn with_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = ssid.into();
        self
    }

    /// Per-attempt success probability.
    #[must_use]
    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.config.success_rate = success_rate;
        self
    }

    /// Draw from a ChaCha stream seeded with `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.env = HarnessEnv::Seeded(SeededEnv::with_seed(seed));
        self
    }

    /// Draw from a fixed script instead of a seeded stream.
    #[must_use]
    pub fn with_script(mut self, script: ScriptedEnv) -> Self {
        self.env = HarnessEnv::Scripted(script);
        self
    }

    /// Check to run after the built-in invariants pass.
    #[must_use]
    pub fn oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Run both passes and verify the outcome.
    pub fn run(self) -> Result<ScenarioOutcome, ScenarioError> {
        if let HarnessEnv::Seeded(env) = &self.env {
            tracing::debug!(seed = env.seed(), devices = self.devices, "running scenario");
        }

        let mut sim = ProvisioningSimulator::with_config(
            NetworkCredentials::new(self.ssid, "sim-password"),
            self.devices,
            self.env,
            self.config,
        )?;

        sim.connect_devices();
        let after_initial = statuses(sim.devices());

        sim.troubleshoot_failed_connections();

        let outcome = ScenarioOutcome {
            after_initial,
            final_statuses: statuses(sim.devices()),
            log: sim.connection_log().to_vec(),
            summary: sim.summary(),
        };

        check_invariants(&outcome).map_err(ScenarioError::InvariantViolated)?;

        if let Some(oracle) = &self.oracle {
            oracle(&outcome).map_err(ScenarioError::OracleFailed)?;
        }

        Ok(outcome)
    }
}

fn statuses(devices: &[Device]) -> Vec<ConnectionStatus> {
    devices.iter().map(Device::status).collect()
}

/// Verify the invariants every two-pass run must satisfy.
///
/// - the initial pass leaves no device disconnected and logs one non-retry
///   entry per device, in roster order
/// - connected devices are untouched by troubleshooting
/// - every device that failed the initial pass gets exactly one retry entry,
///   in roster order, whose status is the device's final status
/// - log length is devices + failures after the initial pass
pub fn check_invariants(outcome: &ScenarioOutcome) -> Result<(), String> {
    let n = outcome.after_initial.len();

    if outcome.final_statuses.len() != n {
        return Err(format!(
            "roster changed size: {n} devices before troubleshooting, {} after",
            outcome.final_statuses.len()
        ));
    }

    let expected_len = n + outcome.failed_after_initial();
    if outcome.log.len() != expected_len {
        return Err(format!("log has {} entries, expected {expected_len}", outcome.log.len()));
    }

    let (initial, retries) = outcome.log.split_at(n);

    for (position, (entry, &status)) in initial.iter().zip(&outcome.after_initial).enumerate() {
        let expected = device_id(position)?;
        if status == ConnectionStatus::Disconnected {
            return Err(format!("{expected} still disconnected after initial pass"));
        }
        if entry.device != expected || entry.status != status || entry.retry {
            return Err(format!("initial entry {position} is {entry:?}, expected {expected} {status}"));
        }
    }

    let mut retries = retries.iter();
    for (position, (&before, &after)) in
        outcome.after_initial.iter().zip(&outcome.final_statuses).enumerate()
    {
        let id = device_id(position)?;
        match before {
            ConnectionStatus::Failed => {
                let entry = retries.next().ok_or_else(|| format!("missing retry entry for {id}"))?;
                if entry.device != id || entry.status != after || !entry.retry {
                    return Err(format!("retry entry {entry:?} does not match {id} {after}"));
                }
                if after == ConnectionStatus::Disconnected {
                    return Err(format!("{id} disconnected after retry"));
                }
            },
            _ if before != after => {
                return Err(format!("{id} changed from {before} to {after} without a retry"));
            },
            _ => {},
        }
    }

    Ok(())
}

fn device_id(position: usize) -> Result<DeviceId, String> {
    u32::try_from(position + 1)
        .ok()
        .and_then(DeviceId::new)
        .ok_or_else(|| format!("roster position {position} out of range"))
}
