//! Provisio command-line runtime.
//!
//! Wires the core simulator to the outside world:
//!
//! ```text
//! provisio-cli
//!   ├─ RunConfig    (settings gathered from the command line)
//!   ├─ RuntimeEnv   (OS randomness, or a seeded stream for replay)
//!   └─ run()        (initial pass, troubleshooting pass, JSON export)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod system_env;

use std::path::PathBuf;

pub use error::CliError;
use provisio_core::{
    NetworkCredentials, ProvisioningSimulator, ProvisioningSummary, SimulatorConfig,
};
pub use system_env::{RuntimeEnv, SystemEnv};

/// Default export target.
pub const DEFAULT_LOGFILE: &str = "connection_log.json";

/// Default roster size.
pub const DEFAULT_DEVICES: u32 = 10;

/// Settings for one provisioning run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Network the devices join.
    pub credentials: NetworkCredentials,
    /// Roster size.
    pub devices: u32,
    /// Where the connection log is written.
    pub logfile: PathBuf,
    /// Simulator tunables.
    pub simulator: SimulatorConfig,
    /// Seed for a reproducible run; OS randomness when absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            credentials: NetworkCredentials::new("", ""),
            devices: DEFAULT_DEVICES,
            logfile: PathBuf::from(DEFAULT_LOGFILE),
            simulator: SimulatorConfig::default(),
            seed: None,
        }
    }
}

/// Run a full provisioning simulation and export its log.
///
/// # Errors
///
/// Returns error if:
/// - The simulator configuration is invalid (checked before any attempt)
/// - The log file cannot be written
pub fn run(config: RunConfig) -> Result<ProvisioningSummary, CliError> {
    if let Some(seed) = config.seed {
        tracing::info!("Using seed {} (rerun with --seed {} to replay)", seed, seed);
    }

    let env = RuntimeEnv::from_seed(config.seed);
    let mut simulator = ProvisioningSimulator::with_config(
        config.credentials,
        config.devices,
        env,
        config.simulator,
    )?;

    simulator.connect_devices();
    simulator.troubleshoot_failed_connections();
    simulator.export_log(&config.logfile)?;

    let summary = simulator.summary();
    tracing::info!(
        connected = summary.connected,
        failed = summary.failed,
        retried = summary.retried,
        "Provisioned {} of {} devices",
        summary.connected,
        simulator.device_count()
    );

    Ok(summary)
}
