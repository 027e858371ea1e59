//! Provisioning simulator.
//!
//! The simulator owns the device roster and the connection log. A run is two
//! sequential passes:
//!
//! ```text
//! new()  ──►  connect_devices()  ──►  troubleshoot_failed_connections()  ──►  export_log()
//!             every device,           every device still Failed,
//!             one attempt each        one retry each
//! ```
//!
//! Neither pass is idempotent. Calling `connect_devices` twice re-attempts
//! every device, including connected ones, and appends a second round of
//! entries.

use std::path::Path;

use crate::{
    config::{NetworkCredentials, SimulatorConfig},
    device::{ConnectionStatus, Device, DeviceId},
    env::Environment,
    error::{ConfigError, ExportError},
    log::{self, ConnectionLogEntry},
};

/// Device counts at a point in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisioningSummary {
    /// Devices currently connected.
    pub connected: usize,
    /// Devices currently failed.
    pub failed: usize,
    /// Devices never attempted.
    pub disconnected: usize,
    /// Log entries produced by the troubleshooting pass.
    pub retried: usize,
    /// Total log entries.
    pub log_entries: usize,
}

/// Simulates provisioning a fleet of devices onto one Wi-Fi network.
///
/// Generic over the [`Environment`] that supplies randomness, so tests can
/// pin every outcome.
#[derive(Debug)]
pub struct ProvisioningSimulator<E: Environment> {
    credentials: NetworkCredentials,
    config: SimulatorConfig,
    env: E,
    devices: Vec<Device>,
    log: Vec<ConnectionLogEntry>,
}

impl<E: Environment> ProvisioningSimulator<E> {
    /// Create a simulator with the default configuration.
    ///
    /// The roster holds `device_count` disconnected devices named
    /// `device_1..=device_<device_count>`; zero gives an empty roster.
    pub fn new(credentials: NetworkCredentials, device_count: u32, env: E) -> Self {
        let devices =
            (0..device_count).map(|position| Device::new(DeviceId::from_position(position))).collect();

        Self { credentials, config: SimulatorConfig::default(), env, devices, log: Vec::new() }
    }

    /// Create a simulator with an explicit configuration.
    pub fn with_config(
        credentials: NetworkCredentials,
        device_count: u32,
        env: E,
        config: SimulatorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut simulator = Self::new(credentials, device_count, env);
        simulator.config = config;
        Ok(simulator)
    }

    /// Network name devices are provisioned onto.
    pub fn ssid(&self) -> &str {
        self.credentials.ssid()
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Roster in creation order.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of devices in the roster.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Every attempt so far, in chronological order.
    pub fn connection_log(&self) -> &[ConnectionLogEntry] {
        &self.log
    }

    /// Single connection trial.
    ///
    /// Succeeds when one draw from the environment falls below the configured
    /// success rate. A rate of 1.0 always succeeds and 0.0 always fails.
    pub fn attempt_connection(&self) -> bool {
        self.env.random_unit() < self.config.success_rate
    }

    /// Attempt every device once, in roster order.
    pub fn connect_devices(&mut self) {
        tracing::info!(
            "Connecting {} devices to SSID '{}'",
            self.devices.len(),
            self.credentials.ssid()
        );

        for i in 0..self.devices.len() {
            let status = ConnectionStatus::from_outcome(self.attempt_connection());
            let device = &mut self.devices[i];
            device.set_status(status);
            tracing::debug!(device = %device.id(), %status, "connection attempt");
            self.log.push(ConnectionLogEntry::initial(device.id(), status));
        }

        tracing::info!("Connection attempt complete");
    }

    /// Retry each failed device exactly once, in roster order.
    ///
    /// Connected and never-attempted devices are left alone.
    pub fn troubleshoot_failed_connections(&mut self) {
        tracing::info!("Retrying failed connections");

        for i in 0..self.devices.len() {
            if self.devices[i].status() != ConnectionStatus::Failed {
                continue;
            }

            let status = ConnectionStatus::from_outcome(self.attempt_connection());
            let device = &mut self.devices[i];
            device.set_status(status);
            tracing::debug!(device = %device.id(), %status, retry = true, "connection attempt");
            self.log.push(ConnectionLogEntry::retry(device.id(), status));
        }

        tracing::info!("Troubleshooting complete");
    }

    /// Write the connection log to `path` as JSON, replacing any existing file.
    pub fn export_log(&self, path: &Path) -> Result<(), ExportError> {
        log::export_to_path(&self.log, path)
    }

    /// Current device and log counts.
    pub fn summary(&self) -> ProvisioningSummary {
        let mut summary = ProvisioningSummary { log_entries: self.log.len(), ..Default::default() };

        for device in &self.devices {
            match device.status() {
                ConnectionStatus::Connected => summary.connected += 1,
                ConnectionStatus::Failed => summary.failed += 1,
                ConnectionStatus::Disconnected => summary.disconnected += 1,
            }
        }
        summary.retried = self.log.iter().filter(|entry| entry.retry).count();

        summary
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::env::SeededEnv;

    /// Replays a fixed outcome pattern, cycling when exhausted.
    #[derive(Clone)]
    struct PatternEnv {
        outcomes: Arc<Vec<bool>>,
        cursor: Arc<AtomicUsize>,
    }

    impl PatternEnv {
        fn new(outcomes: &[bool]) -> Self {
            Self { outcomes: Arc::new(outcomes.to_vec()), cursor: Arc::new(AtomicUsize::new(0)) }
        }
    }

    impl Environment for PatternEnv {
        fn random_bytes(&self, buffer: &mut [u8]) {
            let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.outcomes.len();
            // 0x00.. draws 0.0 (success), 0xff.. draws just under 1.0 (failure)
            buffer.fill(if self.outcomes[i] { 0x00 } else { 0xff });
        }
    }

    fn simulator(devices: u32, env: PatternEnv) -> ProvisioningSimulator<PatternEnv> {
        ProvisioningSimulator::new(NetworkCredentials::new("HomeNet", "secret"), devices, env)
    }

    fn statuses<E: Environment>(sim: &ProvisioningSimulator<E>) -> Vec<ConnectionStatus> {
        sim.devices().iter().map(Device::status).collect()
    }

    #[test]
    fn new_roster_is_sequential_and_disconnected() {
        let sim = simulator(3, PatternEnv::new(&[true]));

        let ids: Vec<String> = sim.devices().iter().map(|d| d.id().to_string()).collect();
        assert_eq!(ids, ["device_1", "device_2", "device_3"]);
        assert!(sim.devices().iter().all(|d| d.status() == ConnectionStatus::Disconnected));
        assert!(sim.connection_log().is_empty());
        assert_eq!(sim.ssid(), "HomeNet");
    }

    #[test]
    fn initial_pass_records_each_device_in_order() {
        let mut sim = simulator(4, PatternEnv::new(&[true, false, true, false]));

        sim.connect_devices();

        assert_eq!(
            statuses(&sim),
            [
                ConnectionStatus::Connected,
                ConnectionStatus::Failed,
                ConnectionStatus::Connected,
                ConnectionStatus::Failed
            ]
        );
        let log = sim.connection_log();
        assert_eq!(log.len(), 4);
        for (entry, device) in log.iter().zip(sim.devices()) {
            assert_eq!(entry.device, device.id());
            assert_eq!(entry.status, device.status());
            assert!(!entry.retry);
        }
    }

    #[test]
    fn troubleshooting_only_retries_failed_devices() {
        // Initial: S F F S, retries: S F
        let mut sim = simulator(4, PatternEnv::new(&[true, false, false, true, true, false]));

        sim.connect_devices();
        sim.troubleshoot_failed_connections();

        assert_eq!(
            statuses(&sim),
            [
                ConnectionStatus::Connected,
                ConnectionStatus::Connected,
                ConnectionStatus::Failed,
                ConnectionStatus::Connected
            ]
        );

        let retries: Vec<_> = sim.connection_log().iter().filter(|e| e.retry).collect();
        assert_eq!(retries.len(), 2);
        assert_eq!(retries[0].device.to_string(), "device_2");
        assert_eq!(retries[0].status, ConnectionStatus::Connected);
        assert_eq!(retries[1].device.to_string(), "device_3");
        assert_eq!(retries[1].status, ConnectionStatus::Failed);
    }

    #[test]
    fn troubleshooting_before_connect_is_a_no_op() {
        let mut sim = simulator(3, PatternEnv::new(&[false]));

        sim.troubleshoot_failed_connections();

        assert!(sim.connection_log().is_empty());
        assert!(sim.devices().iter().all(|d| d.status() == ConnectionStatus::Disconnected));
    }

    #[test]
    fn second_initial_pass_reattempts_everything() {
        let mut sim = simulator(2, PatternEnv::new(&[true, true, false, false]));

        sim.connect_devices();
        sim.connect_devices();

        assert_eq!(sim.connection_log().len(), 4);
        assert_eq!(statuses(&sim), [ConnectionStatus::Failed, ConnectionStatus::Failed]);
    }

    #[test]
    fn empty_roster() {
        let mut sim = simulator(0, PatternEnv::new(&[true]));

        sim.connect_devices();
        sim.troubleshoot_failed_connections();

        assert_eq!(sim.device_count(), 0);
        assert!(sim.connection_log().is_empty());
        assert_eq!(sim.summary(), ProvisioningSummary::default());
    }

    #[test]
    fn forced_rates() {
        let creds = NetworkCredentials::new("HomeNet", "secret");

        let mut always = ProvisioningSimulator::with_config(
            creds.clone(),
            5,
            SeededEnv::with_seed(1),
            SimulatorConfig { success_rate: 1.0 },
        )
        .unwrap();
        always.connect_devices();
        always.troubleshoot_failed_connections();
        assert_eq!(always.summary().connected, 5);
        assert_eq!(always.connection_log().len(), 5);

        let mut never = ProvisioningSimulator::with_config(
            creds,
            5,
            SeededEnv::with_seed(1),
            SimulatorConfig { success_rate: 0.0 },
        )
        .unwrap();
        never.connect_devices();
        never.troubleshoot_failed_connections();
        assert_eq!(never.summary().failed, 5);
        assert_eq!(never.summary().retried, 5);
        assert_eq!(never.connection_log().len(), 10);
    }

    #[test]
    fn invalid_config_rejected() {
        let result = ProvisioningSimulator::with_config(
            NetworkCredentials::new("HomeNet", "secret"),
            1,
            SeededEnv::with_seed(1),
            SimulatorConfig { success_rate: 2.0 },
        );
        assert!(matches!(result, Err(ConfigError::InvalidSuccessRate { .. })));
    }

    #[test]
    fn summary_counts() {
        // Initial: F F S, retries: S F
        let mut sim = simulator(3, PatternEnv::new(&[false, false, true, true, false]));

        sim.connect_devices();
        sim.troubleshoot_failed_connections();

        assert_eq!(
            sim.summary(),
            ProvisioningSummary {
                connected: 2,
                failed: 1,
                disconnected: 0,
                retried: 2,
                log_entries: 5
            }
        );
    }

    #[test]
    fn export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connection_log.json");
        let mut sim = simulator(3, PatternEnv::new(&[false, true, false, true, true]));

        sim.connect_devices();
        sim.troubleshoot_failed_connections();
        sim.export_log(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        let parsed = log::read_log(&json).unwrap();
        assert_eq!(parsed, sim.connection_log());
    }
}
