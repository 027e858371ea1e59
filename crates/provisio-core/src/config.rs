//! Simulator configuration.

use std::fmt;

use crate::error::ConfigError;

/// Probability that a single connection attempt succeeds.
pub const DEFAULT_SUCCESS_RATE: f64 = 0.8;

/// Tunables for a provisioning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Probability in `[0, 1]` that a connection attempt succeeds.
    pub success_rate: f64,
}

impl SimulatorConfig {
    /// Check that the configuration describes a valid run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.success_rate) {
            Ok(())
        } else {
            Err(ConfigError::InvalidSuccessRate { rate: self.success_rate })
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self { success_rate: DEFAULT_SUCCESS_RATE }
    }
}

/// Network the devices are provisioned onto.
///
/// The password is carried but never validated, and is redacted from `Debug`
/// output so it cannot leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct NetworkCredentials {
    ssid: String,
    password: String,
}

impl NetworkCredentials {
    /// Credentials for the network named `ssid`.
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self { ssid: ssid.into(), password: password.into() }
    }

    /// Network name.
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Network password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for NetworkCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}
