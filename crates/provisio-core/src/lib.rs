//! Core logic for the Provisio IoT provisioning simulator.
//!
//! Models a fleet of devices joining a Wi-Fi network. Each device makes a
//! probabilistic connection attempt, devices that fail are retried once, and
//! every attempt is recorded in an append-only log that can be exported as
//! JSON.
//!
//! ## Architecture
//!
//! ```text
//! provisio-core
//!   ├─ Environment           (injected randomness: seeded, system, scripted)
//!   ├─ ProvisioningSimulator (roster + log owner, initial and retry passes)
//!   ├─ Device / DeviceId     (roster records)
//!   └─ ConnectionLogEntry    (log records, JSON export)
//! ```
//!
//! No networking takes place; a "connection attempt" is a single draw from
//! the environment compared against the configured success rate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod env;
pub mod error;
pub mod log;
mod simulator;

pub use config::{DEFAULT_SUCCESS_RATE, NetworkCredentials, SimulatorConfig};
pub use device::{ConnectionStatus, Device, DeviceId, ParseDeviceIdError};
pub use env::{Environment, SeededEnv};
pub use error::{ConfigError, ExportError};
pub use log::{ConnectionLogEntry, export_to_path, read_log, write_log};
pub use simulator::{ProvisioningSimulator, ProvisioningSummary};
