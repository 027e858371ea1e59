//! Provisio binary.
//!
//! # Usage
//!
//! ```bash
//! # Provision ten devices, log to connection_log.json
//! provisio --ssid HomeNet --password hunter2
//!
//! # Larger fleet, custom log file, reproducible outcomes
//! provisio --ssid HomeNet --password hunter2 --devices 250 --logfile run.json --seed 42
//! ```

use std::path::PathBuf;

use clap::Parser;
use provisio_cli::{DEFAULT_DEVICES, DEFAULT_LOGFILE, RunConfig};
use provisio_core::{DEFAULT_SUCCESS_RATE, NetworkCredentials, SimulatorConfig};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// IoT device provisioning simulator
#[derive(Parser, Debug)]
#[command(name = "provisio")]
#[command(about = "IoT Device Provisioning Simulator")]
#[command(version)]
struct Args {
    /// Wi-Fi SSID
    #[arg(long)]
    ssid: String,

    /// Wi-Fi password
    #[arg(long)]
    password: String,

    /// Number of IoT devices to simulate
    #[arg(long, default_value_t = DEFAULT_DEVICES)]
    devices: u32,

    /// Output log file name
    #[arg(long, default_value = DEFAULT_LOGFILE)]
    logfile: PathBuf,

    /// Probability that a single connection attempt succeeds
    #[arg(long, default_value_t = DEFAULT_SUCCESS_RATE)]
    success_rate: f64,

    /// Seed for reproducible outcomes
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_run_config(self) -> RunConfig {
        RunConfig {
            credentials: NetworkCredentials::new(self.ssid, self.password),
            devices: self.devices,
            logfile: self.logfile,
            simulator: SimulatorConfig { success_rate: self.success_rate },
            seed: self.seed,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    provisio_cli::run(args.into_run_config())?;

    Ok(())
}
