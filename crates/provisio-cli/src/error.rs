//! CLI error types.

use provisio_core::{ConfigError, ExportError};
use thiserror::Error;

/// Errors that end a provisioning run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Rejected before the simulation started.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The simulation ran but its log could not be written.
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}
