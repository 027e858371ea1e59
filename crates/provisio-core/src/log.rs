//! Connection log entries and JSON export.
//!
//! The exported file is a 4-space indented JSON array:
//!
//! ```text
//! [
//!     {
//!         "device": "device_1",
//!         "status": "failed"
//!     },
//!     {
//!         "device": "device_1",
//!         "status": "connected",
//!         "retry": true
//!     }
//! ]
//! ```

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::{
    device::{ConnectionStatus, DeviceId},
    error::ExportError,
};

/// Indentation used by the exported log.
const INDENT: &[u8] = b"    ";

/// One recorded connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionLogEntry {
    /// Device the attempt was made for.
    pub device: DeviceId,
    /// Outcome of the attempt.
    pub status: ConnectionStatus,
    /// Set only for attempts made by the troubleshooting pass.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retry: bool,
}

impl ConnectionLogEntry {
    /// Entry for an initial-pass attempt.
    pub fn initial(device: DeviceId, status: ConnectionStatus) -> Self {
        Self { device, status, retry: false }
    }

    /// Entry for a troubleshooting-pass attempt.
    pub fn retry(device: DeviceId, status: ConnectionStatus) -> Self {
        Self { device, status, retry: true }
    }
}

/// Serialize `entries` into `writer` in the export format.
pub fn write_log<W: Write>(entries: &[ConnectionLogEntry], writer: W) -> Result<(), ExportError> {
    let mut serializer =
        serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(INDENT));
    entries.serialize(&mut serializer)?;
    Ok(())
}

/// Write `entries` to `path`, replacing any existing file.
pub fn export_to_path(entries: &[ConnectionLogEntry], path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_log(entries, &mut writer)?;
    writer.flush().map_err(io_err)?;

    tracing::info!("Connection log exported to {}", path.display());
    Ok(())
}

/// Parse a previously exported log.
pub fn read_log(json: &str) -> Result<Vec<ConnectionLogEntry>, ExportError> {
    Ok(serde_json::from_str(json)?)
}
