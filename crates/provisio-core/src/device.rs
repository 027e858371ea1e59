//! Simulated devices and their connection status.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable, 1-indexed device identifier.
///
/// Rendered and serialized as `device_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(u32);

impl DeviceId {
    const PREFIX: &'static str = "device_";

    /// Identifier of the device at 1-indexed roster position `index`.
    ///
    /// Returns `None` for zero.
    pub fn new(index: u32) -> Option<Self> {
        (index > 0).then_some(Self(index))
    }

    /// Identifier for the device at 0-indexed roster position `position`.
    pub(crate) fn from_position(position: u32) -> Self {
        Self(position + 1)
    }

    /// 1-indexed roster position.
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

/// Error parsing a [`DeviceId`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid device id: {0:?}")]
pub struct ParseDeviceIdError(String);

impl FromStr for DeviceId {
    type Err = ParseDeviceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .and_then(|n| n.parse::<u32>().ok())
            .and_then(Self::new)
            .ok_or_else(|| ParseDeviceIdError(s.to_owned()))
    }
}

impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DeviceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Connection status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Not yet attempted.
    #[default]
    Disconnected,
    /// Last attempt succeeded.
    Connected,
    /// Last attempt failed.
    Failed,
}

impl ConnectionStatus {
    /// Status resulting from an attempt with the given outcome.
    pub fn from_outcome(success: bool) -> Self {
        if success { Self::Connected } else { Self::Failed }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A simulated device in the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    id: DeviceId,
    status: ConnectionStatus,
}

impl Device {
    /// New device, initially disconnected.
    pub fn new(id: DeviceId) -> Self {
        Self { id, status: ConnectionStatus::Disconnected }
    }

    /// Device identifier.
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Current connection status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_display() {
        assert_eq!(DeviceId::from_position(0).to_string(), "device_1");
        assert_eq!(DeviceId::from_position(41).to_string(), "device_42");
    }

    #[test]
    fn device_id_zero_rejected() {
        assert_eq!(DeviceId::new(0), None);
        assert!("device_0".parse::<DeviceId>().is_err());
    }

    #[test]
    fn device_id_parse() {
        assert_eq!("device_7".parse::<DeviceId>(), Ok(DeviceId(7)));
        assert!("sensor_7".parse::<DeviceId>().is_err());
        assert!("device_".parse::<DeviceId>().is_err());
        assert!("device_-1".parse::<DeviceId>().is_err());
    }

    #[test]
    fn device_id_serializes_as_string() {
        let json = serde_json::to_string(&DeviceId(3)).unwrap();
        assert_eq!(json, "\"device_3\"");

        let back: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DeviceId(3));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ConnectionStatus::Connected).unwrap(), "\"connected\"");
        assert_eq!(serde_json::to_string(&ConnectionStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn new_device_is_disconnected() {
        let device = Device::new(DeviceId(1));
        assert_eq!(device.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn status_from_outcome() {
        assert_eq!(ConnectionStatus::from_outcome(true), ConnectionStatus::Connected);
        assert_eq!(ConnectionStatus::from_outcome(false), ConnectionStatus::Failed);
    }
}
