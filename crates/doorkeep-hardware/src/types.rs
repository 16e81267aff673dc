//! Common types shared across hardware device implementations.

use serde::{Deserialize, Serialize};

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model and the
/// channel it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "Door Controller", "Mock Badge Reader").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Channel the device is attached to (e.g., "/dev/ttyACM0").
    pub channel: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            channel: None,
        }
    }

    /// Set the channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new("Door Controller", "Serial").with_channel("/dev/ttyUSB0");

        assert_eq!(info.name, "Door Controller");
        assert_eq!(info.channel.as_deref(), Some("/dev/ttyUSB0"));
    }

    #[test]
    fn test_device_info_serialization() {
        let info = DeviceInfo::new("Mock Link", "Mock Link v1.0");
        let json = serde_json::to_string(&info).unwrap();
        let back: DeviceInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
    }
}
