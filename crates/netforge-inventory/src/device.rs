//! Device and pool records.

use serde::{Deserialize, Serialize};

/// A network device that services can target.
///
/// Devices are ordered and deduplicated by name: a target set is a
/// `BTreeSet<Device>` and the name is the identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Device {
  /// Unique device name.
  pub name: String,
  /// Management address (IP or hostname).
  pub address: String,
  /// Management port.
  pub port: u16,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub vendor: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub operating_system: Option<String>,
}

impl Device {
  /// Create a device with the default management port.
  pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      address: address.into(),
      port: 22,
      vendor: None,
      operating_system: None,
    }
  }
}

/// A named group of devices.
///
/// Pools reference devices by name; membership is resolved against the
/// owning inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePool {
  pub name: String,
  pub devices: Vec<String>,
}
