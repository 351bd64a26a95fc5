//! Inventory provider trait and the in-memory implementation.

use std::collections::BTreeMap;

use crate::device::{Device, DevicePool};
use crate::error::InventoryError;

/// Provider of devices and pool membership.
///
/// Target resolution asks the inventory for explicitly named devices and for
/// the members of each assigned pool. Unknown names are errors, not empty
/// results: a service bound to a device that no longer exists is a
/// configuration problem, and the run must fail loudly rather than silently
/// shrink its target set.
pub trait Inventory: Send + Sync {
  /// Look up a device by name.
  fn device(&self, name: &str) -> Result<Device, InventoryError>;

  /// All devices belonging to a pool.
  fn pool_devices(&self, pool: &str) -> Result<Vec<Device>, InventoryError>;
}

/// In-memory inventory built once from declarative definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
  devices: BTreeMap<String, Device>,
  pools: BTreeMap<String, DevicePool>,
}

impl StaticInventory {
  /// Build an inventory, validating name uniqueness and pool membership.
  pub fn new(
    devices: impl IntoIterator<Item = Device>,
    pools: impl IntoIterator<Item = DevicePool>,
  ) -> Result<Self, InventoryError> {
    let mut device_map = BTreeMap::new();
    for device in devices {
      if device_map.contains_key(&device.name) {
        return Err(InventoryError::DuplicateDevice(device.name));
      }
      device_map.insert(device.name.clone(), device);
    }

    let mut pool_map: BTreeMap<String, DevicePool> = BTreeMap::new();
    for pool in pools {
      if pool_map.contains_key(&pool.name) {
        return Err(InventoryError::DuplicatePool(pool.name));
      }
      for member in &pool.devices {
        if !device_map.contains_key(member) {
          return Err(InventoryError::UnknownPoolMember {
            pool: pool.name.clone(),
            device: member.clone(),
          });
        }
      }
      pool_map.insert(pool.name.clone(), pool);
    }

    Ok(Self {
      devices: device_map,
      pools: pool_map,
    })
  }

  /// Number of devices in the inventory.
  pub fn device_count(&self) -> usize {
    self.devices.len()
  }
}

impl Inventory for StaticInventory {
  fn device(&self, name: &str) -> Result<Device, InventoryError> {
    self
      .devices
      .get(name)
      .cloned()
      .ok_or_else(|| InventoryError::UnknownDevice(name.to_string()))
  }

  fn pool_devices(&self, pool: &str) -> Result<Vec<Device>, InventoryError> {
    let pool = self
      .pools
      .get(pool)
      .ok_or_else(|| InventoryError::UnknownPool(pool.to_string()))?;

    // Membership was validated at construction time.
    Ok(
      pool
        .devices
        .iter()
        .filter_map(|name| self.devices.get(name).cloned())
        .collect(),
    )
  }
}
