//! Target set resolution.

use std::collections::BTreeSet;

use netforge_inventory::{Device, Inventory};
use netforge_model::Service;

use crate::error::RunnerError;

/// Compute the concrete target set of a service.
///
/// The union of the service's explicitly assigned devices and every device
/// belonging to any of its assigned pools, deduplicated by device name.
/// Pure given the current inventory state; an empty set is a valid result.
/// Unknown device or pool names are fatal configuration errors and
/// propagate to the caller.
pub fn resolve_targets(
  service: &Service,
  inventory: &dyn Inventory,
) -> Result<BTreeSet<Device>, RunnerError> {
  let mut targets = BTreeSet::new();

  for name in &service.devices {
    let device = inventory
      .device(name)
      .map_err(|source| RunnerError::TargetResolution {
        service: service.name.clone(),
        source,
      })?;
    targets.insert(device);
  }

  for pool in &service.pools {
    let members = inventory
      .pool_devices(pool)
      .map_err(|source| RunnerError::TargetResolution {
        service: service.name.clone(),
        source,
      })?;
    targets.extend(members);
  }

  Ok(targets)
}
