//! Leaf jobs.

use std::fmt;
use std::sync::Arc;

use crate::action::Action;

/// A leaf job: one executable action, optionally fanned out per device.
///
/// When `has_targets` is true the runner resolves the union of `devices` and
/// all `pools` members and executes the action once per device, in parallel.
/// When false the action runs exactly once with no device argument and the
/// target bindings are ignored.
#[derive(Clone)]
pub struct Service {
  /// Unique job name.
  pub name: String,
  pub description: String,
  /// Delay in seconds applied after completion before workflow successors
  /// may proceed.
  pub waiting_time: u64,
  pub has_targets: bool,
  /// Explicitly assigned device names.
  pub devices: Vec<String>,
  /// Assigned pool names; pool membership is resolved at run time.
  pub pools: Vec<String>,
  /// The job body.
  pub action: Arc<dyn Action>,
}

impl Service {
  /// Create an untargeted service with no bindings.
  pub fn new(name: impl Into<String>, action: Arc<dyn Action>) -> Self {
    Self {
      name: name.into(),
      description: String::new(),
      waiting_time: 0,
      has_targets: false,
      devices: Vec::new(),
      pools: Vec::new(),
      action,
    }
  }

  /// Mark the service as targeted, binding devices and pools.
  pub fn with_targets(mut self, devices: Vec<String>, pools: Vec<String>) -> Self {
    self.has_targets = true;
    self.devices = devices;
    self.pools = pools;
    self
  }
}

impl fmt::Debug for Service {
  // The action is an opaque trait object.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Service")
      .field("name", &self.name)
      .field("description", &self.description)
      .field("waiting_time", &self.waiting_time)
      .field("has_targets", &self.has_targets)
      .field("devices", &self.devices)
      .field("pools", &self.pools)
      .finish_non_exhaustive()
  }
}
