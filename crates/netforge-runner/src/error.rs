//! Service execution errors.

use netforge_inventory::InventoryError;
use thiserror::Error;

/// Errors that abort a service run.
///
/// Per-device failures are never errors: they are recovered into the
/// service's report. What remains is configuration trouble (the target set
/// cannot be resolved) and persistence trouble (the run log append failed),
/// both fatal to the run.
#[derive(Debug, Error)]
pub enum RunnerError {
  /// The service's device or pool bindings do not resolve.
  #[error("target resolution failed for service '{service}': {source}")]
  TargetResolution {
    service: String,
    #[source]
    source: InventoryError,
  },

  /// The run log append failed; the run cannot be considered complete.
  #[error("failed to record run for job '{job}': {source}")]
  LogCommit {
    job: String,
    #[source]
    source: netforge_store::Error,
  },
}
