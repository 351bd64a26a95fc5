use netforge_inventory::InventoryError;
use netforge_model::ModelError;
use thiserror::Error;

/// Errors raised while loading a playbook.
#[derive(Debug, Error)]
pub enum PlaybookError {
  /// The playbook file is not valid JSON.
  #[error("failed to parse playbook: {0}")]
  Parse(#[from] serde_json::Error),

  /// The inventory section is inconsistent.
  #[error(transparent)]
  Inventory(#[from] InventoryError),

  /// The job section is inconsistent.
  #[error(transparent)]
  Model(#[from] ModelError),
}
