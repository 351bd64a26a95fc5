use thiserror::Error;

/// Errors raised by inventory lookups and construction.
#[derive(Debug, Error)]
pub enum InventoryError {
  #[error("unknown device: {0}")]
  UnknownDevice(String),

  #[error("unknown pool: {0}")]
  UnknownPool(String),

  #[error("duplicate device name: {0}")]
  DuplicateDevice(String),

  #[error("duplicate pool name: {0}")]
  DuplicatePool(String),

  #[error("pool '{pool}' references unknown device '{device}'")]
  UnknownPoolMember { pool: String, device: String },
}
