//! Netforge Inventory
//!
//! This crate provides the device inventory consumed by target resolution:
//! the [`Device`] and [`DevicePool`] records, the [`Inventory`] provider
//! trait, and [`StaticInventory`], an in-memory implementation built from
//! declarative definitions.
//!
//! The inventory is read-only from the engine's point of view: target
//! resolution is a pure function of the inventory state at the time a
//! service runs.

mod device;
mod error;
mod inventory;

pub use device::{Device, DevicePool};
pub use error::InventoryError;
pub use inventory::{Inventory, StaticInventory};
