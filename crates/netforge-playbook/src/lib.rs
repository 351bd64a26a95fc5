//! Netforge Playbook
//!
//! Declarative definitions for an automation setup: devices, pools,
//! services with built-in action kinds, and workflows, parsed from JSON and
//! resolved into a validated [`netforge_model::JobRegistry`] plus a
//! [`netforge_inventory::StaticInventory`].
//!
//! A playbook is the configuration-file face of the engine; embedders that
//! implement [`netforge_model::Action`] directly can skip this crate
//! entirely.

mod actions;
mod def;
mod error;
mod resolve;

pub use actions::{CommandAction, HttpGetAction, PayloadAction};
pub use def::{
  ActionDef, DeviceDef, EdgeDef, PlaybookDef, PoolDef, ServiceDef, WorkflowDef,
};
pub use error::PlaybookError;
pub use resolve::resolve;
