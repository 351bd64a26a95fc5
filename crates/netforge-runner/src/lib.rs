//! Netforge Runner
//!
//! Service execution: resolving a service's target set, fanning the job body
//! out across targets in parallel, and aggregating per-device results into
//! one service-level report.
//!
//! The [`ServiceRunner`] owns the full lifecycle of one service run,
//! including the durable append to the service's run log. Workflow-level
//! traversal lives in `netforge-engine` and delegates every leaf job here.

mod device;
mod error;
mod service;
mod targets;

pub use device::execute_device;
pub use error::RunnerError;
pub use service::ServiceRunner;
pub use targets::resolve_targets;
