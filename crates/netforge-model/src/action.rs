//! The pluggable job body.

use async_trait::async_trait;
use netforge_inventory::Device;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome returned by a job body.
///
/// A body reports success or failure through the `success` flag; `result`
/// carries whatever payload the body produced. A body may also fail by
/// returning `Err`, which executors convert to a failed outcome carrying the
/// error description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
  pub success: bool,
  pub result: Value,
}

impl ActionOutcome {
  pub fn success(result: Value) -> Self {
    Self {
      success: true,
      result,
    }
  }

  pub fn failure(result: Value) -> Self {
    Self {
      success: false,
      result,
    }
  }
}

/// A service's executable action.
///
/// For a targeted service the runner invokes the action once per resolved
/// device with `Some(device)`; for an untargeted service exactly once with
/// `None`. `context` is the accumulated run payload (the fold of prior jobs'
/// reports when running inside a workflow).
#[async_trait]
pub trait Action: Send + Sync {
  async fn run(&self, device: Option<&Device>, context: &Value) -> anyhow::Result<ActionOutcome>;
}

/// Plain functions and closures are actions.
#[async_trait]
impl<F> Action for F
where
  F: Fn(Option<&Device>, &Value) -> anyhow::Result<ActionOutcome> + Send + Sync,
{
  async fn run(&self, device: Option<&Device>, context: &Value) -> anyhow::Result<ActionOutcome> {
    self(device, context)
  }
}
