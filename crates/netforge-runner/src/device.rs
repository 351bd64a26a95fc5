//! Per-device execution.

use netforge_inventory::Device;
use netforge_model::{Action, DeviceReport};
use serde_json::Value;
use tracing::warn;

/// Execute a service's action against one target device.
///
/// Any failure the body raises, including connection and resource errors, is
/// recovered here and normalized into a failed [`DeviceReport`] carrying the
/// error chain as its result. A device failure must never escape and abort
/// sibling executions.
pub async fn execute_device(action: &dyn Action, device: &Device, context: &Value) -> DeviceReport {
  match action.run(Some(device), context).await {
    Ok(outcome) => DeviceReport {
      success: outcome.success,
      result: outcome.result,
    },
    Err(error) => {
      warn!(device = %device.name, error = %error, "device action failed");
      DeviceReport {
        success: false,
        result: Value::String(format!("{error:#}")),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use anyhow::Context;
  use netforge_model::ActionOutcome;
  use serde_json::json;

  use super::*;

  fn echo_name(device: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    Ok(ActionOutcome::success(json!(device.unwrap().name)))
  }

  fn refuse(_: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    Err(anyhow::anyhow!("connection refused")).context("ssh session failed")
  }

  #[tokio::test]
  async fn passes_the_device_to_the_action() {
    let device = Device::new("r1", "10.0.0.1");
    let report = execute_device(&echo_name, &device, &Value::Null).await;
    assert!(report.success);
    assert_eq!(report.result, json!("r1"));
  }

  #[tokio::test]
  async fn recovers_action_errors_with_a_description() {
    let device = Device::new("r1", "10.0.0.1");
    let report = execute_device(&refuse, &device, &Value::Null).await;
    assert!(!report.success);
    let description = report.result.as_str().unwrap();
    assert!(description.contains("ssh session failed"));
    assert!(description.contains("connection refused"));
  }
}
