//! Service-level orchestration.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use netforge_inventory::Inventory;
use netforge_model::{DeviceReport, JobReport, Service};
use netforge_store::RunLog;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::device::execute_device;
use crate::error::RunnerError;
use crate::targets::resolve_targets;

/// Runs one service to completion and records the outcome.
///
/// For a targeted service the runner fans the action out with one task per
/// resolved device and blocks until every task finishes; there is no
/// cancellation, pooling, or per-device timeout. The aggregate `success` is
/// the AND over all per-device successes. For an untargeted service the
/// action runs exactly once and its outcome is the service's result
/// directly.
pub struct ServiceRunner {
  inventory: Arc<dyn Inventory>,
  store: Arc<dyn RunLog>,
}

impl ServiceRunner {
  pub fn new(inventory: Arc<dyn Inventory>, store: Arc<dyn RunLog>) -> Self {
    Self { inventory, store }
  }

  /// Run the service with the given run context and append the result to
  /// the service's log.
  ///
  /// Returns once every dispatched device execution has completed and the
  /// log entry is durably committed.
  #[instrument(name = "service_run", skip(self, service, context), fields(service = %service.name))]
  pub async fn run(&self, service: &Service, context: &Value) -> Result<JobReport, RunnerError> {
    let started_at = Utc::now();

    let report = if service.has_targets {
      self.run_targeted(service, context).await?
    } else {
      match service.action.run(None, context).await {
        Ok(outcome) => JobReport::Single {
          success: outcome.success,
          result: outcome.result,
        },
        Err(error) => JobReport::Single {
          success: false,
          result: Value::String(format!("{error:#}")),
        },
      }
    };

    let entry = serde_json::to_value(&report).unwrap_or(Value::Null);
    self
      .store
      .commit(&service.name, started_at, &entry)
      .await
      .map_err(|source| RunnerError::LogCommit {
        job: service.name.clone(),
        source,
      })?;

    debug!(success = report.success(), "service completed");
    Ok(report)
  }

  /// Fan the action out across the resolved target set.
  async fn run_targeted(
    &self,
    service: &Service,
    context: &Value,
  ) -> Result<JobReport, RunnerError> {
    let targets = resolve_targets(service, self.inventory.as_ref())?;
    debug!(targets = targets.len(), "resolved target set");

    if targets.is_empty() {
      // Nothing to fail on.
      return Ok(JobReport::Devices {
        success: true,
        devices: BTreeMap::new(),
      });
    }

    let mut names = Vec::with_capacity(targets.len());
    let mut handles = Vec::with_capacity(targets.len());
    for device in targets {
      let action = Arc::clone(&service.action);
      let context = context.clone();
      names.push(device.name.clone());
      handles.push(tokio::spawn(async move {
        execute_device(action.as_ref(), &device, &context).await
      }));
    }

    let mut success = true;
    let mut devices = BTreeMap::new();
    for (name, joined) in names.into_iter().zip(join_all(handles).await) {
      let report = match joined {
        Ok(report) => report,
        // The task itself died (a panicking body); record it like any
        // other device failure so siblings are unaffected.
        Err(error) => DeviceReport {
          success: false,
          result: Value::String(format!("device task aborted: {error}")),
        },
      };
      success &= report.success;
      devices.insert(name, report);
    }

    Ok(JobReport::Devices { success, devices })
  }
}
