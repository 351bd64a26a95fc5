//! Structured run results.
//!
//! Every run of a job produces a [`JobReport`]; the engine appends it to the
//! job's log keyed by the invocation's start timestamp, and inside a
//! workflow the report is folded into the run context handed to subsequent
//! jobs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one device-scoped execution of a service action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
  pub success: bool,
  pub result: Value,
}

/// Result of one job run.
///
/// Serializes to the wire shapes consumers key on:
/// `{"success": .., "devices": {..}}` for a targeted service,
/// `{"success": .., "result": ..}` for an untargeted one, and
/// `{"success": .., "<job>": {..}, ..}` for a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobReport {
  /// A targeted service: per-device results keyed by device name.
  Devices {
    success: bool,
    devices: BTreeMap<String, DeviceReport>,
  },
  /// An untargeted service: the action's outcome, verbatim.
  Single { success: bool, result: Value },
  /// A nested workflow run.
  Workflow(WorkflowReport),
}

impl JobReport {
  /// The job-level outcome flag, used to select which outgoing edges fire.
  pub fn success(&self) -> bool {
    match self {
      JobReport::Devices { success, .. } | JobReport::Single { success, .. } => *success,
      JobReport::Workflow(report) => report.success,
    }
  }
}

/// Result of a workflow traversal.
///
/// `jobs` holds the report of every member job that actually ran, keyed by
/// job name; jobs on untaken branches are absent. `success` is the end job's
/// outcome, or false when the end job was never reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowReport {
  pub success: bool,
  #[serde(flatten)]
  pub jobs: BTreeMap<String, JobReport>,
}
