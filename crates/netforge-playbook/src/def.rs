//! Serde definitions for playbook files.

use netforge_model::EdgeOutcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A whole playbook: inventory plus jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybookDef {
  #[serde(default)]
  pub devices: Vec<DeviceDef>,
  #[serde(default)]
  pub pools: Vec<PoolDef>,
  #[serde(default)]
  pub services: Vec<ServiceDef>,
  #[serde(default)]
  pub workflows: Vec<WorkflowDef>,
}

impl PlaybookDef {
  /// Parse a playbook from JSON text.
  pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(text)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDef {
  pub name: String,
  pub address: String,
  #[serde(default = "default_port")]
  pub port: u16,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vendor: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub operating_system: Option<String>,
}

fn default_port() -> u16 {
  22
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolDef {
  pub name: String,
  #[serde(default)]
  pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDef {
  pub name: String,
  #[serde(default)]
  pub description: String,
  /// Delay in seconds before workflow successors may proceed.
  #[serde(default)]
  pub waiting_time: u64,
  #[serde(default)]
  pub has_targets: bool,
  #[serde(default)]
  pub devices: Vec<String>,
  #[serde(default)]
  pub pools: Vec<String>,
  pub action: ActionDef,
}

/// Built-in action kinds a playbook can attach to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDef {
  /// Return a fixed outcome; useful for wiring and rehearsing workflows.
  Payload {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    result: Value,
  },
  /// Run a local command, with `{device.*}` placeholders substituted.
  Command { command: String },
  /// GET a URL, with `{device.*}` placeholders substituted.
  HttpGet { url: String },
}

fn default_true() -> bool {
  true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDef {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub waiting_time: u64,
  #[serde(default)]
  pub jobs: Vec<String>,
  #[serde(default)]
  pub edges: Vec<EdgeDef>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_job: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_job: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
  pub source: String,
  pub destination: String,
  #[serde(default)]
  pub outcome: EdgeOutcome,
}
