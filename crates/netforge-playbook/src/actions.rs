//! Built-in service actions.
//!
//! These cover the generic automation bodies a playbook can express without
//! writing code: fixed payloads, local commands, and HTTP probes. Anything
//! device-protocol specific (SSH sessions, vendor APIs) belongs to embedders
//! implementing [`Action`] themselves.

use anyhow::Context;
use async_trait::async_trait;
use netforge_inventory::Device;
use netforge_model::{Action, ActionOutcome};
use serde_json::{Value, json};
use tracing::debug;

/// Substitute `{device.name}`, `{device.address}` and `{device.port}` in a
/// template. Without a device the template passes through untouched.
fn substitute(template: &str, device: Option<&Device>) -> String {
  match device {
    Some(device) => template
      .replace("{device.name}", &device.name)
      .replace("{device.address}", &device.address)
      .replace("{device.port}", &device.port.to_string()),
    None => template.to_string(),
  }
}

/// Returns a fixed outcome.
#[derive(Debug, Clone)]
pub struct PayloadAction {
  pub success: bool,
  pub result: Value,
}

#[async_trait]
impl Action for PayloadAction {
  async fn run(&self, _: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    Ok(ActionOutcome {
      success: self.success,
      result: self.result.clone(),
    })
  }
}

/// Runs a local command through the shell.
///
/// Success follows the exit status; stdout and stderr are captured into the
/// result payload.
#[derive(Debug, Clone)]
pub struct CommandAction {
  pub command: String,
}

#[async_trait]
impl Action for CommandAction {
  async fn run(&self, device: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    let command = substitute(&self.command, device);
    debug!(command = %command, "running command");

    let output = tokio::process::Command::new("sh")
      .arg("-c")
      .arg(&command)
      .output()
      .await
      .with_context(|| format!("failed to spawn command: {command}"))?;

    Ok(ActionOutcome {
      success: output.status.success(),
      result: json!({
        "command": command,
        "exit_code": output.status.code(),
        "stdout": String::from_utf8_lossy(&output.stdout),
        "stderr": String::from_utf8_lossy(&output.stderr),
      }),
    })
  }
}

/// GETs a URL and reports on the HTTP status.
///
/// The body is decoded as JSON when possible, otherwise kept as text.
#[derive(Debug, Clone)]
pub struct HttpGetAction {
  url: String,
  client: reqwest::Client,
}

impl HttpGetAction {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      client: reqwest::Client::new(),
    }
  }
}

#[async_trait]
impl Action for HttpGetAction {
  async fn run(&self, device: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    let url = substitute(&self.url, device);
    debug!(url = %url, "issuing GET");

    let response = self
      .client
      .get(&url)
      .send()
      .await
      .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    let text = response
      .text()
      .await
      .with_context(|| format!("failed to read response body from {url}"))?;
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    Ok(ActionOutcome {
      success: status.is_success(),
      result: json!({
        "url": url,
        "status": status.as_u16(),
        "body": body,
      }),
    })
  }
}
