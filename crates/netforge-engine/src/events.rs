//! Run events and notifiers for observability.
//!
//! Events are emitted while a job runs so consumers can observe progress:
//! persist status rows, stream to a UI, feed notifications. The engine calls
//! `notify` for each event; implementations decide what to do with them.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Events emitted during a job run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RunEvent {
  /// A top-level run has started.
  RunStarted { run_id: String, job: String },

  /// A workflow member job has started executing.
  JobStarted {
    run_id: String,
    workflow: String,
    job: String,
  },

  /// A workflow member job has completed with the given outcome.
  JobCompleted {
    run_id: String,
    workflow: String,
    job: String,
    success: bool,
  },

  /// The top-level run produced a report.
  RunCompleted {
    run_id: String,
    job: String,
    success: bool,
  },

  /// The top-level run aborted with an error.
  RunFailed {
    run_id: String,
    job: String,
    error: String,
  },
}

/// Trait for receiving run events.
pub trait RunNotifier: Send + Sync {
  /// Called when a run event occurs.
  fn notify(&self, event: RunEvent);
}

/// A no-op notifier that discards all events.
///
/// Useful for tests or when event observation is not needed.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl RunNotifier for NoopNotifier {
  fn notify(&self, _event: RunEvent) {
    // Intentionally empty
  }
}

/// A notifier that sends events to an unbounded channel.
///
/// Unbounded so a slow consumer never blocks the engine; the event volume is
/// one per job start/completion, so growth is bounded by run size in
/// practice.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
  sender: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelNotifier {
  /// Create a new channel notifier.
  pub fn new(sender: mpsc::UnboundedSender<RunEvent>) -> Self {
    Self { sender }
  }
}

impl RunNotifier for ChannelNotifier {
  fn notify(&self, event: RunEvent) {
    // Ignore send errors - receiver may have been dropped
    let _ = self.sender.send(event);
  }
}
