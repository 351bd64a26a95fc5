//! Composite jobs: directed graphs of member jobs with outcome-typed edges.

use serde::{Deserialize, Serialize};

/// The outcome tag on a workflow edge.
///
/// An edge fires only when its source job's reported outcome matches the
/// tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOutcome {
  #[default]
  Success,
  Failure,
}

impl EdgeOutcome {
  /// Whether an edge with this tag fires for the given job outcome.
  pub fn matches(self, success: bool) -> bool {
    match self {
      EdgeOutcome::Success => success,
      EdgeOutcome::Failure => !success,
    }
  }
}

/// A directed link between two member jobs of a workflow.
///
/// Edges belong to exactly one workflow: they live inside it and are dropped
/// with it. The endpoints are job names, so dropping a workflow never drops
/// its member jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
  pub source: String,
  pub destination: String,
  pub outcome: EdgeOutcome,
}

/// A composite job: member jobs linked by outcome-typed edges.
///
/// Traversal starts at `start_job`; `end_job`'s outcome, if reached, becomes
/// the workflow's own outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
  /// Unique job name.
  pub name: String,
  #[serde(default)]
  pub description: String,
  /// Delay in seconds applied after completion before a parent workflow's
  /// successors may proceed.
  #[serde(default)]
  pub waiting_time: u64,
  /// Member job names.
  pub jobs: Vec<String>,
  pub edges: Vec<WorkflowEdge>,
  pub start_job: Option<String>,
  pub end_job: Option<String>,
}

impl Workflow {
  /// Sources of every edge terminating at `job`, regardless of outcome tag.
  ///
  /// A job is ready only once all of these have been visited: whichever
  /// branch actually fired, the job must see the full upstream payload.
  pub fn sources<'a>(&'a self, job: &'a str) -> impl Iterator<Item = &'a str> {
    self
      .edges
      .iter()
      .filter(move |edge| edge.destination == job)
      .map(|edge| edge.source.as_str())
  }

  /// Destinations of outgoing edges from `job` whose tag matches the
  /// reported outcome.
  pub fn successors<'a>(&'a self, job: &'a str, success: bool) -> impl Iterator<Item = &'a str> {
    self
      .edges
      .iter()
      .filter(move |edge| edge.source == job && edge.outcome.matches(success))
      .map(|edge| edge.destination.as_str())
  }

  /// Whether `job` is the distinguished end job.
  pub fn is_end(&self, job: &str) -> bool {
    self.end_job.as_deref() == Some(job)
  }
}
