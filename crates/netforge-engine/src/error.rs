//! Engine errors.

use netforge_runner::RunnerError;
use thiserror::Error;

/// Errors that abort a run.
///
/// Job outcomes, including partial failure at any depth, are never errors:
/// they travel inside the returned report. These variants cover
/// configuration and persistence trouble, where the caller gets an explicit
/// failure instead of a partial result.
#[derive(Debug, Error)]
pub enum EngineError {
  /// The requested job does not exist in the registry.
  #[error("job not found: {0}")]
  JobNotFound(String),

  /// The workflow has no start job, so traversal cannot begin.
  #[error("workflow '{0}' has no start job")]
  NoStartJob(String),

  /// A leaf job run failed fatally (target resolution or log commit).
  #[error(transparent)]
  Runner(#[from] RunnerError),

  /// The workflow's own log append failed.
  #[error("failed to record run for workflow '{workflow}': {source}")]
  LogCommit {
    workflow: String,
    #[source]
    source: netforge_store::Error,
  },
}
