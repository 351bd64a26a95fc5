//! Netforge Store
//!
//! The run-log persistence collaborator. Every job owns an append-only log
//! of past run outcomes keyed by the invocation's start timestamp; a run is
//! not complete until its entry is durably committed here.
//!
//! The [`RunLog`] trait defines the contract; [`MemoryLog`] backs tests and
//! embedded use, [`SqliteLog`] persists to a database.

mod memory;
mod sqlite;

pub use memory::MemoryLog;
pub use sqlite::SqliteLog;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),
}

/// One committed run of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RunRecord {
  /// The job that ran.
  pub job: String,
  /// Start timestamp of the invocation; the log key.
  pub started_at: DateTime<Utc>,
  /// The serialized run report.
  pub report: sqlx::types::Json<Value>,
}

/// Append-only, timestamp-keyed log of run outcomes per job.
///
/// `commit` must be durable before it returns: the caller treats a
/// successful return as the completion signal for the run. Failures here are
/// fatal to the run and must propagate, never be swallowed.
#[async_trait]
pub trait RunLog: Send + Sync {
  /// Append one run outcome to a job's log.
  async fn commit(
    &self,
    job: &str,
    started_at: DateTime<Utc>,
    report: &Value,
  ) -> Result<(), Error>;

  /// A job's past runs, oldest first.
  async fn history(&self, job: &str) -> Result<Vec<RunRecord>, Error>;
}
