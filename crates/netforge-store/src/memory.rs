//! In-memory run log.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::types::Json;

use crate::{Error, RunLog, RunRecord};

/// An in-memory [`RunLog`] for tests and embedded use.
///
/// Entries are held per job in a timestamp-ordered map, mirroring the
/// append-only log shape of the durable store.
#[derive(Debug, Default)]
pub struct MemoryLog {
  runs: RwLock<BTreeMap<String, BTreeMap<DateTime<Utc>, Value>>>,
}

impl MemoryLog {
  pub fn new() -> Self {
    Self::default()
  }

  /// Total number of committed entries across all jobs.
  pub fn entry_count(&self) -> usize {
    self
      .runs
      .read()
      .expect("run log lock poisoned")
      .values()
      .map(BTreeMap::len)
      .sum()
  }
}

#[async_trait]
impl RunLog for MemoryLog {
  async fn commit(
    &self,
    job: &str,
    started_at: DateTime<Utc>,
    report: &Value,
  ) -> Result<(), Error> {
    self
      .runs
      .write()
      .expect("run log lock poisoned")
      .entry(job.to_string())
      .or_default()
      .insert(started_at, report.clone());
    Ok(())
  }

  async fn history(&self, job: &str) -> Result<Vec<RunRecord>, Error> {
    let runs = self.runs.read().expect("run log lock poisoned");
    Ok(
      runs
        .get(job)
        .into_iter()
        .flatten()
        .map(|(started_at, report)| RunRecord {
          job: job.to_string(),
          started_at: *started_at,
          report: Json(report.clone()),
        })
        .collect(),
    )
  }
}
