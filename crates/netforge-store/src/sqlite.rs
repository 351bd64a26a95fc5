//! SQLite-backed run log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::{Error, RunLog, RunRecord};

/// SQLite-based [`RunLog`] implementation.
pub struct SqliteLog {
  pool: SqlitePool,
}

impl SqliteLog {
  /// Create a new SQLite run log with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(&self.pool).await
  }
}

#[async_trait]
impl RunLog for SqliteLog {
  async fn commit(
    &self,
    job: &str,
    started_at: DateTime<Utc>,
    report: &Value,
  ) -> Result<(), Error> {
    sqlx::query(
      r#"
            INSERT INTO job_runs (job, started_at, report)
            VALUES (?, ?, ?)
            "#,
    )
    .bind(job)
    .bind(started_at)
    .bind(Json(report))
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn history(&self, job: &str) -> Result<Vec<RunRecord>, Error> {
    let records = sqlx::query_as(
      r#"
            SELECT job, started_at, report
            FROM job_runs
            WHERE job = ?
            ORDER BY started_at ASC
            "#,
    )
    .bind(job)
    .fetch_all(&self.pool)
    .await?;

    Ok(records)
  }
}
