//! The job execution engine.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::BoxFuture;
use netforge_inventory::Inventory;
use netforge_model::{Job, JobRegistry, JobReport, Workflow, WorkflowReport};
use netforge_runner::ServiceRunner;
use netforge_store::RunLog;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::events::{NoopNotifier, RunEvent, RunNotifier};

/// The job execution engine.
///
/// Dispatches a run request to the [`ServiceRunner`] for a leaf job or to
/// the workflow graph walker for a composite one; nested workflows recurse
/// through the same dispatch. The traversal itself is single-threaded and
/// synchronous: one member job runs to completion, including all of its own
/// device fan-out, before the walker evaluates readiness of the next.
///
/// Generic over `N: RunNotifier` to allow different observation strategies.
/// Use [`Engine::new`] for a default engine with no-op notifications, or
/// [`Engine::with_notifier`] to provide a custom notifier.
pub struct Engine<N: RunNotifier = NoopNotifier> {
  registry: Arc<JobRegistry>,
  store: Arc<dyn RunLog>,
  runner: ServiceRunner,
  notifier: N,
}

impl Engine<NoopNotifier> {
  /// Create a new engine with no-op notifications.
  pub fn new(
    registry: Arc<JobRegistry>,
    inventory: Arc<dyn Inventory>,
    store: Arc<dyn RunLog>,
  ) -> Self {
    Self::with_notifier(registry, inventory, store, NoopNotifier)
  }
}

impl<N: RunNotifier> Engine<N> {
  /// Create a new engine with a custom notifier.
  pub fn with_notifier(
    registry: Arc<JobRegistry>,
    inventory: Arc<dyn Inventory>,
    store: Arc<dyn RunLog>,
    notifier: N,
  ) -> Self {
    let runner = ServiceRunner::new(inventory, Arc::clone(&store));
    Self {
      registry,
      store,
      runner,
      notifier,
    }
  }

  /// Run a job by name with an optional initiating payload.
  ///
  /// The entry point for schedulers and manual triggers. The caller always
  /// receives either a complete report, possibly embedding partial failure
  /// flags at arbitrary depth, or an explicit run-level error; a job's
  /// outcome is never silently dropped.
  #[instrument(name = "job_run", skip(self, payload), fields(job = %job_name))]
  pub async fn run(&self, job_name: &str, payload: Value) -> Result<JobReport, EngineError> {
    let run_id = uuid::Uuid::new_v4().to_string();
    let job = self
      .registry
      .get(job_name)
      .ok_or_else(|| EngineError::JobNotFound(job_name.to_string()))?;

    info!(run_id = %run_id, "run started");
    self.notifier.notify(RunEvent::RunStarted {
      run_id: run_id.clone(),
      job: job_name.to_string(),
    });

    let result = self.run_job(job, &payload, &run_id).await;

    match &result {
      Ok(report) => {
        info!(run_id = %run_id, success = report.success(), "run completed");
        self.notifier.notify(RunEvent::RunCompleted {
          run_id,
          job: job_name.to_string(),
          success: report.success(),
        });
      }
      Err(error) => {
        warn!(run_id = %run_id, error = %error, "run failed");
        self.notifier.notify(RunEvent::RunFailed {
          run_id,
          job: job_name.to_string(),
          error: error.to_string(),
        });
      }
    }

    result
  }

  /// Dispatch one job. Boxed because workflows recurse.
  fn run_job<'a>(
    &'a self,
    job: &'a Job,
    context: &'a Value,
    run_id: &'a str,
  ) -> BoxFuture<'a, Result<JobReport, EngineError>> {
    Box::pin(async move {
      match job {
        Job::Service(service) => Ok(self.runner.run(service, context).await?),
        Job::Workflow(workflow) => self.run_workflow(workflow, context, run_id).await,
      }
    })
  }

  /// Walk a workflow's job graph.
  ///
  /// A work-queue seeded with the start job; popping order among ready jobs
  /// is a scheduling detail, not a guaranteed visiting order. A popped job
  /// whose predecessors are not all visited is re-enqueued; once every
  /// queued job has been deferred with no visit in between, the remainder
  /// hangs off a branch that was never taken and is dropped. That is the
  /// conditional-branching model working as intended, not an error.
  async fn run_workflow(
    &self,
    workflow: &Workflow,
    payload: &Value,
    run_id: &str,
  ) -> Result<JobReport, EngineError> {
    let started_at = Utc::now();
    let start = workflow
      .start_job
      .as_deref()
      .ok_or_else(|| EngineError::NoStartJob(workflow.name.clone()))?;

    // Seed the run context from the initiating payload, when it is an
    // object; member job reports are folded in under their job names.
    let mut context: Map<String, Value> = match payload {
      Value::Object(map) => map.clone(),
      _ => Map::new(),
    };

    let mut queue: VecDeque<String> = VecDeque::from([start.to_string()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut reports: BTreeMap<String, JobReport> = BTreeMap::new();
    // The end job's outcome when reached; a never-reached end job leaves the
    // workflow failed.
    let mut success = false;
    let mut deferrals = 0usize;

    while let Some(name) = queue.pop_front() {
      if visited.contains(&name) {
        continue;
      }

      if workflow.sources(&name).any(|source| !visited.contains(source)) {
        deferrals += 1;
        if deferrals > queue.len() {
          debug!(workflow = %workflow.name, job = %name, "predecessor never ran, dropping job");
          continue;
        }
        queue.push_back(name);
        continue;
      }
      deferrals = 0;

      let job = self
        .registry
        .get(&name)
        .ok_or_else(|| EngineError::JobNotFound(name.clone()))?;

      visited.insert(name.clone());
      self.notifier.notify(RunEvent::JobStarted {
        run_id: run_id.to_string(),
        workflow: workflow.name.clone(),
        job: name.clone(),
      });

      let report = self
        .run_job(job, &Value::Object(context.clone()), run_id)
        .await?;
      let outcome = report.success();

      debug!(workflow = %workflow.name, job = %name, success = outcome, "job visited");
      self.notifier.notify(RunEvent::JobCompleted {
        run_id: run_id.to_string(),
        workflow: workflow.name.clone(),
        job: name.clone(),
        success: outcome,
      });

      if workflow.is_end(&name) {
        success = outcome;
      }

      for successor in workflow.successors(&name, outcome) {
        if !visited.contains(successor) {
          queue.push_back(successor.to_string());
        }
      }

      context.insert(
        name.clone(),
        serde_json::to_value(&report).unwrap_or(Value::Null),
      );
      reports.insert(name, report);

      // The configured throttle before successors are considered ready.
      if job.waiting_time() > 0 {
        tokio::time::sleep(Duration::from_secs(job.waiting_time())).await;
      }
    }

    let report = WorkflowReport {
      success,
      jobs: reports,
    };
    let entry = serde_json::to_value(&report).unwrap_or(Value::Null);
    self
      .store
      .commit(&workflow.name, started_at, &entry)
      .await
      .map_err(|source| EngineError::LogCommit {
        workflow: workflow.name.clone(),
        source,
      })?;

    Ok(JobReport::Workflow(report))
  }
}
