//! End-to-end runs through the engine: conditional routing, readiness
//! gating, context accumulation, and log commits.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use netforge_engine::{ChannelNotifier, Engine, EngineError, RunEvent};
use netforge_inventory::{Device, DevicePool, StaticInventory};
use netforge_model::{
  Action, ActionOutcome, EdgeOutcome, Job, JobRegistry, Service, Workflow, WorkflowEdge,
};
use netforge_store::{MemoryLog, RunLog};
use serde_json::{Value, json};

/// Reports a fixed outcome and records that it ran.
struct Scripted {
  success: bool,
  runs: Arc<AtomicUsize>,
  order: Arc<Mutex<Vec<String>>>,
  name: &'static str,
}

impl Scripted {
  fn new(name: &'static str, success: bool, order: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
    Arc::new(Self {
      success,
      runs: Arc::new(AtomicUsize::new(0)),
      order: Arc::clone(order),
      name,
    })
  }
}

#[async_trait]
impl Action for Scripted {
  async fn run(&self, _: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    self.runs.fetch_add(1, Ordering::SeqCst);
    self.order.lock().unwrap().push(self.name.to_string());
    Ok(ActionOutcome {
      success: self.success,
      result: json!(self.name),
    })
  }
}

/// Succeeds only if the run context already carries the given job's report.
struct ExpectsUpstream {
  upstream: &'static str,
}

#[async_trait]
impl Action for ExpectsUpstream {
  async fn run(&self, _: Option<&Device>, context: &Value) -> anyhow::Result<ActionOutcome> {
    let seen = context.get(self.upstream).is_some();
    Ok(ActionOutcome {
      success: seen,
      result: json!({ "saw_upstream": seen }),
    })
  }
}

fn service(name: &str, action: Arc<dyn Action>) -> Job {
  Job::Service(Service::new(name, action))
}

fn edge(source: &str, destination: &str, outcome: EdgeOutcome) -> WorkflowEdge {
  WorkflowEdge {
    source: source.to_string(),
    destination: destination.to_string(),
    outcome,
  }
}

fn workflow(name: &str, jobs: &[&str], edges: Vec<WorkflowEdge>, start: &str, end: &str) -> Job {
  Job::Workflow(Workflow {
    name: name.to_string(),
    description: String::new(),
    waiting_time: 0,
    jobs: jobs.iter().map(|j| j.to_string()).collect(),
    edges,
    start_job: Some(start.to_string()),
    end_job: Some(end.to_string()),
  })
}

fn engine(jobs: Vec<Job>) -> (Engine, Arc<MemoryLog>) {
  let registry = Arc::new(JobRegistry::new(jobs).unwrap());
  let inventory = Arc::new(StaticInventory::new([], []).unwrap());
  let log = Arc::new(MemoryLog::new());
  let engine = Engine::new(registry, inventory, Arc::clone(&log) as Arc<dyn RunLog>);
  (engine, log)
}

#[tokio::test]
async fn a_success_chain_reaches_the_end_job() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Scripted::new("b", true, &order)),
    workflow(
      "w",
      &["a", "b"],
      vec![edge("a", "b", EdgeOutcome::Success)],
      "a",
      "b",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  assert_eq!(value["success"], json!(true));
  assert_eq!(value["a"], json!({"success": true, "result": "a"}));
  assert_eq!(value["b"], json!({"success": true, "result": "b"}));
  assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
}

#[tokio::test]
async fn the_untaken_branch_never_runs() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let b = Scripted::new("b", true, &order);
  let c = Scripted::new("c", true, &order);
  let c_runs = Arc::clone(&c.runs);
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Arc::clone(&b) as Arc<dyn Action>),
    service("c", Arc::clone(&c) as Arc<dyn Action>),
    workflow(
      "w",
      &["a", "b", "c"],
      vec![
        edge("a", "b", EdgeOutcome::Success),
        edge("a", "c", EdgeOutcome::Failure),
      ],
      "a",
      "b",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  assert_eq!(value["success"], json!(true));
  assert!(value.get("c").is_none());
  assert_eq!(c_runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failure_routes_along_the_failure_edge() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", false, &order)),
    service("fix", Scripted::new("fix", true, &order)),
    service("celebrate", Scripted::new("celebrate", true, &order)),
    workflow(
      "w",
      &["a", "fix", "celebrate"],
      vec![
        edge("a", "celebrate", EdgeOutcome::Success),
        edge("a", "fix", EdgeOutcome::Failure),
      ],
      "a",
      "fix",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  assert_eq!(value["success"], json!(true));
  assert_eq!(value["a"]["success"], json!(false));
  assert!(value.get("celebrate").is_none());
  assert_eq!(*order.lock().unwrap(), vec!["a", "fix"]);
}

#[tokio::test]
async fn a_job_downstream_of_an_untaken_branch_is_dropped() {
  // d needs both b (taken) and c (never taken); it must not run.
  let order = Arc::new(Mutex::new(Vec::new()));
  let d = Scripted::new("d", true, &order);
  let d_runs = Arc::clone(&d.runs);
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Scripted::new("b", true, &order)),
    service("c", Scripted::new("c", true, &order)),
    service("d", Arc::clone(&d) as Arc<dyn Action>),
    workflow(
      "w",
      &["a", "b", "c", "d"],
      vec![
        edge("a", "b", EdgeOutcome::Success),
        edge("a", "c", EdgeOutcome::Failure),
        edge("b", "d", EdgeOutcome::Success),
        edge("c", "d", EdgeOutcome::Success),
      ],
      "a",
      "d",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  // The end job was never reached, so the workflow is failed by policy.
  assert_eq!(value["success"], json!(false));
  assert!(value.get("d").is_none());
  assert_eq!(d_runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn a_join_waits_for_all_predecessors() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Scripted::new("b", true, &order)),
    service("c", Scripted::new("c", true, &order)),
    service("d", Arc::new(ExpectsUpstream { upstream: "c" })),
    workflow(
      "w",
      &["a", "b", "c", "d"],
      vec![
        edge("a", "b", EdgeOutcome::Success),
        edge("a", "c", EdgeOutcome::Success),
        edge("b", "d", EdgeOutcome::Success),
        edge("c", "d", EdgeOutcome::Success),
      ],
      "a",
      "d",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  // d ran exactly once, after both branches, with both reports in context.
  assert_eq!(value["success"], json!(true));
  assert_eq!(value["d"]["result"], json!({"saw_upstream": true}));
}

#[tokio::test]
async fn context_accumulates_upstream_reports() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, _) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Arc::new(ExpectsUpstream { upstream: "a" })),
    workflow(
      "w",
      &["a", "b"],
      vec![edge("a", "b", EdgeOutcome::Success)],
      "a",
      "b",
    ),
  ]);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();
  assert_eq!(value["b"]["result"]["saw_upstream"], json!(true));
}

#[tokio::test]
async fn an_initiating_payload_seeds_the_context() {
  let (engine, _) = engine(vec![
    service("a", Arc::new(ExpectsUpstream { upstream: "ticket" })),
    workflow("w", &["a"], Vec::new(), "a", "a"),
  ]);

  let report = engine
    .run("w", json!({"ticket": "CHG-1042"}))
    .await
    .unwrap();
  let value = serde_json::to_value(&report).unwrap();
  assert_eq!(value["a"]["result"]["saw_upstream"], json!(true));
}

#[tokio::test]
async fn workflows_nest_through_the_same_dispatch() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, log) = engine(vec![
    service("inner_a", Scripted::new("inner_a", true, &order)),
    workflow("inner", &["inner_a"], Vec::new(), "inner_a", "inner_a"),
    service("after", Scripted::new("after", true, &order)),
    workflow(
      "outer",
      &["inner", "after"],
      vec![edge("inner", "after", EdgeOutcome::Success)],
      "inner",
      "after",
    ),
  ]);

  let report = engine.run("outer", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  assert_eq!(value["success"], json!(true));
  assert_eq!(value["inner"]["success"], json!(true));
  assert_eq!(value["inner"]["inner_a"]["success"], json!(true));
  // Both the inner and the outer workflow committed their own log entry.
  assert_eq!(log.history("inner").await.unwrap().len(), 1);
  assert_eq!(log.history("outer").await.unwrap().len(), 1);
}

#[tokio::test]
async fn reruns_are_structurally_identical() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let (engine, log) = engine(vec![
    service("a", Scripted::new("a", true, &order)),
    service("b", Scripted::new("b", true, &order)),
    workflow(
      "w",
      &["a", "b"],
      vec![edge("a", "b", EdgeOutcome::Success)],
      "a",
      "b",
    ),
  ]);

  let first = engine.run("w", Value::Null).await.unwrap();
  let second = engine.run("w", Value::Null).await.unwrap();

  assert_eq!(first, second);
  let history = log.history("w").await.unwrap();
  assert_eq!(history.len(), 2);
  assert_eq!(history[0].report.0, history[1].report.0);
  assert!(history[0].started_at <= history[1].started_at);
}

#[tokio::test]
async fn a_missing_start_job_fails_before_any_execution() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let a = Scripted::new("a", true, &order);
  let a_runs = Arc::clone(&a.runs);
  let (engine, log) = engine(vec![
    service("a", Arc::clone(&a) as Arc<dyn Action>),
    Job::Workflow(Workflow {
      name: "w".to_string(),
      description: String::new(),
      waiting_time: 0,
      jobs: vec!["a".to_string()],
      edges: Vec::new(),
      start_job: None,
      end_job: None,
    }),
  ]);

  let result = engine.run("w", Value::Null).await;

  assert!(matches!(result, Err(EngineError::NoStartJob(_))));
  assert_eq!(a_runs.load(Ordering::SeqCst), 0);
  assert!(log.history("w").await.unwrap().is_empty());
}

#[tokio::test]
async fn an_unknown_job_is_an_explicit_error() {
  let (engine, _) = engine(Vec::new());
  let result = engine.run("ghost", Value::Null).await;
  assert!(matches!(result, Err(EngineError::JobNotFound(_))));
}

#[tokio::test(start_paused = true)]
async fn waiting_time_throttles_successors() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let mut slow = Service::new("slow", Scripted::new("slow", true, &order) as Arc<dyn Action>);
  slow.waiting_time = 30;
  let (engine, _) = engine(vec![
    Job::Service(slow),
    service("next", Scripted::new("next", true, &order)),
    workflow(
      "w",
      &["slow", "next"],
      vec![edge("slow", "next", EdgeOutcome::Success)],
      "slow",
      "next",
    ),
  ]);

  let before = tokio::time::Instant::now();
  engine.run("w", Value::Null).await.unwrap();
  assert!(before.elapsed() >= std::time::Duration::from_secs(30));
}

#[tokio::test]
async fn device_fan_out_inside_a_workflow() {
  let registry = Arc::new(
    JobRegistry::new(vec![
      Job::Service(
        Service::new("probe", Arc::new(ReachableOnly)).with_targets(
          Vec::new(),
          vec!["edge".to_string()],
        ),
      ),
      workflow("w", &["probe"], Vec::new(), "probe", "probe"),
    ])
    .unwrap(),
  );
  let inventory = Arc::new(
    StaticInventory::new(
      [
        Device::new("r1", "10.0.0.1"),
        Device::new("r2", "unreachable.invalid"),
      ],
      [DevicePool {
        name: "edge".to_string(),
        devices: vec!["r1".to_string(), "r2".to_string()],
      }],
    )
    .unwrap(),
  );
  let log = Arc::new(MemoryLog::new());
  let engine = Engine::new(registry, inventory, Arc::clone(&log) as Arc<dyn RunLog>);

  let report = engine.run("w", Value::Null).await.unwrap();
  let value = serde_json::to_value(&report).unwrap();

  assert_eq!(value["success"], json!(false));
  assert_eq!(value["probe"]["devices"]["r1"]["success"], json!(true));
  assert_eq!(value["probe"]["devices"]["r2"]["success"], json!(false));
  // The service committed its own entry besides the workflow's.
  assert_eq!(log.history("probe").await.unwrap().len(), 1);
}

/// Fails for devices whose address does not look like an IP.
struct ReachableOnly;

#[async_trait]
impl Action for ReachableOnly {
  async fn run(&self, device: Option<&Device>, _: &Value) -> anyhow::Result<ActionOutcome> {
    let device = device.expect("targeted action called without a device");
    if device.address.parse::<std::net::IpAddr>().is_err() {
      anyhow::bail!("no route to {}", device.address);
    }
    Ok(ActionOutcome::success(json!({"address": device.address})))
  }
}

#[tokio::test]
async fn events_bracket_the_run() {
  let order = Arc::new(Mutex::new(Vec::new()));
  let registry = Arc::new(
    JobRegistry::new(vec![
      service("a", Scripted::new("a", true, &order)),
      workflow("w", &["a"], Vec::new(), "a", "a"),
    ])
    .unwrap(),
  );
  let inventory = Arc::new(StaticInventory::new([], []).unwrap());
  let log = Arc::new(MemoryLog::new());
  let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
  let engine = Engine::with_notifier(
    registry,
    inventory,
    log as Arc<dyn RunLog>,
    ChannelNotifier::new(tx),
  );

  engine.run("w", Value::Null).await.unwrap();

  let mut events = Vec::new();
  while let Ok(event) = rx.try_recv() {
    events.push(event);
  }

  assert!(matches!(events.first(), Some(RunEvent::RunStarted { .. })));
  assert!(matches!(
    events.last(),
    Some(RunEvent::RunCompleted { success: true, .. })
  ));
  assert!(
    events
      .iter()
      .any(|e| matches!(e, RunEvent::JobCompleted { job, success: true, .. } if job == "a"))
  );
}
