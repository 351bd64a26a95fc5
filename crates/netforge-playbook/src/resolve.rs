//! Resolution of playbook definitions into the runnable model.

use std::sync::Arc;

use netforge_inventory::{Device, DevicePool, StaticInventory};
use netforge_model::{Action, Job, JobRegistry, Service, Workflow, WorkflowEdge};

use crate::actions::{CommandAction, HttpGetAction, PayloadAction};
use crate::def::{ActionDef, PlaybookDef};
use crate::error::PlaybookError;

/// Resolve a playbook into a validated inventory and job registry.
///
/// All validation happens here, before anything runs: duplicate names,
/// pools referencing unknown devices, workflows referencing unknown jobs or
/// non-member edge endpoints all fail loudly.
pub fn resolve(def: PlaybookDef) -> Result<(StaticInventory, JobRegistry), PlaybookError> {
  let devices = def.devices.into_iter().map(|d| Device {
    name: d.name,
    address: d.address,
    port: d.port,
    vendor: d.vendor,
    operating_system: d.operating_system,
  });
  let pools = def.pools.into_iter().map(|p| DevicePool {
    name: p.name,
    devices: p.devices,
  });
  let inventory = StaticInventory::new(devices, pools)?;

  let mut jobs = Vec::with_capacity(def.services.len() + def.workflows.len());
  for service in def.services {
    jobs.push(Job::Service(Service {
      name: service.name,
      description: service.description,
      waiting_time: service.waiting_time,
      has_targets: service.has_targets,
      devices: service.devices,
      pools: service.pools,
      action: instantiate(service.action),
    }));
  }
  for workflow in def.workflows {
    jobs.push(Job::Workflow(Workflow {
      name: workflow.name,
      description: workflow.description,
      waiting_time: workflow.waiting_time,
      jobs: workflow.jobs,
      edges: workflow
        .edges
        .into_iter()
        .map(|e| WorkflowEdge {
          source: e.source,
          destination: e.destination,
          outcome: e.outcome,
        })
        .collect(),
      start_job: workflow.start_job,
      end_job: workflow.end_job,
    }));
  }

  let registry = JobRegistry::new(jobs)?;
  Ok((inventory, registry))
}

fn instantiate(def: ActionDef) -> Arc<dyn Action> {
  match def {
    ActionDef::Payload { success, result } => Arc::new(PayloadAction { success, result }),
    ActionDef::Command { command } => Arc::new(CommandAction { command }),
    ActionDef::HttpGet { url } => Arc::new(HttpGetAction::new(url)),
  }
}
