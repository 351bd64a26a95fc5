//! The runnable unit of work.

use crate::service::Service;
use crate::workflow::Workflow;

/// A runnable unit of automation work.
///
/// Either a leaf [`Service`] or a composite [`Workflow`]; both expose the
/// same run surface through the engine, and a workflow's members are
/// themselves jobs, so composition nests arbitrarily.
#[derive(Debug, Clone)]
pub enum Job {
  Service(Service),
  Workflow(Workflow),
}

impl Job {
  pub fn name(&self) -> &str {
    match self {
      Job::Service(service) => &service.name,
      Job::Workflow(workflow) => &workflow.name,
    }
  }

  pub fn description(&self) -> &str {
    match self {
      Job::Service(service) => &service.description,
      Job::Workflow(workflow) => &workflow.description,
    }
  }

  /// Delay in seconds applied after this job completes before a parent
  /// workflow considers its successors ready.
  pub fn waiting_time(&self) -> u64 {
    match self {
      Job::Service(service) => service.waiting_time,
      Job::Workflow(workflow) => workflow.waiting_time,
    }
  }

  pub fn as_workflow(&self) -> Option<&Workflow> {
    match self {
      Job::Workflow(workflow) => Some(workflow),
      Job::Service(_) => None,
    }
  }
}
