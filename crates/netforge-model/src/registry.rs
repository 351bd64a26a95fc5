//! Validated job lookup.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::ModelError;
use crate::job::Job;
use crate::workflow::Workflow;

/// The serialized workflow report claims this key for the outcome flag, so
/// no job may use it as a name.
const RESERVED_NAMES: &[&str] = &["success"];

/// Jobs keyed by unique name.
///
/// Construction validates the whole model: names are unique, every workflow
/// member exists, edges connect members of the owning workflow, and the
/// distinguished start/end jobs are members. A registry that builds is safe
/// to traverse.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
  jobs: HashMap<String, Arc<Job>>,
}

impl JobRegistry {
  pub fn new(jobs: impl IntoIterator<Item = Job>) -> Result<Self, ModelError> {
    let mut map: HashMap<String, Arc<Job>> = HashMap::new();
    for job in jobs {
      let name = job.name().to_string();
      if RESERVED_NAMES.contains(&name.as_str()) {
        return Err(ModelError::ReservedName(name));
      }
      if map.contains_key(&name) {
        return Err(ModelError::DuplicateJob(name));
      }
      map.insert(name, Arc::new(job));
    }

    let registry = Self { jobs: map };
    for job in registry.jobs.values() {
      if let Some(workflow) = job.as_workflow() {
        registry.validate_workflow(workflow)?;
      }
    }
    Ok(registry)
  }

  fn validate_workflow(&self, workflow: &Workflow) -> Result<(), ModelError> {
    let members: HashSet<&str> = workflow.jobs.iter().map(String::as_str).collect();

    for member in &members {
      if !self.jobs.contains_key(*member) {
        return Err(ModelError::UnknownMember {
          workflow: workflow.name.clone(),
          job: (*member).to_string(),
        });
      }
    }

    let mut seen = HashSet::new();
    for edge in &workflow.edges {
      for endpoint in [&edge.source, &edge.destination] {
        if !members.contains(endpoint.as_str()) {
          return Err(ModelError::EdgeEndpoint {
            workflow: workflow.name.clone(),
            job: endpoint.clone(),
          });
        }
      }
      if !seen.insert((edge.source.as_str(), edge.destination.as_str(), edge.outcome)) {
        return Err(ModelError::DuplicateEdge {
          workflow: workflow.name.clone(),
          edge_source: edge.source.clone(),
          destination: edge.destination.clone(),
          outcome: format!("{:?}", edge.outcome).to_lowercase(),
        });
      }
    }

    if let Some(start) = &workflow.start_job {
      if !members.contains(start.as_str()) {
        return Err(ModelError::StartNotMember {
          workflow: workflow.name.clone(),
          job: start.clone(),
        });
      }
    }
    if let Some(end) = &workflow.end_job {
      if !members.contains(end.as_str()) {
        return Err(ModelError::EndNotMember {
          workflow: workflow.name.clone(),
          job: end.clone(),
        });
      }
    }

    Ok(())
  }

  /// Look up a job by name.
  pub fn get(&self, name: &str) -> Option<&Arc<Job>> {
    self.jobs.get(name)
  }

  /// All job names, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.jobs.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }

  pub fn len(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.jobs.is_empty()
  }
}
