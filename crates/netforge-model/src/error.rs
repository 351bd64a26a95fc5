use thiserror::Error;

/// Validation errors raised when assembling the job model.
///
/// These are configuration failures: fatal at load time, never recovered
/// into a run result.
#[derive(Debug, Error)]
pub enum ModelError {
  #[error("duplicate job name: {0}")]
  DuplicateJob(String),

  #[error("'{0}' is reserved and cannot be used as a job name")]
  ReservedName(String),

  #[error("workflow '{workflow}' references unknown job '{job}'")]
  UnknownMember { workflow: String, job: String },

  #[error("workflow '{workflow}' edge references non-member job '{job}'")]
  EdgeEndpoint { workflow: String, job: String },

  #[error("workflow '{workflow}' has duplicate {outcome} edge {edge_source} -> {destination}")]
  DuplicateEdge {
    workflow: String,
    edge_source: String,
    destination: String,
    outcome: String,
  },

  #[error("workflow '{workflow}' start job '{job}' is not a member")]
  StartNotMember { workflow: String, job: String },

  #[error("workflow '{workflow}' end job '{job}' is not a member")]
  EndNotMember { workflow: String, job: String },
}
