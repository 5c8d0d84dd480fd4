use thiserror::Error;

/// Errors an accessor can report.
#[derive(Debug, Error)]
pub enum EngineError {
  /// No instance record exists for the id.
  #[error("workflow instance '{instance_id}' not found")]
  InstanceNotFound { instance_id: String },

  /// Transient backend fault while fetching an instance. The caller may
  /// retry the whole operation.
  #[error("workflow engine unavailable fetching instance '{instance_id}': {message}")]
  Unavailable {
    instance_id: String,
    message: String,
  },
}
