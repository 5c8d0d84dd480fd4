use thiserror::Error;

use sextant_engine::EngineError;

/// Errors that can abort a trace.
///
/// Every variant names the instance or token that triggered it. A trace
/// fails as a whole: partial output is never produced, since a partial
/// trace could be mistaken for a complete one.
#[derive(Debug, Error)]
pub enum TraceError {
  /// A referenced instance has no record. A vanished or malformed
  /// reference is a hard error for the trace.
  #[error("workflow instance '{instance_id}' not found")]
  InstanceNotFound { instance_id: String },

  /// Transient backend fault. The caller may retry the entire trace;
  /// the tracer itself never retries.
  #[error("workflow engine unavailable fetching instance '{instance_id}': {message}")]
  EngineUnavailable {
    instance_id: String,
    message: String,
  },

  /// The ancestry back-link walk exceeded its hop bound. Back-links are
  /// plain ids with no referential-integrity guarantee, so a cycle
  /// would otherwise loop forever.
  #[error("ancestry walk from '{start_instance_id}' exceeded {max_hops} hops, chain so far: {chain:?}")]
  AncestryCycleSuspected {
    start_instance_id: String,
    max_hops: usize,
    chain: Vec<String>,
  },

  /// The spawn descent reached an instance already on the current path.
  #[error("spawn descent revisited instance '{instance_id}', chain: {chain:?}")]
  SpawnCycleSuspected {
    instance_id: String,
    chain: Vec<String>,
  },

  /// Unrecognized trace mode token. Rejected before any fetch occurs.
  #[error("unrecognized trace mode '{token}'")]
  InvalidMode { token: String },

  /// The caller cancelled the trace.
  #[error("trace cancelled")]
  Cancelled,
}

impl From<EngineError> for TraceError {
  fn from(err: EngineError) -> Self {
    match err {
      EngineError::InstanceNotFound { instance_id } => TraceError::InstanceNotFound { instance_id },
      EngineError::Unavailable {
        instance_id,
        message,
      } => TraceError::EngineUnavailable {
        instance_id,
        message,
      },
    }
  }
}
