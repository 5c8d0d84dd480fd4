use async_trait::async_trait;

use sextant_instance::{Metadata, ProcessorNode};

use crate::error::EngineError;

/// Read-only access to materialized workflow instances.
///
/// Implementations are externally synchronized services; the tracer
/// never mutates instance state through this trait. Every fetch is a
/// fresh snapshot: nothing is cached between calls, so the same id may
/// yield different trees within one trace if the engine moves on.
#[async_trait]
pub trait InstanceAccessor: Send + Sync {
  /// Get the instance-level metadata for an instance.
  ///
  /// Fails with `EngineError::InstanceNotFound` when no record exists.
  async fn metadata(&self, instance_id: &str) -> Result<Metadata, EngineError>;

  /// Get the root of the instance's processor tree.
  ///
  /// Fails with `EngineError::InstanceNotFound` when no record exists,
  /// or `EngineError::Unavailable` on a transient backend fault.
  async fn processor_tree(&self, instance_id: &str) -> Result<ProcessorNode, EngineError>;
}
