use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use sextant_instance::{Metadata, ProcessorNode, WorkflowInstance};

use crate::accessor::InstanceAccessor;
use crate::error::EngineError;

/// Errors loading a snapshot file.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
  #[error("failed to read snapshot file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse snapshot file: {0}")]
  Parse(#[from] serde_json::Error),
}

/// An accessor over a fixed set of instance records.
///
/// Backed by an in-memory map; records come from `insert` or from a
/// JSON snapshot file holding an array of instance records. Useful for
/// tracing an exported fleet snapshot offline, and as the test double
/// for the accessor contract.
#[derive(Debug, Default)]
pub struct SnapshotAccessor {
  instances: HashMap<String, WorkflowInstance>,
}

impl SnapshotAccessor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build an accessor from instance records.
  pub fn from_records(records: impl IntoIterator<Item = WorkflowInstance>) -> Self {
    let mut accessor = Self::new();
    for record in records {
      accessor.insert(record);
    }
    accessor
  }

  /// Load records from a JSON snapshot file (an array of instances).
  pub async fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
    let content = tokio::fs::read_to_string(path).await?;
    let records: Vec<WorkflowInstance> = serde_json::from_str(&content)?;
    Ok(Self::from_records(records))
  }

  /// Insert a record, replacing any previous record with the same id.
  pub fn insert(&mut self, record: WorkflowInstance) {
    self.instances.insert(record.instance_id.clone(), record);
  }

  pub fn len(&self) -> usize {
    self.instances.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instances.is_empty()
  }

  fn get(&self, instance_id: &str) -> Result<&WorkflowInstance, EngineError> {
    self
      .instances
      .get(instance_id)
      .ok_or_else(|| EngineError::InstanceNotFound {
        instance_id: instance_id.to_string(),
      })
  }
}

#[async_trait]
impl InstanceAccessor for SnapshotAccessor {
  async fn metadata(&self, instance_id: &str) -> Result<Metadata, EngineError> {
    Ok(self.get(instance_id)?.metadata.clone())
  }

  async fn processor_tree(&self, instance_id: &str) -> Result<ProcessorNode, EngineError> {
    Ok(self.get(instance_id)?.root.clone())
  }
}
