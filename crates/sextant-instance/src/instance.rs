use serde::{Deserialize, Serialize};

use crate::metadata::{Metadata, SPAWNED_BY_WORKFLOW};
use crate::node::ProcessorNode;

/// A materialized workflow instance record.
///
/// This is the snapshot form an accessor hands out: instance-level
/// metadata plus the root of the processor tree. The tree is an
/// immutable snapshot taken when the record was fetched; it is never
/// mutated in place by consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
  pub instance_id: String,

  /// Id of the workflow definition this instance runs.
  pub model_id: String,

  /// Engine-owned execution state name.
  pub state: String,

  /// Instance-level metadata. `SpawnedByWorkflow` lives here.
  #[serde(default)]
  pub metadata: Metadata,

  /// Root of the processor tree.
  pub root: ProcessorNode,
}

impl WorkflowInstance {
  /// Id of the instance that spawned this one, if any.
  pub fn spawned_by(&self) -> Option<&str> {
    self.metadata.first(SPAWNED_BY_WORKFLOW)
  }
}
