use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::{Metadata, SPAWNED_WORKFLOWS};

/// The kind of a processor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
  Task,
  PreconditionGroup,
  PostconditionGroup,
}

impl fmt::Display for NodeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Task => "Task",
      Self::PreconditionGroup => "PreconditionGroup",
      Self::PostconditionGroup => "PostconditionGroup",
    };
    f.write_str(name)
  }
}

/// One node in a workflow instance's processor tree.
///
/// A single tagged type covers tasks and condition groups; the three
/// child slots are explicit so traversal code stays uniform. A node owns
/// its children; cross-instance links are carried as instance ids inside
/// `dynamic_metadata`, never as in-memory references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorNode {
  pub kind: NodeKind,

  /// Id of the definition element this node was instantiated from.
  pub model_id: String,

  /// Execution state name, owned by the engine and opaque here.
  pub state: String,

  /// Node-scoped metadata. `SpawnedWorkflows` lives here for task nodes.
  #[serde(default)]
  pub dynamic_metadata: Metadata,

  /// Optional precondition group evaluated before this node.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preconditions: Option<Box<ProcessorNode>>,

  /// Optional postcondition group evaluated after this node.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub postconditions: Option<Box<ProcessorNode>>,

  /// Ordered children. Empty for leaf tasks.
  #[serde(default)]
  pub sub_processors: Vec<ProcessorNode>,
}

impl ProcessorNode {
  /// Create a node with no metadata and no children.
  pub fn new(kind: NodeKind, model_id: impl Into<String>, state: impl Into<String>) -> Self {
    Self {
      kind,
      model_id: model_id.into(),
      state: state.into(),
      dynamic_metadata: Metadata::new(),
      preconditions: None,
      postconditions: None,
      sub_processors: Vec::new(),
    }
  }

  pub fn is_task(&self) -> bool {
    self.kind == NodeKind::Task
  }

  /// Instance ids spawned by this node, if any were recorded.
  ///
  /// `None` when the node never spawned; `Some(&[])` when the key was
  /// written with zero values.
  pub fn spawned_instances(&self) -> Option<&[String]> {
    self.dynamic_metadata.all(SPAWNED_WORKFLOWS)
  }
}
