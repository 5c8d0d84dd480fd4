use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the id of the instance that spawned this one.
/// At most one value; absent on root instances.
pub const SPAWNED_BY_WORKFLOW: &str = "SpawnedByWorkflow";

/// Metadata key holding the ids of instances spawned by a task.
/// Lives on the task node's dynamic metadata, not on the instance.
pub const SPAWNED_WORKFLOWS: &str = "SpawnedWorkflows";

/// Multi-valued string metadata.
///
/// Each key maps to an ordered sequence of values. An absent key is
/// distinct from a key present with zero values, and both are distinct
/// from a key whose value is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
  entries: HashMap<String, Vec<String>>,
}

impl Metadata {
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the first value for a key.
  ///
  /// Returns `None` when the key is absent or has zero values.
  pub fn first(&self, key: &str) -> Option<&str> {
    self
      .entries
      .get(key)
      .and_then(|values| values.first())
      .map(String::as_str)
  }

  /// Get all values for a key, in insertion order.
  ///
  /// Returns `None` when the key is absent; `Some(&[])` when the key is
  /// present with zero values.
  pub fn all(&self, key: &str) -> Option<&[String]> {
    self.entries.get(key).map(Vec::as_slice)
  }

  /// Append a value to a key, creating the key if absent.
  pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
    self.entries.entry(key.into()).or_default().push(value.into());
  }

  /// Replace all values for a key.
  pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
    self.entries.insert(key.into(), values);
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
