//! Integration tests for the tracer against snapshot-backed fleets.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use sextant_engine::{EngineError, InstanceAccessor, SnapshotAccessor};
use sextant_instance::{
  Metadata, NodeKind, ProcessorNode, SPAWNED_BY_WORKFLOW, SPAWNED_WORKFLOWS, WorkflowInstance,
};
use sextant_trace::{TraceError, TraceMode, TraceReport, Tracer, render, resolve_ancestry};

fn task(model_id: &str) -> ProcessorNode {
  ProcessorNode::new(NodeKind::Task, model_id, "Running")
}

fn spawning_task(model_id: &str, spawned: &[&str]) -> ProcessorNode {
  let mut node = task(model_id);
  node.dynamic_metadata.set(
    SPAWNED_WORKFLOWS,
    spawned.iter().map(|s| s.to_string()).collect(),
  );
  node
}

fn instance(
  instance_id: &str,
  model_id: &str,
  spawned_by: Option<&str>,
  children: Vec<ProcessorNode>,
) -> WorkflowInstance {
  let mut metadata = Metadata::new();
  if let Some(parent_id) = spawned_by {
    metadata.add(SPAWNED_BY_WORKFLOW, parent_id);
  }
  let mut root = task(model_id);
  root.sub_processors = children;
  WorkflowInstance {
    instance_id: instance_id.to_string(),
    model_id: model_id.to_string(),
    state: "Running".to_string(),
    metadata,
    root,
  }
}

/// W1 (root, model M1) has task T1 spawning W2; W2 (model M2) spawns
/// nothing further.
fn two_level_fleet() -> SnapshotAccessor {
  SnapshotAccessor::from_records([
    instance("W1", "M1", None, vec![spawning_task("T1", &["W2"])]),
    instance("W2", "M2", Some("W1"), vec![]),
  ])
}

/// W1 → (T1) → W2 → (T2) → W3.
fn three_level_fleet() -> SnapshotAccessor {
  SnapshotAccessor::from_records([
    instance("W1", "M1", None, vec![spawning_task("T1", &["W2"])]),
    instance("W2", "M2", Some("W1"), vec![spawning_task("T2", &["W3"])]),
    instance("W3", "M3", Some("W2"), vec![]),
  ])
}

/// A and B spawn each other, back-links included.
fn cyclic_fleet() -> SnapshotAccessor {
  SnapshotAccessor::from_records([
    instance("A", "MA", Some("B"), vec![spawning_task("TA", &["B"])]),
    instance("B", "MB", Some("A"), vec![spawning_task("TB", &["A"])]),
  ])
}

fn tracer(accessor: SnapshotAccessor) -> Tracer {
  Tracer::new(Arc::new(accessor))
}

/// Accessor wrapper that counts every fetch.
struct CountingAccessor {
  inner: SnapshotAccessor,
  fetches: AtomicUsize,
}

impl CountingAccessor {
  fn new(inner: SnapshotAccessor) -> Self {
    Self {
      inner,
      fetches: AtomicUsize::new(0),
    }
  }

  fn fetch_count(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl InstanceAccessor for CountingAccessor {
  async fn metadata(&self, instance_id: &str) -> Result<Metadata, EngineError> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.metadata(instance_id).await
  }

  async fn processor_tree(&self, instance_id: &str) -> Result<ProcessorNode, EngineError> {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.inner.processor_tree(instance_id).await
  }
}

/// Accessor that always reports a transient backend fault.
struct UnavailableAccessor;

#[async_trait]
impl InstanceAccessor for UnavailableAccessor {
  async fn metadata(&self, instance_id: &str) -> Result<Metadata, EngineError> {
    Err(EngineError::Unavailable {
      instance_id: instance_id.to_string(),
      message: "backend down".to_string(),
    })
  }

  async fn processor_tree(&self, instance_id: &str) -> Result<ProcessorNode, EngineError> {
    Err(EngineError::Unavailable {
      instance_id: instance_id.to_string(),
      message: "backend down".to_string(),
    })
  }
}

#[tokio::test]
async fn children_reports_one_level_of_spawns() {
  let tracer = tracer(two_level_fleet());
  let report = tracer
    .trace("W1", TraceMode::Children, CancellationToken::new())
    .await
    .unwrap();

  let lines = render(&report, "W1");
  assert_eq!(
    lines,
    vec![
      ">> [InstanceId = 'W1' : ModelId = 'M1' : State = 'Running']".to_string(),
      "  [InstanceId = 'W2' : ModelId = 'M2' : State = 'Running' : SpawnedBy = 'T1']".to_string(),
    ]
  );
}

#[tokio::test]
async fn complete_from_child_matches_children_from_root() {
  let tracer = tracer(two_level_fleet());

  let complete = tracer
    .trace("W2", TraceMode::Complete, CancellationToken::new())
    .await
    .unwrap();
  let children = tracer
    .trace("W1", TraceMode::Children, CancellationToken::new())
    .await
    .unwrap();

  assert_eq!(complete, children);
}

#[tokio::test]
async fn relatives_lists_ancestors_then_subject() {
  let tracer = tracer(three_level_fleet());
  let report = tracer
    .trace("W3", TraceMode::Relatives, CancellationToken::new())
    .await
    .unwrap();

  let TraceReport::Relatives { ancestors, subject } = &report else {
    panic!("expected a relatives report");
  };
  assert_eq!(ancestors.len(), 2);
  assert_eq!(ancestors[0].instance_id, "W1");
  assert_eq!(ancestors[0].spawned_by, None);
  assert_eq!(ancestors[1].instance_id, "W2");
  assert_eq!(ancestors[1].spawned_by.as_deref(), Some("T1"));
  assert_eq!(subject.instance_id, "W3");
  assert_eq!(subject.spawned_by.as_deref(), Some("T2"));

  let lines = render(&report, "W3");
  assert!(lines[0].starts_with("[InstanceId = 'W1'"));
  assert!(lines[1].starts_with("  [InstanceId = 'W2'"));
  assert!(lines[2].starts_with("    >> [InstanceId = 'W3'"));
}

#[tokio::test]
async fn relatives_degrades_when_spawn_link_is_unresolvable() {
  // W2 claims W1 as parent, but no task in W1 references W2.
  let accessor = SnapshotAccessor::from_records([
    instance("W1", "M1", None, vec![task("T1")]),
    instance("W2", "M2", Some("W1"), vec![]),
  ]);
  let tracer = tracer(accessor);

  let report = tracer
    .trace("W2", TraceMode::Relatives, CancellationToken::new())
    .await
    .unwrap();

  let TraceReport::Relatives { ancestors, subject } = report else {
    panic!("expected a relatives report");
  };
  assert_eq!(ancestors[0].instance_id, "W1");
  assert_eq!(subject.spawned_by, None);
}

#[tokio::test]
async fn combined_without_spawns_renders_like_children() {
  let accessor = SnapshotAccessor::from_records([instance("W2", "M2", None, vec![])]);
  let tracer = tracer(accessor);

  let combined = tracer
    .trace("W2", TraceMode::Combined, CancellationToken::new())
    .await
    .unwrap();
  let children = tracer
    .trace("W2", TraceMode::Children, CancellationToken::new())
    .await
    .unwrap();

  // No cross-instance attachment happens, so both are one root line.
  assert_eq!(render(&combined, "W2"), render(&children, "W2"));
}

#[tokio::test]
async fn combined_splices_spawned_trees_into_spawning_tasks() {
  let tracer = tracer(two_level_fleet());
  let report = tracer
    .trace("W1", TraceMode::Combined, CancellationToken::new())
    .await
    .unwrap();

  let TraceReport::Combined { instance_id, root } = &report else {
    panic!("expected a combined report");
  };
  assert_eq!(instance_id, "W1");

  // T1's sub-processors are now W2's tree instead of cross-instance ids.
  let spawning = &root.sub_processors[0];
  assert_eq!(spawning.model_id, "T1");
  assert_eq!(spawning.sub_processors.len(), 1);
  assert_eq!(spawning.sub_processors[0].model_id, "M2");

  let lines = render(&report, "W1");
  assert_eq!(
    lines,
    vec![
      ">> [InstanceId = 'W1' : ModelId = 'M1' : State = 'Running']".to_string(),
      "  [Task : ModelId = 'T1' : State = 'Running']".to_string(),
      "    [Task : ModelId = 'M2' : State = 'Running']".to_string(),
    ]
  );
}

#[tokio::test]
async fn cyclic_spawn_graph_terminates_children_descent() {
  let tracer = tracer(cyclic_fleet());
  let err = tracer
    .trace("A", TraceMode::Children, CancellationToken::new())
    .await
    .unwrap_err();

  match err {
    TraceError::SpawnCycleSuspected { instance_id, chain } => {
      assert_eq!(instance_id, "A");
      assert_eq!(chain, vec!["A".to_string(), "B".to_string()]);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn cyclic_spawn_graph_terminates_combined_descent() {
  let tracer = tracer(cyclic_fleet());
  let err = tracer
    .trace("A", TraceMode::Combined, CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(err, TraceError::SpawnCycleSuspected { .. }));
}

#[tokio::test]
async fn ancestry_of_a_root_instance_is_empty() {
  let accessor = two_level_fleet();
  let chain = resolve_ancestry(&accessor, "W1", 10, &CancellationToken::new())
    .await
    .unwrap();
  assert!(chain.is_empty());
}

#[tokio::test]
async fn ancestry_is_oldest_first_with_the_nearest_ancestor_last() {
  let accessor = three_level_fleet();
  let chain = resolve_ancestry(&accessor, "W3", 10, &CancellationToken::new())
    .await
    .unwrap();
  assert_eq!(chain, vec!["W1".to_string(), "W2".to_string()]);
}

#[tokio::test]
async fn cyclic_back_links_fail_the_ancestry_walk() {
  let accessor = cyclic_fleet();
  let err = resolve_ancestry(&accessor, "A", 5, &CancellationToken::new())
    .await
    .unwrap_err();

  match err {
    TraceError::AncestryCycleSuspected {
      start_instance_id,
      max_hops,
      chain,
    } => {
      assert_eq!(start_instance_id, "A");
      assert_eq!(max_hops, 5);
      assert_eq!(chain.len(), 5);
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn invalid_mode_is_rejected_before_any_fetch() {
  let accessor = Arc::new(CountingAccessor::new(two_level_fleet()));
  let mode = "bogus".parse::<TraceMode>();

  assert!(matches!(mode, Err(TraceError::InvalidMode { ref token }) if token == "bogus"));
  assert_eq!(accessor.fetch_count(), 0);
}

#[tokio::test]
async fn missing_instance_aborts_the_whole_trace() {
  // W1's task references W2, which has no record.
  let accessor =
    SnapshotAccessor::from_records([instance("W1", "M1", None, vec![spawning_task("T1", &["W2"])])]);
  let tracer = tracer(accessor);

  let err = tracer
    .trace("W1", TraceMode::Children, CancellationToken::new())
    .await
    .unwrap_err();

  match err {
    TraceError::InstanceNotFound { instance_id } => assert_eq!(instance_id, "W2"),
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn cancelled_token_aborts_before_any_fetch() {
  let accessor = Arc::new(CountingAccessor::new(two_level_fleet()));
  let tracer = Tracer::new(accessor.clone());

  let cancel = CancellationToken::new();
  cancel.cancel();

  let err = tracer.trace("W1", TraceMode::Children, cancel).await.unwrap_err();
  assert!(matches!(err, TraceError::Cancelled));
  assert_eq!(accessor.fetch_count(), 0);
}

#[tokio::test]
async fn engine_unavailability_propagates_as_a_trace_failure() {
  let tracer = Tracer::new(Arc::new(UnavailableAccessor));
  let err = tracer
    .trace("W1", TraceMode::Complete, CancellationToken::new())
    .await
    .unwrap_err();

  assert!(matches!(err, TraceError::EngineUnavailable { .. }));
}
