use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sextant_engine::InstanceAccessor;
use sextant_instance::{ProcessorNode, collect_tasks, find_spawning_node};

use crate::ancestry::{DEFAULT_MAX_ANCESTRY_HOPS, resolve_ancestry};
use crate::error::TraceError;
use crate::mode::TraceMode;
use crate::report::{AncestorLine, InstanceReport, TraceReport};

/// Configuration for the tracer.
#[derive(Debug, Clone)]
pub struct TracerConfig {
  /// Hop bound for the ancestry back-link walk.
  pub max_ancestry_hops: usize,
}

impl Default for TracerConfig {
  fn default() -> Self {
    Self {
      max_ancestry_hops: DEFAULT_MAX_ANCESTRY_HOPS,
    }
  }
}

/// Traces spawn lineage across workflow instances.
///
/// Each `trace` call is stateless and self-contained: trees are fetched
/// fresh from the accessor, analyzed, and discarded with the returned
/// report. The accessor is the only shared resource and is read-only;
/// the tracer needs no locking of its own.
pub struct Tracer {
  accessor: Arc<dyn InstanceAccessor>,
  config: TracerConfig,
}

impl Tracer {
  /// Create a tracer with the default configuration.
  pub fn new(accessor: Arc<dyn InstanceAccessor>) -> Self {
    Self::with_config(accessor, TracerConfig::default())
  }

  pub fn with_config(accessor: Arc<dyn InstanceAccessor>, config: TracerConfig) -> Self {
    Self { accessor, config }
  }

  /// Run one trace.
  ///
  /// Any `InstanceNotFound` or `EngineUnavailable` encountered anywhere
  /// in the traversal aborts the whole trace. The cancellation token is
  /// checked before every accessor fetch; the caller owns deadlines.
  pub async fn trace(
    &self,
    instance_id: &str,
    mode: TraceMode,
    cancel: CancellationToken,
  ) -> Result<TraceReport, TraceError> {
    debug!(instance_id, %mode, "starting trace");
    match mode {
      TraceMode::Children => {
        let report = self
          .descend(instance_id, None, &mut Vec::new(), &cancel)
          .await?;
        Ok(TraceReport::Tree(report))
      }
      TraceMode::Complete => self.trace_complete(instance_id, &cancel).await,
      TraceMode::Relatives => self.trace_relatives(instance_id, &cancel).await,
      TraceMode::Combined => {
        let root = self.combine(instance_id, &mut Vec::new(), &cancel).await?;
        Ok(TraceReport::Combined {
          instance_id: instance_id.to_string(),
          root,
        })
      }
    }
  }

  /// COMPLETE: rerun CHILDREN from the oldest ancestor (or the queried
  /// instance itself when it is a root).
  async fn trace_complete(
    &self,
    instance_id: &str,
    cancel: &CancellationToken,
  ) -> Result<TraceReport, TraceError> {
    let ancestors = resolve_ancestry(
      self.accessor.as_ref(),
      instance_id,
      self.config.max_ancestry_hops,
      cancel,
    )
    .await?;
    let root_id = ancestors.first().map(String::as_str).unwrap_or(instance_id);

    let report = self.descend(root_id, None, &mut Vec::new(), cancel).await?;
    Ok(TraceReport::Tree(report))
  }

  /// RELATIVES: list ancestors oldest-first, then the queried instance's
  /// own descendant report.
  async fn trace_relatives(
    &self,
    instance_id: &str,
    cancel: &CancellationToken,
  ) -> Result<TraceReport, TraceError> {
    let ancestor_ids = resolve_ancestry(
      self.accessor.as_ref(),
      instance_id,
      self.config.max_ancestry_hops,
      cancel,
    )
    .await?;

    let mut ancestors = Vec::with_capacity(ancestor_ids.len());
    let mut previous_tree: Option<ProcessorNode> = None;
    for ancestor_id in &ancestor_ids {
      let tree = self.fetch_tree(ancestor_id, cancel).await?;
      let spawned_by = previous_tree
        .as_ref()
        .and_then(|prev| self.resolve_spawned_by(prev, ancestor_id));
      ancestors.push(AncestorLine {
        instance_id: ancestor_id.clone(),
        model_id: tree.model_id.clone(),
        state: tree.state.clone(),
        spawned_by,
      });
      previous_tree = Some(tree);
    }

    // The queried instance's own label comes from its nearest ancestor's
    // tree, with the same graceful degradation as the ancestor lines.
    let subject_spawned_by = previous_tree
      .as_ref()
      .and_then(|prev| self.resolve_spawned_by(prev, instance_id));

    let subject = self
      .descend(instance_id, subject_spawned_by, &mut Vec::new(), cancel)
      .await?;
    Ok(TraceReport::Relatives { ancestors, subject })
  }

  /// Find the task in `parent_tree` that spawned `child_instance_id`.
  ///
  /// A child can claim a parent whose tree has no matching spawning
  /// task; partial information beats aborting, so the line is rendered
  /// without a spawned-by label.
  fn resolve_spawned_by(
    &self,
    parent_tree: &ProcessorNode,
    child_instance_id: &str,
  ) -> Option<String> {
    match find_spawning_node(parent_tree, child_instance_id) {
      Some(task) => Some(task.model_id.clone()),
      None => {
        warn!(
          child_instance_id,
          "no spawning task found in claimed parent, omitting spawned-by label"
        );
        None
      }
    }
  }

  /// CHILDREN descent: fetch the instance's tree, then recurse into
  /// every instance id its tasks recorded under `SpawnedWorkflows`.
  ///
  /// `chain` is the path of instance ids currently being descended;
  /// revisiting one means the spawn graph loops, which aborts the trace
  /// rather than recursing forever.
  fn descend<'a>(
    &'a self,
    instance_id: &'a str,
    spawned_by: Option<String>,
    chain: &'a mut Vec<String>,
    cancel: &'a CancellationToken,
  ) -> BoxFuture<'a, Result<InstanceReport, TraceError>> {
    Box::pin(async move {
      self.enter(instance_id, chain)?;
      let tree = self.fetch_tree(instance_id, cancel).await?;

      let mut children = Vec::new();
      for task in collect_tasks(&tree) {
        let Some(spawned) = task.spawned_instances() else {
          continue;
        };
        for child_id in spawned {
          let child = self
            .descend(child_id, Some(task.model_id.clone()), chain, cancel)
            .await?;
          children.push(child);
        }
      }

      chain.pop();
      Ok(InstanceReport {
        instance_id: instance_id.to_string(),
        model_id: tree.model_id,
        state: tree.state,
        spawned_by,
        children,
      })
    })
  }

  /// COMBINED: fetch the instance's tree and splice the (recursively
  /// combined) trees of spawned instances into the spawning tasks.
  fn combine<'a>(
    &'a self,
    instance_id: &'a str,
    chain: &'a mut Vec<String>,
    cancel: &'a CancellationToken,
  ) -> BoxFuture<'a, Result<ProcessorNode, TraceError>> {
    Box::pin(async move {
      self.enter(instance_id, chain)?;
      let mut tree = self.fetch_tree(instance_id, cancel).await?;
      self.attach_spawned(&mut tree, chain, cancel).await?;
      chain.pop();
      Ok(tree)
    })
  }

  /// Walk a composite tree under construction, replacing each spawning
  /// task's `sub_processors` with the fetched trees of its spawned
  /// instances. The walk operates on the tracer's own copy; accessor
  /// trees are never mutated.
  fn attach_spawned<'a>(
    &'a self,
    node: &'a mut ProcessorNode,
    chain: &'a mut Vec<String>,
    cancel: &'a CancellationToken,
  ) -> BoxFuture<'a, Result<(), TraceError>> {
    Box::pin(async move {
      if let Some(pre) = node.preconditions.as_deref_mut() {
        self.attach_spawned(pre, chain, cancel).await?;
      }
      if let Some(post) = node.postconditions.as_deref_mut() {
        self.attach_spawned(post, chain, cancel).await?;
      }

      let spawned: Vec<String> = node
        .spawned_instances()
        .map(<[String]>::to_vec)
        .unwrap_or_default();

      if node.is_task() && !spawned.is_empty() {
        debug!(
          task_model_id = %node.model_id,
          count = spawned.len(),
          "attaching spawned instance trees"
        );
        let mut combined = Vec::with_capacity(spawned.len());
        for child_id in &spawned {
          combined.push(self.combine(child_id, chain, cancel).await?);
        }
        node.sub_processors = combined;
      } else {
        for child in &mut node.sub_processors {
          self.attach_spawned(child, chain, cancel).await?;
        }
      }
      Ok(())
    })
  }

  /// Push an instance onto the descent path, failing on a revisit.
  fn enter(&self, instance_id: &str, chain: &mut Vec<String>) -> Result<(), TraceError> {
    if chain.iter().any(|id| id == instance_id) {
      return Err(TraceError::SpawnCycleSuspected {
        instance_id: instance_id.to_string(),
        chain: chain.clone(),
      });
    }
    chain.push(instance_id.to_string());
    Ok(())
  }

  async fn fetch_tree(
    &self,
    instance_id: &str,
    cancel: &CancellationToken,
  ) -> Result<ProcessorNode, TraceError> {
    if cancel.is_cancelled() {
      return Err(TraceError::Cancelled);
    }
    debug!(instance_id, "fetching processor tree");
    Ok(self.accessor.processor_tree(instance_id).await?)
  }
}
