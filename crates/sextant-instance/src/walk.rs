//! Pure recursive search over a processor tree.
//!
//! Both functions visit branches in a fixed, documented order:
//! preconditions, then postconditions, then sub-processors in sequence.
//! That order is a contract the tracer relies on, not an accident of
//! call order.

use crate::node::{NodeKind, ProcessorNode};

/// Find the task node that spawned `child_instance_id`.
///
/// Depth-first with first-match short-circuit. A node matches only when
/// it is a task with no sub-processors whose `SpawnedWorkflows` values
/// contain the id. Tasks with sub-processors never match, even if their
/// metadata carries spawn links: a composite task delegates to its
/// children rather than spawning workflows itself.
pub fn find_spawning_node<'a>(
  root: &'a ProcessorNode,
  child_instance_id: &str,
) -> Option<&'a ProcessorNode> {
  let spawns_child = root
    .spawned_instances()
    .is_some_and(|ids| ids.iter().any(|id| id == child_instance_id));

  if root.is_task() && root.sub_processors.is_empty() && spawns_child {
    return Some(root);
  }

  // Ordered search strategies: preconditions, postconditions, children.
  root
    .preconditions
    .as_deref()
    .into_iter()
    .chain(root.postconditions.as_deref())
    .chain(root.sub_processors.iter())
    .find_map(|branch| find_spawning_node(branch, child_instance_id))
}

/// Collect every task node under `root` in pre-order.
///
/// Visits the node itself, then preconditions, postconditions, and
/// sub-processors in sequence. Condition-group nodes are traversed but
/// not collected.
pub fn collect_tasks(root: &ProcessorNode) -> Vec<&ProcessorNode> {
  let mut tasks = Vec::new();
  collect_into(root, &mut tasks);
  tasks
}

fn collect_into<'a>(node: &'a ProcessorNode, tasks: &mut Vec<&'a ProcessorNode>) {
  if node.kind == NodeKind::Task {
    tasks.push(node);
  }
  if let Some(pre) = node.preconditions.as_deref() {
    collect_into(pre, tasks);
  }
  if let Some(post) = node.postconditions.as_deref() {
    collect_into(post, tasks);
  }
  for child in &node.sub_processors {
    collect_into(child, tasks);
  }
}
