//! Rendering of trace reports into indented text lines.
//!
//! Pure formatting, no I/O: a report in, an ordered sequence of lines
//! out. One line per node, two spaces of indentation per depth, and a
//! `>> ` marker on the line for the originally queried instance.

use sextant_instance::ProcessorNode;

use crate::report::{AncestorLine, InstanceReport, TraceReport};

const INDENT: &str = "  ";
const MARKER: &str = ">> ";

/// Render a trace report.
///
/// `queried_instance_id` is the id the trace was requested for; its
/// line carries the marker, wherever it lands in the report.
pub fn render(report: &TraceReport, queried_instance_id: &str) -> Vec<String> {
  let mut lines = Vec::new();
  match report {
    TraceReport::Tree(tree) => {
      render_instance(tree, 0, queried_instance_id, &mut lines);
    }
    TraceReport::Relatives { ancestors, subject } => {
      for (depth, ancestor) in ancestors.iter().enumerate() {
        lines.push(line(
          depth,
          ancestor.instance_id == queried_instance_id,
          &ancestor_body(ancestor),
        ));
      }
      // The subject's report starts one level below the last ancestor.
      render_instance(subject, ancestors.len(), queried_instance_id, &mut lines);
    }
    TraceReport::Combined { instance_id, root } => {
      lines.push(line(
        0,
        instance_id == queried_instance_id,
        &instance_body(instance_id, &root.model_id, &root.state, None),
      ));
      render_composite_children(root, 1, &mut lines);
    }
  }
  lines
}

fn render_instance(
  report: &InstanceReport,
  depth: usize,
  queried_instance_id: &str,
  lines: &mut Vec<String>,
) {
  lines.push(line(
    depth,
    report.instance_id == queried_instance_id,
    &instance_body(
      &report.instance_id,
      &report.model_id,
      &report.state,
      report.spawned_by.as_deref(),
    ),
  ));
  for child in &report.children {
    render_instance(child, depth + 1, queried_instance_id, lines);
  }
}

/// Render a composite node's interior. Interior nodes belong to some
/// fetched instance but carry no id of their own, so their lines name
/// the node kind instead.
fn render_composite(node: &ProcessorNode, depth: usize, lines: &mut Vec<String>) {
  lines.push(line(
    depth,
    false,
    &format!(
      "[{} : ModelId = '{}' : State = '{}']",
      node.kind, node.model_id, node.state
    ),
  ));
  render_composite_children(node, depth + 1, lines);
}

fn render_composite_children(node: &ProcessorNode, depth: usize, lines: &mut Vec<String>) {
  if let Some(pre) = node.preconditions.as_deref() {
    render_composite(pre, depth, lines);
  }
  if let Some(post) = node.postconditions.as_deref() {
    render_composite(post, depth, lines);
  }
  for child in &node.sub_processors {
    render_composite(child, depth, lines);
  }
}

fn ancestor_body(ancestor: &AncestorLine) -> String {
  instance_body(
    &ancestor.instance_id,
    &ancestor.model_id,
    &ancestor.state,
    ancestor.spawned_by.as_deref(),
  )
}

fn instance_body(
  instance_id: &str,
  model_id: &str,
  state: &str,
  spawned_by: Option<&str>,
) -> String {
  match spawned_by {
    Some(task_model_id) => format!(
      "[InstanceId = '{instance_id}' : ModelId = '{model_id}' : State = '{state}' : SpawnedBy = '{task_model_id}']"
    ),
    None => format!("[InstanceId = '{instance_id}' : ModelId = '{model_id}' : State = '{state}']"),
  }
}

fn line(depth: usize, marked: bool, body: &str) -> String {
  let indent = INDENT.repeat(depth);
  if marked {
    format!("{indent}{MARKER}{body}")
  } else {
    format!("{indent}{body}")
  }
}
