use sextant_instance::ProcessorNode;

/// Report for one instance and the instances it (transitively) spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceReport {
  pub instance_id: String,
  pub model_id: String,
  pub state: String,

  /// Model id of the task in the parent instance that spawned this one.
  /// `None` on the report's root instance.
  pub spawned_by: Option<String>,

  /// Reports for instances spawned from within this one, in the order
  /// their spawning tasks appear in the processor tree.
  pub children: Vec<InstanceReport>,
}

/// One entry of the ancestor listing in RELATIVES mode, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct AncestorLine {
  pub instance_id: String,
  pub model_id: String,
  pub state: String,

  /// Model id of the spawning task found in the previous ancestor's
  /// tree. `None` on the first ancestor, and when the spawn link could
  /// not be resolved by search (graceful degradation).
  pub spawned_by: Option<String>,
}

/// Structured result of one trace call. Rendering to text is a separate,
/// pure step (`render`).
#[derive(Debug, Clone, PartialEq)]
pub enum TraceReport {
  /// CHILDREN and COMPLETE: a rooted descendant report.
  Tree(InstanceReport),

  /// RELATIVES: the ancestor listing, then the queried instance's own
  /// descendant report.
  Relatives {
    ancestors: Vec<AncestorLine>,
    subject: InstanceReport,
  },

  /// COMBINED: one composite tree with every cross-instance spawn link
  /// replaced by the spawned instance's (recursively combined) tree.
  /// The composite is owned by this report; accessor trees are never
  /// mutated in place.
  Combined {
    instance_id: String,
    root: ProcessorNode,
  },
}
