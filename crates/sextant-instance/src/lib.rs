//! Sextant Instance Model
//!
//! This crate provides the data model for a materialized workflow instance:
//! the recursive `ProcessorNode` tree the execution engine reports for each
//! instance, the multi-valued `Metadata` attached to instances and nodes,
//! and the pure tree-search functions used by the tracer.
//!
//! Instances reference each other only by id, through the spawn-link
//! metadata keys. Nothing in this crate performs I/O; resolving an id to
//! another instance is the accessor's job (`sextant-engine`).

mod instance;
mod metadata;
mod node;
mod walk;

pub use instance::WorkflowInstance;
pub use metadata::{Metadata, SPAWNED_BY_WORKFLOW, SPAWNED_WORKFLOWS};
pub use node::{NodeKind, ProcessorNode};
pub use walk::{collect_tasks, find_spawning_node};
