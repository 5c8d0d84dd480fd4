//! Sextant Trace
//!
//! This crate reconstructs the ancestor/descendant structure induced by
//! workflow instances spawning other instances, and reports it under
//! four modes.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Tracer                              │
//! │  trace(instance_id, mode, cancel) → TraceReport             │
//! │  - CHILDREN: descendant report from the queried instance    │
//! │  - COMPLETE: descendant report from the oldest ancestor     │
//! │  - RELATIVES: ancestor listing + descendant report          │
//! │  - COMBINED: one composite tree, spawn links spliced in     │
//! └─────────────────────────────────────────────────────────────┘
//!                │                          │
//!                ▼                          ▼
//!      resolve_ancestry             InstanceAccessor
//!      (spawned-by walk,            (sextant-engine)
//!       hop-bounded)
//! ```
//!
//! Reports are structured values; `render` turns them into indented
//! text lines as a separate pure step.

mod ancestry;
mod error;
mod mode;
mod render;
mod report;
mod tracer;

pub use ancestry::{DEFAULT_MAX_ANCESTRY_HOPS, resolve_ancestry};
pub use error::TraceError;
pub use mode::TraceMode;
pub use render::render;
pub use report::{AncestorLine, InstanceReport, TraceReport};
pub use tracer::{Tracer, TracerConfig};
