//! Sextant Engine Accessor
//!
//! The tracer never talks to the workflow execution engine directly; it
//! goes through the `InstanceAccessor` trait defined here. The trait is
//! the full contract the tracer needs: fetch an instance's metadata, and
//! fetch its processor tree.
//!
//! `SnapshotAccessor` is the bundled implementation: a read-only map of
//! instance records, built programmatically or loaded from a JSON
//! snapshot file. A live engine client would implement the same trait.

mod accessor;
mod error;
mod snapshot;

pub use accessor::InstanceAccessor;
pub use error::EngineError;
pub use snapshot::{SnapshotAccessor, SnapshotError};
