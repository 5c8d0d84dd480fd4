//! Ancestry resolution along `SpawnedByWorkflow` back-links.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use sextant_engine::InstanceAccessor;
use sextant_instance::SPAWNED_BY_WORKFLOW;

use crate::error::TraceError;

/// Default hop bound for the back-link walk.
pub const DEFAULT_MAX_ANCESTRY_HOPS: usize = 10_000;

/// Walk the spawned-by chain from `start_instance_id` to the root.
///
/// Returns ancestor instance ids oldest-first, excluding the starting
/// instance itself; a root instance yields an empty sequence. Back-links
/// are ids with no integrity guarantee, so the walk enforces `max_hops`
/// and fails with `AncestryCycleSuspected` (carrying the chain observed
/// so far, oldest-first) instead of looping on a cyclic chain.
pub async fn resolve_ancestry(
  accessor: &dyn InstanceAccessor,
  start_instance_id: &str,
  max_hops: usize,
  cancel: &CancellationToken,
) -> Result<Vec<String>, TraceError> {
  // Collected nearest-first while walking, reversed before returning.
  let mut chain: Vec<String> = Vec::new();
  let mut current = start_instance_id.to_string();

  loop {
    if cancel.is_cancelled() {
      return Err(TraceError::Cancelled);
    }

    let metadata = accessor.metadata(&current).await?;
    let Some(parent) = metadata.first(SPAWNED_BY_WORKFLOW) else {
      break;
    };

    if chain.len() >= max_hops {
      chain.reverse();
      return Err(TraceError::AncestryCycleSuspected {
        start_instance_id: start_instance_id.to_string(),
        max_hops,
        chain,
      });
    }

    debug!(instance_id = %current, parent_id = %parent, "following spawned-by link");
    chain.push(parent.to_string());
    current = parent.to_string();
  }

  chain.reverse();
  Ok(chain)
}
