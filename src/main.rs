use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use sextant_engine::SnapshotAccessor;
use sextant_trace::{TraceMode, Tracer, render};

/// Sextant - trace spawn lineage across workflow instances
#[derive(Parser)]
#[command(name = "sextant")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Trace workflows connected to the workflow with the given instance id
  Trace {
    /// The workflow instance id to trace from
    instance_id: String,

    /// Trace mode: children, complete, relatives, or combined
    #[arg(long, default_value = "children")]
    mode: String,

    /// Path to a JSON snapshot file holding the instance records
    #[arg(long)]
    snapshot: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Trace {
      instance_id,
      mode,
      snapshot,
    }) => run_trace(instance_id, mode, snapshot),
    None => {
      println!("sextant - use --help to see available commands");
      Ok(())
    }
  }
}

fn run_trace(instance_id: String, mode: String, snapshot: PathBuf) -> Result<()> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_trace_async(instance_id, mode, snapshot).await })
}

async fn run_trace_async(instance_id: String, mode: String, snapshot: PathBuf) -> Result<()> {
  // An invalid mode is rejected before the snapshot is even read.
  let mode: TraceMode = mode.parse()?;

  let accessor = SnapshotAccessor::load(&snapshot)
    .await
    .with_context(|| format!("failed to load snapshot file: {}", snapshot.display()))?;

  eprintln!("Loaded snapshot with {} instances", accessor.len());

  let tracer = Tracer::new(Arc::new(accessor));
  let cancel = CancellationToken::new();
  let report = tracer
    .trace(&instance_id, mode, cancel)
    .await
    .with_context(|| format!("trace failed for instance '{instance_id}'"))?;

  println!("Workflow Trace [InstanceId = '{instance_id}']");
  for line in render(&report, &instance_id) {
    println!("{line}");
  }

  Ok(())
}
