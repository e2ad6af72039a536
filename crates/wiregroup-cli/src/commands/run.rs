//! Run command
//!
//! Usage: wiregroup run --data-dir <DIR> --slots <FILE> --manifest <FILE> --artifacts <DIR>

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use wiregroup_core::dispatch::{DispatchOutcome, SourceGenerator};
use wiregroup_engine::{run_pipeline, CommandGenerator};
use wiregroup_store::{write_manifest, FsArtifactStore};

use super::InputArgs;

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Manifest output path
    #[arg(long, default_value = "packets.toml")]
    pub manifest: PathBuf,

    /// Root directory of generated artifacts
    #[arg(long, default_value = "generated")]
    pub artifacts: PathBuf,

    /// Generator program; without it every missing artifact is reported as a gap
    #[arg(long)]
    pub generator: Option<PathBuf>,

    /// Argument passed to the generator (repeatable)
    #[arg(long = "generator-arg", requires = "generator")]
    pub generator_args: Vec<String>,
}

/// Execute run command
pub fn execute(args: RunArgs) -> anyhow::Result<()> {
    let (loaded, config) = args.input.load()?;

    let generator = args
        .generator
        .as_ref()
        .map(|program| CommandGenerator::from_env(program, args.generator_args.clone()));
    let mut store = FsArtifactStore::new(&args.artifacts);

    let outcome = run_pipeline(
        &loaded.corpus,
        &config,
        &mut store,
        generator.as_ref().map(|g| g as &dyn SourceGenerator),
    )?;

    write_manifest(&args.manifest, &outcome.computed.rendered)
        .with_context(|| format!("writing manifest {}", args.manifest.display()))?;

    let report = &outcome.report;
    println!(
        "Manifest written: {} (digest {})",
        args.manifest.display(),
        outcome.computed.digest
    );
    println!(
        "  versions: {} considered, {} aliases",
        report.versions_considered, report.alias_count
    );
    println!("  slots: {}, groups: {}", report.slot_count, report.group_count);
    println!(
        "  artifacts: {} generated, {} existing, {} gaps",
        report.generated, report.existing, report.gaps
    );
    for record in report.gap_records() {
        if let DispatchOutcome::Gap { reason, .. } = &record.outcome {
            println!("  gap: {} v{}: {}", record.key.slot, record.key.version, reason);
        }
    }

    Ok(())
}
