//! Run orchestration.
//!
//! ## Pipeline (in order):
//! 1. Deduplicate the corpus over the configured version range
//! 2. Group every configured slot over the reduced corpus
//! 3. Abort on corpus-level fatals; collect per-slot fatals
//! 4. Build the manifest (stale alias check) and render it
//! 5. Dispatch generation for group representatives without an artifact
//!
//! Nothing is written by this module: the caller persists the rendered
//! manifest, and artifacts go through the supplied memo table.

#![allow(clippy::result_large_err)]

use std::time::Instant;

use wiregroup_core::dispatch::{
    dispatch_groups, ArtifactMemo, DispatchOutcome, DispatchRecord, SourceGenerator,
};
use wiregroup_core::errors::{ExError, ExErrorKind};
use wiregroup_core::{
    build_manifest, deduplicate, group_slot, manifest_digest, render_manifest, Deduplicated,
    Equivalence, EquivalenceChecker, Manifest, SlotGroups, VersionCorpus,
};
use wiregroup_core::{log_op_end, log_op_error, log_op_start};
use wiregroup_core_types::RunId;
use wiregroup_store::{Result, SlotConfig};

/// Manifest computed from a corpus and a slot configuration
#[derive(Debug, Clone)]
pub struct ComputedManifest {
    pub dedup: Deduplicated,
    pub slot_groups: Vec<SlotGroups>,
    pub manifest: Manifest,
    /// TOML text, byte-identical across runs over unchanged inputs
    pub rendered: String,
    /// SHA-256 of `rendered`
    pub digest: String,
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub versions_considered: usize,
    pub alias_count: usize,
    pub slot_count: usize,
    pub group_count: usize,
    pub generated: usize,
    pub existing: usize,
    pub gaps: usize,
    /// Dispatch outcome of every group, in manifest order
    pub records: Vec<DispatchRecord>,
}

impl RunReport {
    fn new(run_id: RunId, computed: &ComputedManifest, records: Vec<DispatchRecord>) -> Self {
        let count = |pred: fn(&DispatchOutcome) -> bool| {
            records.iter().filter(|r| pred(&r.outcome)).count()
        };
        Self {
            run_id,
            versions_considered: computed.dedup.considered.len(),
            alias_count: computed.dedup.aliases.len(),
            slot_count: computed.slot_groups.len(),
            group_count: computed.manifest.group_count(),
            generated: count(DispatchOutcome::is_generated),
            existing: count(|o| matches!(o, DispatchOutcome::Existing(_))),
            gaps: count(DispatchOutcome::is_gap),
            records,
        }
    }

    /// Groups left without an artifact
    pub fn gap_records(&self) -> impl Iterator<Item = &DispatchRecord> {
        self.records.iter().filter(|r| r.outcome.is_gap())
    }
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub computed: ComputedManifest,
    pub report: RunReport,
}

/// Deduplicate, group every slot and build the manifest
///
/// # Errors
///
/// - Corpus-level fatals (inconsistency, missing base version, cycles)
///   abort at the first occurrence
/// - Per-slot fatals are collected; once every slot has been grouped the
///   call fails with a `SlotFailures` error listing each of them
/// - `StaleAlias` when the alias table does not match the reduced corpus
pub fn compute_manifest(corpus: &VersionCorpus, config: &SlotConfig) -> Result<ComputedManifest> {
    let dedup = deduplicate_range(corpus, config)?;
    let slot_groups = {
        let checker = EquivalenceChecker::new(&dedup.corpus, config.registry.types());
        group_slots(&dedup.corpus, config, &checker)?
    };
    finish_manifest(dedup, slot_groups)
}

/// [`compute_manifest`] with a caller-supplied equivalence relation
///
/// # Errors
///
/// Same as [`compute_manifest`].
pub fn compute_manifest_with<E: Equivalence + ?Sized>(
    corpus: &VersionCorpus,
    config: &SlotConfig,
    checker: &E,
) -> Result<ComputedManifest> {
    let dedup = deduplicate_range(corpus, config)?;
    let slot_groups = group_slots(&dedup.corpus, config, checker)?;
    finish_manifest(dedup, slot_groups)
}

fn deduplicate_range(corpus: &VersionCorpus, config: &SlotConfig) -> Result<Deduplicated> {
    deduplicate(corpus, config.min_version, config.max_version).map_err(ExError::from)
}

fn group_slots<E: Equivalence + ?Sized>(
    reduced: &VersionCorpus,
    config: &SlotConfig,
    checker: &E,
) -> Result<Vec<SlotGroups>> {
    let mut slot_groups = Vec::with_capacity(config.registry.len());
    let mut failures = Vec::new();

    for slot in config.registry.slots() {
        match group_slot(reduced, checker, slot) {
            Ok(groups) => slot_groups.push(groups),
            Err(e) => {
                let err = ExError::from(e).with_op("group_slot");
                if err.kind().is_corpus_fatal() {
                    return Err(err.with_slot(slot.label()));
                }
                failures.push(err.with_slot(slot.label()));
            }
        }
    }

    if !failures.is_empty() {
        return Err(ExError::new(ExErrorKind::SlotFailures)
            .with_op("compute_manifest")
            .with_message(format!("{} slot(s) failed to group", failures.len()))
            .with_failures(failures));
    }

    Ok(slot_groups)
}

fn finish_manifest(dedup: Deduplicated, slot_groups: Vec<SlotGroups>) -> Result<ComputedManifest> {
    let manifest = build_manifest(&dedup, &slot_groups).map_err(ExError::from)?;
    let rendered = render_manifest(&manifest).map_err(ExError::from)?;
    let digest = manifest_digest(&rendered);

    Ok(ComputedManifest {
        dedup,
        slot_groups,
        manifest,
        rendered,
        digest,
    })
}

/// Run the full pipeline: compute the manifest, then dispatch generation
///
/// # Errors
///
/// Everything [`compute_manifest`] rejects, plus memo table read or write
/// failures. Generator problems never fail a run; they are reported as gaps.
pub fn run_pipeline(
    corpus: &VersionCorpus,
    config: &SlotConfig,
    memo: &mut dyn ArtifactMemo,
    generator: Option<&dyn SourceGenerator>,
) -> Result<RunOutcome> {
    let run_id = RunId::new();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    log_op_start!(
        "run",
        version_count = corpus.len(),
        slot_count = config.registry.len()
    );
    let start = Instant::now();

    let result = run_pipeline_impl(run_id.clone(), corpus, config, memo, generator).map_err(|e| {
        let e = e.with_run_id(run_id.clone());
        log_op_error!("run", e, duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(
        "run",
        duration_ms = start.elapsed().as_millis() as u64,
        group_count = result.report.group_count,
        generated = result.report.generated,
        gaps = result.report.gaps
    );

    Ok(result)
}

fn run_pipeline_impl(
    run_id: RunId,
    corpus: &VersionCorpus,
    config: &SlotConfig,
    memo: &mut dyn ArtifactMemo,
    generator: Option<&dyn SourceGenerator>,
) -> Result<RunOutcome> {
    let computed = compute_manifest(corpus, config)?;
    let records = dispatch_groups(&computed.dedup.corpus, &computed.slot_groups, memo, generator)?;
    let report = RunReport::new(run_id, &computed, records);

    Ok(RunOutcome { computed, report })
}
