//! The chromosome-parallel orchestrator and the file-level entry point.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;
use tempfile::NamedTempFile;

use svphaser_core::utils::vcf_stem;
use svphaser_core::{CallRecord, WorkerOpts};
use svphaser_io::{EvidenceOpener, VariantStore};

use crate::errors::{PhasingError, Result};
use crate::filter::depth_filter;
use crate::settings::PhaseSettings;
use crate::worker::phase_chromosome;
use crate::writing::{AnnotationReport, annotate_vcf, check_annotation_keys, write_call_table};

/// Validated, immutable configuration of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub opts: WorkerOpts,
    pub threads: usize,
    pub progress: bool,
}

/// Merged calls, split by the depth filter. Both sides are in chromosome
/// discovery order, then file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseResult {
    pub kept: Vec<CallRecord>,
    pub dropped: Vec<CallRecord>,
}

///
/// Phase every chromosome of `store` in parallel and merge the results.
///
/// One unit of work per chromosome runs on a dedicated rayon pool of
/// `config.threads` workers. Results are collected in discovery order whatever
/// order the units finish in, so two runs over the same input agree exactly.
/// The first failing unit fails the run and nothing is returned.
///
pub fn run_phasing<O: EvidenceOpener>(
    store: &VariantStore,
    opener: &O,
    config: &RunConfig,
) -> Result<PhaseResult> {
    let chroms = store.chromosomes()?;
    info!(
        "Phasing {} chromosomes with {} workers",
        chroms.len(),
        config.threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|e| PhasingError::ThreadPool(e.to_string()))?;

    let bar = if config.progress {
        ProgressBar::new(chroms.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let per_chrom = pool.install(|| {
        chroms
            .par_iter()
            .map(|chrom| {
                let calls = phase_chromosome(chrom, store, opener, &config.opts).map_err(
                    |source| PhasingError::Unit {
                        chrom: chrom.clone(),
                        source,
                    },
                )?;
                info!("chr {:<6} phased {:>5} SVs", chrom, calls.len());
                bar.inc(1);
                Ok(calls)
            })
            .collect::<Result<Vec<Vec<CallRecord>>>>()
    })?;
    bar.finish_and_clear();

    let merged: Vec<CallRecord> = per_chrom.into_iter().flatten().collect();
    let total = merged.len();
    let (kept, dropped) = depth_filter(merged, config.opts.min_support());
    info!(
        "Depth filter removed {} of {} SVs (min_support={})",
        dropped.len(),
        total,
        config.opts.min_support()
    );

    Ok(PhaseResult { kept, dropped })
}

/// Where a run wrote its outputs, and what went into them.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutputs {
    pub phased_vcf: PathBuf,
    pub phased_csv: PathBuf,
    pub dropped_csv: PathBuf,
    pub kept: usize,
    pub dropped: usize,
    pub annotation: AnnotationReport,
}

/// Write into a temporary file next to its destination.
fn stage<F>(out_dir: &Path, write: F) -> Result<NamedTempFile>
where
    F: FnOnce(&mut BufWriter<&mut fs::File>) -> Result<()>,
{
    let mut tmp = NamedTempFile::new_in(out_dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        write(&mut w)?;
        w.flush()?;
    }
    Ok(tmp)
}

fn commit(tmp: NamedTempFile, path: &Path) -> Result<()> {
    tmp.persist(path).map_err(|e| PhasingError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

///
/// Move staged files to their destinations in order. If one fails, the ones
/// already moved are removed again so no partial set is left behind.
///
fn commit_all(staged: Vec<(NamedTempFile, &Path)>) -> Result<()> {
    let mut committed: Vec<&Path> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        if let Err(e) = commit(tmp, path) {
            for done in committed {
                if let Err(rm) = fs::remove_file(done) {
                    warn!("Could not remove {}: {}", done.display(), rm);
                }
            }
            return Err(e);
        }
        committed.push(path);
    }
    Ok(())
}

///
/// Phase `vcf` against the reads behind `opener` and write the three outputs into
/// `out_dir`: `<stem>_phased.vcf`, `<stem>_phased.csv` and `<stem>_dropped_svs.csv`.
///
/// Settings are validated and the input header checked before any work starts.
/// Outputs are staged as temporary files and only moved into place once all
/// three were written, the tables first and the VCF last. A failed run, including
/// a failed move, leaves none of them behind.
///
pub fn phase_vcf<O: EvidenceOpener>(
    vcf: &Path,
    opener: &O,
    settings: &PhaseSettings,
    out_dir: &Path,
) -> Result<PhaseOutputs> {
    let config = settings.validate()?;

    let store = VariantStore::open(vcf)?;
    check_annotation_keys(&store.read_header()?)?;
    fs::create_dir_all(out_dir)?;

    let result = run_phasing(&store, opener, &config)?;
    let with_label = !config.opts.gq_bins().is_empty();

    let stem = vcf_stem(vcf);
    let phased_vcf = out_dir.join(format!("{}_phased.vcf", stem));
    let phased_csv = out_dir.join(format!("{}_phased.csv", stem));
    let dropped_csv = out_dir.join(format!("{}_dropped_svs.csv", stem));

    let mut annotation = AnnotationReport::default();
    let vcf_tmp = stage(out_dir, |w| {
        annotation = annotate_vcf(&store, &result.kept, &result.dropped, w)?;
        Ok(())
    })?;
    let kept_tmp = stage(out_dir, |w| write_call_table(w, &result.kept, with_label))?;
    let dropped_tmp = stage(out_dir, |w| {
        write_call_table(w, &result.dropped, with_label)
    })?;

    // the VCF goes last
    commit_all(vec![
        (kept_tmp, phased_csv.as_path()),
        (dropped_tmp, dropped_csv.as_path()),
        (vcf_tmp, phased_vcf.as_path()),
    ])?;

    info!(
        "Wrote {} ({} annotated records)",
        phased_vcf.display(),
        annotation.annotated
    );
    info!("Wrote {} ({} rows)", phased_csv.display(), result.kept.len());
    info!(
        "Wrote {} ({} rows)",
        dropped_csv.display(),
        result.dropped.len()
    );

    Ok(PhaseOutputs {
        phased_vcf,
        phased_csv,
        dropped_csv,
        kept: result.kept.len(),
        dropped: result.dropped.len(),
        annotation,
    })
}
