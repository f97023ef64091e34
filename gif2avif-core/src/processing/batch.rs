//! Batch conversion of many GIFs.
//!
//! Jobs run one after another by default, or on a dedicated rayon pool when
//! `parallel_jobs` is greater than one. A failing job is recorded and the
//! batch moves on; each job already owns its own workspace, so concurrent
//! jobs never see each other's frames.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{ExternalTool, FfmpegSpawner, FfprobeExecutor, Toolchain};
use crate::processing::pipeline::{ConversionResult, convert_gif};
use crate::utils::{AVIF_EXTENSION, get_file_stem_safe};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One source and where its AVIF goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

/// Output path for `source`: `<stem>.avif` in `output_dir`, or beside the source.
pub fn default_output_path(source: &Path, output_dir: Option<&Path>) -> CoreResult<PathBuf> {
    let file_name = format!("{}.{AVIF_EXTENSION}", get_file_stem_safe(source)?);
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    Ok(dir.join(file_name))
}

/// A job that did not produce an output.
#[derive(Debug, Clone, Serialize)]
pub struct FailedJob {
    pub source: PathBuf,
    pub error: String,
}

/// Results of a batch, in job order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub succeeded: Vec<ConversionResult>,
    pub failed: Vec<FailedJob>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn total_input_size(&self) -> u64 {
        self.succeeded.iter().map(|r| r.input_size).sum()
    }

    pub fn total_output_size(&self) -> u64 {
        self.succeeded.iter().map(|r| r.output_size).sum()
    }

    fn record(&mut self, source: &Path, outcome: CoreResult<ConversionResult>) {
        match outcome {
            Ok(result) => self.succeeded.push(result),
            Err(e) => self.failed.push(FailedJob {
                source: source.to_path_buf(),
                error: e.to_string(),
            }),
        }
    }
}

/// Converts every job and reports per-job outcomes.
///
/// Only setting up the thread pool can fail the batch as a whole.
pub fn process_batch<P, S, T>(
    tools: &Toolchain<P, S, T>,
    config: &CoreConfig,
    jobs: &[ConversionJob],
) -> CoreResult<BatchSummary>
where
    P: FfprobeExecutor + Sync,
    S: FfmpegSpawner + Sync,
    T: ExternalTool + Sync,
{
    let run = |job: &ConversionJob| convert_gif(tools, config, &job.source, &job.output);

    let outcomes: Vec<CoreResult<ConversionResult>> = if config.parallel_jobs > 1 && jobs.len() > 1 {
        log::info!(
            "Converting {} file(s) with {} concurrent jobs",
            jobs.len(),
            config.parallel_jobs
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_jobs)
            .build()
            .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize thread pool: {e}")))?;
        pool.install(|| jobs.par_iter().map(run).collect())
    } else {
        jobs.iter().map(run).collect()
    };

    let mut summary = BatchSummary::default();
    for (job, outcome) in jobs.iter().zip(outcomes) {
        summary.record(&job.source, outcome);
    }

    log::info!(
        "Batch finished: {} succeeded, {} failed",
        summary.succeeded.len(),
        summary.failed.len()
    );
    Ok(summary)
}
