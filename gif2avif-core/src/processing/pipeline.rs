// ============================================================================
// gif2avif-core/src/processing/pipeline.rs
// ============================================================================
//
// PIPELINE ORCHESTRATION: One GIF to One AVIF
//
// Drives a single conversion job through its stages inside an exclusively
// owned workspace:
//
//   Validating -> RateExtracted -> FramesExtracted -> Normalized
//              -> Assembled -> Encoded -> CleanedUp
//
// Any stage may move the job to Failed. The workspace is closed on every
// path, and the encoded file is only moved to its destination once encoding
// succeeded, so a failed job never leaves a partial artifact behind.
//
// KEY COMPONENTS:
// - JobState: the lifecycle states, logged on every transition
// - ConversionResult: serializable outcome of a successful job
// - convert_gif: the orchestrator
// - publish_output: atomic move of the staged file to its destination

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{ExternalTool, FfmpegSpawner, FfprobeExecutor, Toolchain};
use crate::processing::alpha::prepare_source;
use crate::processing::encode::encode_frames;
use crate::processing::frame_rate::{FrameDuration, FrameRate, extract_frame_rate};
use crate::processing::frame_set::{assemble_frame_set, normalize_single_frame};
use crate::processing::frames::extract_frames;
use crate::workspace::{Workspace, generate_job_id, workspace_base};

// ---- External crate imports ----
use serde::Serialize;
use tempfile::Builder as TempFileBuilder;

// ---- Standard library imports ----
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Lifecycle of one conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobState {
    Validating,
    RateExtracted,
    FramesExtracted,
    Normalized,
    Assembled,
    Encoded,
    CleanedUp,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::CleanedUp | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks and logs the state of one job.
#[derive(Debug)]
struct JobTracker {
    job_id: String,
    state: JobState,
}

impl JobTracker {
    fn new(job_id: String) -> Self {
        Self {
            job_id,
            state: JobState::Validating,
        }
    }

    fn advance(&mut self, next: JobState) {
        log::debug!("[{}] {} -> {}", self.job_id, self.state, next);
        self.state = next;
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub job_id: String,
    pub source: PathBuf,
    pub output: PathBuf,
    pub frame_rate: FrameRate,
    pub frame_duration: FrameDuration,
    /// Frames handed to the encoder, including a duplicated single frame.
    pub frame_count: usize,
    pub duplicated: bool,
    pub input_size: u64,
    pub output_size: u64,
    pub elapsed: Duration,
}

/// Converts `source` into the animated AVIF `output`.
///
/// A missing source or an existing output (without `overwrite`) is rejected
/// before any workspace is created. Failing to remove the workspace is logged
/// and never changes the job's result.
pub fn convert_gif<P, S, T>(
    tools: &Toolchain<P, S, T>,
    config: &CoreConfig,
    source: &Path,
    output: &Path,
) -> CoreResult<ConversionResult>
where
    P: FfprobeExecutor,
    S: FfmpegSpawner,
    T: ExternalTool,
{
    let start = Instant::now();
    let mut job = JobTracker::new(generate_job_id());
    log::info!("[{}] Converting {}", job.job_id, source.display());

    let input_size = match validate_job(config, source, output) {
        Ok(size) => size,
        Err(e) => {
            job.advance(JobState::Failed);
            return Err(e);
        }
    };

    let output_dir = output_parent(output);
    let workspace = match std::fs::create_dir_all(output_dir)
        .map_err(CoreError::from)
        .and_then(|()| Workspace::create(workspace_base(config, output_dir), &job.job_id))
    {
        Ok(ws) => ws,
        Err(e) => {
            job.advance(JobState::Failed);
            return Err(e);
        }
    };

    let outcome = run_stages(tools, config, source, output, &workspace, &mut job);
    let workspace_path = workspace.path().to_path_buf();
    let outcome = settle_cleanup(&job.job_id, &workspace_path, outcome, workspace.close());

    match outcome {
        Ok(stages) => {
            job.advance(JobState::CleanedUp);
            let result = ConversionResult {
                job_id: job.job_id,
                source: source.to_path_buf(),
                output: output.to_path_buf(),
                frame_rate: stages.frame_rate,
                frame_duration: stages.frame_duration,
                frame_count: stages.frame_count,
                duplicated: stages.duplicated,
                input_size,
                output_size: stages.output_size,
                elapsed: start.elapsed(),
            };
            log::info!(
                "[{}] Wrote {} ({} frames, {} ms per frame)",
                result.job_id,
                result.output.display(),
                result.frame_count,
                result.frame_duration
            );
            Ok(result)
        }
        Err(e) => {
            job.advance(JobState::Failed);
            log::error!("[{}] {e}", job.job_id);
            Err(e)
        }
    }
}

/// Logs the workspace removal result and returns the job's own outcome.
fn settle_cleanup<R>(
    job_id: &str,
    workspace_path: &Path,
    outcome: CoreResult<R>,
    cleanup: CoreResult<()>,
) -> CoreResult<R> {
    match cleanup {
        Ok(()) => log::debug!("[{job_id}] Removed workspace {}", workspace_path.display()),
        Err(e) => log::warn!("[{job_id}] {e}"),
    }
    outcome
}

/// Checks the source exists and the destination may be written. Returns the source size.
fn validate_job(config: &CoreConfig, source: &Path, output: &Path) -> CoreResult<u64> {
    let metadata = match std::fs::metadata(source) {
        Ok(m) if m.is_file() => m,
        _ => return Err(CoreError::InputNotFound(source.to_path_buf())),
    };

    if output.exists() && !config.overwrite {
        return Err(CoreError::OutputExists(output.to_path_buf()));
    }

    Ok(metadata.len())
}

fn output_parent(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// What the workspace stages produced.
struct StageOutcome {
    frame_rate: FrameRate,
    frame_duration: FrameDuration,
    frame_count: usize,
    duplicated: bool,
    output_size: u64,
}

fn run_stages<P, S, T>(
    tools: &Toolchain<P, S, T>,
    config: &CoreConfig,
    source: &Path,
    output: &Path,
    workspace: &Workspace,
    job: &mut JobTracker,
) -> CoreResult<StageOutcome>
where
    P: FfprobeExecutor,
    S: FfmpegSpawner,
    T: ExternalTool,
{
    let frame_rate = extract_frame_rate(&tools.ffprobe, source, config.strict_probe)?;
    let frame_duration = FrameDuration::from_rate(frame_rate);
    log::debug!(
        "[{}] Frame rate {frame_rate}, frame duration {frame_duration}",
        job.job_id
    );
    job.advance(JobState::RateExtracted);

    let decode_source = match (&tools.gifsicle, config.alpha_cleanup) {
        (Some(gifsicle), true) => prepare_source(gifsicle, source, workspace.path()),
        (None, true) => {
            log::warn!("[{}] Alpha cleanup requested but gifsicle is unavailable", job.job_id);
            source.to_path_buf()
        }
        _ => source.to_path_buf(),
    };

    // Errors keep naming the caller's source even when decoding the cleaned copy.
    extract_frames(&tools.ffmpeg, &decode_source, workspace.frames_dir()).map_err(|e| match e {
        CoreError::DecodeFailure { message, .. } => CoreError::DecodeFailure {
            path: source.to_path_buf(),
            message,
        },
        other => other,
    })?;
    job.advance(JobState::FramesExtracted);

    let duplicated = normalize_single_frame(workspace.frames_dir())?;
    job.advance(JobState::Normalized);

    let frames = assemble_frame_set(workspace.frames_dir(), source)?;
    job.advance(JobState::Assembled);

    let staged = workspace.staging_output();
    let output_size = encode_frames(
        &tools.avifenc,
        config,
        &frames,
        frame_duration,
        &staged,
        source,
    )?;
    job.advance(JobState::Encoded);

    publish_output(&staged, output, config.overwrite)?;

    Ok(StageOutcome {
        frame_rate,
        frame_duration,
        frame_count: frames.len(),
        duplicated,
        output_size,
    })
}

/// Moves the staged file to `destination`.
///
/// Without `overwrite` the destination is claimed with a hard link, which
/// fails atomically when the name is already taken, so two jobs racing for the
/// same output cannot clobber each other. With `overwrite` a rename replaces
/// the file. When neither works (typically across filesystems), the file is
/// copied into a temporary file beside the destination and persisted in one
/// step, so the destination is never seen half-written.
pub fn publish_output(staged: &Path, destination: &Path, overwrite: bool) -> CoreResult<()> {
    let moved = if overwrite {
        std::fs::rename(staged, destination)
    } else {
        std::fs::hard_link(staged, destination)
    };

    match moved {
        Ok(()) => {
            if !overwrite {
                if let Err(e) = std::fs::remove_file(staged) {
                    log::debug!("Could not remove staged file {}: {e}", staged.display());
                }
            }
            return Ok(());
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(CoreError::OutputExists(destination.to_path_buf()));
        }
        Err(e) => log::debug!(
            "Moving {} into place failed ({e}), copying instead",
            staged.display()
        ),
    }

    let dest_dir = output_parent(destination);
    let mut temp = TempFileBuilder::new()
        .prefix(".gif2avif-")
        .suffix(".avif.tmp")
        .tempfile_in(dest_dir)?;
    std::io::copy(&mut std::fs::File::open(staged)?, temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    let persisted = if overwrite {
        temp.persist(destination)
    } else {
        temp.persist_noclobber(destination)
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            CoreError::OutputExists(destination.to_path_buf())
        } else {
            CoreError::Io(e.error)
        }
    })?;
    Ok(())
}
