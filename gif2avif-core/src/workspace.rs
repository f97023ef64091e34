//! Per-job workspace management.
//!
//! Every conversion job owns one uniquely named temporary directory holding its
//! decoded frames, the optional cleaned-up source and the staged AVIF. The
//! directory is created through the tempfile crate so it is removed on drop
//! even when a job unwinds; the pipeline still closes it explicitly so that a
//! removal failure can be reported.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use rand::distr::{Alphanumeric, SampleString};
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

/// Prefix shared by all workspace directories.
pub const WORKSPACE_PREFIX: &str = "gif2avif-";

/// Length of the random job identifier.
pub const JOB_ID_LEN: usize = 6;

const FRAMES_DIR: &str = "frames";
const STAGED_OUTPUT: &str = "output.avif";

/// Generates a random alphanumeric job identifier.
pub fn generate_job_id() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), JOB_ID_LEN)
}

/// Base directory for a job's workspace: `temp_dir` if configured, else the output directory.
pub fn workspace_base<'a>(config: &'a CoreConfig, output_dir: &'a Path) -> &'a Path {
    config.temp_dir.as_deref().unwrap_or(output_dir)
}

/// Exclusively owned temporary directory of one conversion job.
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
    frames_dir: PathBuf,
}

impl Workspace {
    /// Creates `gif2avif-<job_id>-<random>` under `base`, plus its `frames/` subdirectory.
    pub fn create(base: &Path, job_id: &str) -> CoreResult<Self> {
        std::fs::create_dir_all(base)?;

        let dir = TempFileBuilder::new()
            .prefix(&format!("{WORKSPACE_PREFIX}{job_id}-"))
            .tempdir_in(base)?;

        let frames_dir = dir.path().join(FRAMES_DIR);
        std::fs::create_dir(&frames_dir)?;

        log::debug!("[{job_id}] Created workspace {}", dir.path().display());
        Ok(Self { dir, frames_dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the decoder writes frames into.
    pub fn frames_dir(&self) -> &Path {
        &self.frames_dir
    }

    /// Where the encoder writes before the output is published.
    pub fn staging_output(&self) -> PathBuf {
        self.dir.path().join(STAGED_OUTPUT)
    }

    /// Removes the workspace and everything in it.
    pub fn close(self) -> CoreResult<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| CoreError::CleanupFailure { path, source })
    }
}
