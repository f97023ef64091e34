// ============================================================================
// gif2avif-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. The pipeline only ever hands ffmpeg a list of arguments and then
// drains its events before collecting the exit status, so the traits are kept
// to exactly that surface.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner / SidecarProcess: Implementation using ffmpeg-sidecar

// ---- Internal crate imports ----
use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};

// ---- External crate imports ----
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

// ---- Standard library imports ----
use std::path::PathBuf;
use std::process::ExitStatus;

// ============================================================================
// TRAITS
// ============================================================================

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an [`FfmpegProcess`].
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    /// Spawns ffmpeg with the given arguments. `-hide_banner` is always added.
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;
}

// ============================================================================
// FFMPEG-SIDECAR IMPLEMENTATION
// ============================================================================

/// Wrapper around [`SidecarChild`] implementing [`FfmpegProcess`].
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {e}");
            command_failed_error(
                "ffmpeg (sidecar - get iter)",
                ExitStatus::default(),
                e.to_string(),
            )
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// [`FfmpegSpawner`] using `ffmpeg-sidecar` with a resolved ffmpeg binary.
#[derive(Debug, Clone)]
pub struct SidecarSpawner {
    binary: PathBuf,
}

impl SidecarSpawner {
    pub fn with_binary(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        let mut cmd = FfmpegCommand::new_with_path(&self.binary);
        cmd.arg("-hide_banner");
        cmd.args(args);

        log::debug!("Running ffmpeg with arguments: {}", args.join(" "));

        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}
