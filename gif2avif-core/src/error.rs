// ============================================================================
// gif2avif-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Conversion Pipeline
//
// This module defines the error taxonomy for gif2avif-core. Pipeline stage
// failures (input validation, decoding, encoding, cleanup) carry the source
// path so a batch driver can report which job failed and where, while the
// remaining variants cover tool execution, configuration and filesystem
// problems shared by every stage.
//
// KEY COMPONENTS:
// - CoreError: Main error enum
// - CoreResult: Result alias used throughout the crate
// - Helper constructors for external command failures

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors produced by the gif2avif conversion pipeline.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source animation does not exist. Raised before any workspace is created.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The frame rate probe could not run. Only surfaced in strict probe mode.
    #[error("Frame rate probe failed: {0}")]
    ProbeFailure(String),

    /// The decoder failed or produced no frames.
    #[error("Failed to decode frames from {}: {message}", path.display())]
    DecodeFailure { path: PathBuf, message: String },

    /// The encoder failed or did not produce an output file.
    #[error("Failed to encode AVIF for {}: {message}", path.display())]
    EncodeFailure { path: PathBuf, message: String },

    #[error("Failed to remove workspace {}: {source}", path.display())]
    CleanupFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Command '{0}' failed with {1}: {2}")]
    CommandFailed(String, ExitStatus, String),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{0}' timed out after {1:?}")]
    CommandTimeout(String, Duration),

    #[error("Required external tool(s) not found: {0}")]
    DependencyNotFound(String),

    #[error("Output file already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("No GIF files found to process")]
    NoFilesFound,

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse JSON output: {0}")]
    JsonParseError(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for gif2avif-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds a [`CoreError::CommandStart`] for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a [`CoreError::CommandFailed`] for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status, stderr.into())
}

/// Builds a [`CoreError::CommandWait`] for a command whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

impl CoreError {
    /// Returns true for errors that mean an external tool is missing or could not run at all.
    pub fn is_tool_unavailable(&self) -> bool {
        matches!(
            self,
            CoreError::CommandStart(..) | CoreError::DependencyNotFound(_)
        )
    }
}
