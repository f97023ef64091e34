//! FFprobe integration for stream inspection.
//!
//! The pipeline only needs one value from ffprobe: the average frame rate of
//! the first video stream, as the raw `num/den` string ffprobe reports. Parsing
//! and fallback handling live in `processing::frame_rate`.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for stream inspection, so the pipeline can run against a mock.
pub trait FfprobeExecutor {
    /// Returns the `avg_frame_rate` of the first video stream, or `None` if
    /// the file has no video stream.
    fn get_average_frame_rate(&self, input_path: &Path) -> CoreResult<Option<String>>;
}

/// [`FfprobeExecutor`] backed by the `ffprobe` crate. Runs `ffprobe` from `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_average_frame_rate(&self, input_path: &Path) -> CoreResult<Option<String>> {
        log::debug!(
            "Running ffprobe (via crate) for frame rate on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => Ok(metadata
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
                .map(|s| s.avg_frame_rate.clone())),
            Err(err) => {
                log::debug!(
                    "ffprobe failed for frame rate on {}: {:?}",
                    input_path.display(),
                    err
                );
                Err(map_ffprobe_error(err, "frame rate"))
            }
        }
    }
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::JsonParseError(format!(
            "ffprobe {context} output deserialization: {err}"
        )),
        _ => CoreError::OperationFailed(format!(
            "Unknown ffprobe error during {context}: {err:?}"
        )),
    }
}
