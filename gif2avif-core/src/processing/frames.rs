// ============================================================================
// gif2avif-core/src/processing/frames.rs
// ============================================================================
//
// FRAME EXTRACTION: Decoding a GIF into Still Frames
//
// Runs ffmpeg once per job to write every distinct GIF frame as an RGBA PNG
// into the workspace's frames directory. Variable frame rate output keeps
// ffmpeg from duplicating or dropping frames to hit a constant rate, and the
// rgba pixel format guarantees an alpha plane on every frame.
//
// KEY COMPONENTS:
// - frame_file_name: the sequential naming invariant shared with the assembler
// - build_decode_args: ffmpeg arguments for one extraction
// - extract_frames: runs the decoder and reports how many frames it wrote

use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegProcess, FfmpegSpawner};
use crate::processing::frame_set::list_frame_files;

use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;

/// Output pattern handed to ffmpeg. Must agree with [`frame_file_name`].
pub const FRAME_PATTERN: &str = "%06d.png";

/// Extension of intermediate frame files.
pub const FRAME_EXTENSION: &str = "png";

/// Name ffmpeg gives the frame at 1-based `index`.
///
/// Names are six-digit zero-padded so byte-wise name order equals frame order
/// for up to 999,999 frames.
pub fn frame_file_name(index: usize) -> String {
    format!("{index:06}.{FRAME_EXTENSION}")
}

/// Builds the ffmpeg arguments decoding `source` into `frames_dir`.
pub fn build_decode_args(source: &Path, frames_dir: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        source.to_string_lossy().into_owned(),
        "-vsync".to_string(),
        "vfr".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        frames_dir.join(FRAME_PATTERN).to_string_lossy().into_owned(),
    ]
}

/// Decodes `source` into numbered PNG frames in `frames_dir`.
///
/// Returns the number of frames written. Zero frames is not an error here;
/// the frame set assembler rejects empty sets.
pub fn extract_frames<S: FfmpegSpawner>(
    spawner: &S,
    source: &Path,
    frames_dir: &Path,
) -> CoreResult<usize> {
    let decode_failure = |message: String| CoreError::DecodeFailure {
        path: source.to_path_buf(),
        message,
    };

    let args = build_decode_args(source, frames_dir);
    let mut process = spawner
        .spawn(&args)
        .map_err(|e| decode_failure(e.to_string()))?;

    let mut errors: Vec<String> = Vec::new();
    process
        .handle_events(|event| {
            match event {
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                    log::debug!("ffmpeg: {line}");
                    errors.push(line);
                }
                FfmpegEvent::Log(_, line) => log::trace!("ffmpeg: {line}"),
                _ => {}
            }
            Ok(())
        })
        .map_err(|e| decode_failure(e.to_string()))?;

    let status = process.wait().map_err(|e| decode_failure(e.to_string()))?;
    if !status.success() {
        let detail = errors
            .last()
            .cloned()
            .unwrap_or_else(|| "no error output".to_string());
        return Err(decode_failure(format!("ffmpeg exited with {status}: {detail}")));
    }

    let count = list_frame_files(frames_dir)?.len();
    log::debug!("Decoded {count} frame(s) from {}", source.display());
    Ok(count)
}
