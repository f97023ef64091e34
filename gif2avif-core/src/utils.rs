//! Utility functions for formatting and file operations.
//!
//! General-purpose helpers used across gif2avif-core and the CLI: duration
//! and byte formatting, GIF path checks, and safe path component extraction.

use std::path::Path;
use std::time::Duration;

/// Extension of source animations accepted by the pipeline.
pub const GIF_EXTENSION: &str = "gif";

/// Extension of the produced animations.
pub const AVIF_EXTENSION: &str = "avif";

/// Checks if the given path is an existing `.gif` file (case-insensitive).
#[must_use]
pub fn is_gif_file(path: &Path) -> bool {
    path.is_file() && has_extension(path, GIF_EXTENSION)
}

/// Checks the extension of `path` against `ext`, ignoring ASCII case.
#[must_use]
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Formats a duration as HH:MM:SS, or as seconds with millisecond precision when under a minute.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    if total_secs < 60 {
        return format!("{:.3}s", duration.as_secs_f64());
    }

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Safely extracts the file stem of a path, or a `PathError` if there is none.
pub fn get_file_stem_safe(path: &Path) -> crate::CoreResult<String> {
    Ok(path
        .file_stem()
        .ok_or_else(|| {
            crate::CoreError::PathError(format!("Failed to get file stem for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Percentage size reduction from input to output. 0 when there is no reduction.
#[must_use]
pub fn calculate_size_reduction(input_size: u64, output_size: u64) -> u64 {
    if input_size == 0 || output_size >= input_size {
        0
    } else {
        100 - ((output_size * 100) / input_size)
    }
}
