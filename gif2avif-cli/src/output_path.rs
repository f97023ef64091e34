//! Output path resolution for the CLI.
//!
//! Decides whether the -o argument is a directory or a specific output
//! filename. Without -o, every AVIF is written next to its source.

use gif2avif_core::CoreError;
use gif2avif_core::utils::{AVIF_EXTENSION, has_extension};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolved output path information.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OutputPathInfo {
    /// Directory for output files. `None` means beside each source.
    pub output_dir: Option<PathBuf>,
    /// Filename override when the user passes `out.avif` instead of a directory.
    pub filename_override: Option<OsString>,
}

/// Resolves the output path argument into a directory and optional filename.
///
/// When the input is a single file and the output has an extension, the
/// output is treated as a filename and must end in `.avif`. Otherwise it is
/// a directory.
pub fn resolve_output_path(
    input_path: &Path,
    output_path: Option<&Path>,
) -> Result<OutputPathInfo, CoreError> {
    let Some(output_path) = output_path else {
        return Ok(OutputPathInfo::default());
    };

    if input_path.is_file() && output_path.extension().is_some() {
        if !has_extension(output_path, AVIF_EXTENSION) {
            return Err(CoreError::PathError(
                "Output filename must have .avif extension".to_string(),
            ));
        }

        let parent_dir = output_path
            .parent()
            .map(Path::to_path_buf)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(OutputPathInfo {
            output_dir: Some(parent_dir),
            filename_override: output_path.file_name().map(OsString::from),
        })
    } else {
        Ok(OutputPathInfo {
            output_dir: Some(output_path.to_path_buf()),
            filename_override: None,
        })
    }
}
