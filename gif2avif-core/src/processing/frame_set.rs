//! Frame set normalization and assembly.
//!
//! Animated AVIF encoders reject single-image sequences, so a lone decoded
//! frame is duplicated before the ordered frame list is assembled. Ordering is
//! by file name, compared byte-wise, which matches decode order because frame
//! names are zero-padded (see `frames::frame_file_name`).

use crate::error::{CoreError, CoreResult};
use crate::processing::frames::FRAME_EXTENSION;
use crate::utils::{get_file_stem_safe, has_extension};
use std::path::{Path, PathBuf};

/// Suffix appended to the stem of a duplicated single frame.
pub const DUPLICATE_SUFFIX: &str = "_dup";

/// Ordered frames handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSet {
    frames: Vec<PathBuf>,
}

impl FrameSet {
    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Lists the frame files in `dir`, sorted by file name.
pub fn list_frame_files(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_extension(path, FRAME_EXTENSION))
        .collect();

    frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(frames)
}

/// Duplicates the frame when `dir` holds exactly one, so the encoder gets a
/// two-frame sequence. Returns whether a duplicate was written.
///
/// Zero frames or two or more are left untouched. A directory that already
/// holds a duplicate has two frames, so the call never duplicates twice.
pub fn normalize_single_frame(dir: &Path) -> CoreResult<bool> {
    let frames = list_frame_files(dir)?;
    let [only] = frames.as_slice() else {
        return Ok(false);
    };

    let stem = get_file_stem_safe(only)?;
    let duplicate = dir.join(format!("{stem}{DUPLICATE_SUFFIX}.{FRAME_EXTENSION}"));
    std::fs::copy(only, &duplicate)?;

    log::debug!(
        "Single-frame source: duplicated {} to {}",
        only.display(),
        duplicate.display()
    );
    Ok(true)
}

/// Collects the ordered frame set for encoding. `source` is only used for the error.
///
/// An empty directory means the decoder produced nothing and is reported as
/// a [`CoreError::DecodeFailure`].
pub fn assemble_frame_set(dir: &Path, source: &Path) -> CoreResult<FrameSet> {
    let frames = list_frame_files(dir)?;
    if frames.is_empty() {
        return Err(CoreError::DecodeFailure {
            path: source.to_path_buf(),
            message: "decoder produced no frames".to_string(),
        });
    }
    Ok(FrameSet { frames })
}
