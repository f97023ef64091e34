//! File discovery module for finding GIF files to convert.
//!
//! Searches only the top level of the given directory for `.gif` files
//! (case-insensitive), skipping hidden files. Results are sorted so batch
//! runs are reproducible.

use crate::error::{CoreError, CoreResult};
use crate::utils::{GIF_EXTENSION, has_extension};

use std::path::{Path, PathBuf};

/// Finds GIF files eligible for conversion in the specified directory.
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Sorted paths of the discovered `.gif` files
/// * `Err(CoreError::Io)` - If the directory cannot be read
/// * `Err(CoreError::NoFilesFound)` - If no `.gif` files are found
///
/// # Examples
///
/// ```rust,no_run
/// use gif2avif_core::find_processable_files;
/// use std::path::Path;
///
/// match find_processable_files(Path::new("/path/to/gifs")) {
///     Ok(files) => println!("Found {} GIF files", files.len()),
///     Err(e) => println!("Error finding GIF files: {}", e),
/// }
/// ```
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() || is_hidden(&path) {
                return None;
            }

            has_extension(&path, GIF_EXTENSION).then_some(path)
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }

    files.sort();
    log::debug!(
        "Discovered {} GIF file(s) in {}",
        files.len(),
        input_dir.display()
    );
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
