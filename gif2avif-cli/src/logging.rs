// ============================================================================
// gif2avif-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Helper Functions for Logging
//
// The logger itself is configured by gif2avif_core::logging::setup_logging;
// this file decides the level and where the run log goes.

use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Prefix of run log file names.
pub const RUN_LOG_PREFIX: &str = "gif2avif_run_";

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("gif2avif_run_{}.log", gif2avif_cli::logging::get_timestamp());
/// // Result: "gif2avif_run_20240601_123045.log"
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of the run log for this invocation inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("{RUN_LOG_PREFIX}{}.log", get_timestamp()))
}

pub fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn run_log_lives_in_log_dir() {
        let path = run_log_path(Path::new("/var/log/gif2avif"));
        assert_eq!(path.parent(), Some(Path::new("/var/log/gif2avif")));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(RUN_LOG_PREFIX));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(log_level(true), LevelFilter::Debug);
        assert_eq!(log_level(false), LevelFilter::Info);
    }
}
