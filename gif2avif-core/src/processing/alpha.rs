//! Optional gifsicle pre-pass that repairs GIF transparency before decoding.
//!
//! Some GIFs store frames as partial updates whose transparent pixels decode
//! wrongly once split into stills. Re-optimizing and then fully unoptimizing
//! the GIF with gifsicle rewrites every frame as a complete image. The pass is
//! best-effort: on any failure the original source is decoded instead.

use crate::error::{CoreError, CoreResult};
use crate::external::ExternalTool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of the cleaned-up copy inside the workspace.
pub const CLEANED_SOURCE_NAME: &str = "source.gif";

/// Arguments for the optimizing pass that writes `cleaned`.
pub fn optimize_args(source: &Path, cleaned: &Path) -> Vec<OsString> {
    vec![
        source.as_os_str().to_owned(),
        "--optimize=2".into(),
        "--lossy=1".into(),
        "--output".into(),
        cleaned.as_os_str().to_owned(),
    ]
}

/// Arguments for the in-place unoptimizing pass over `cleaned`.
pub fn unoptimize_args(cleaned: &Path) -> Vec<OsString> {
    vec!["-b".into(), "--unoptimize".into(), cleaned.as_os_str().to_owned()]
}

fn run_pass<T: ExternalTool>(gifsicle: &T, args: &[OsString]) -> CoreResult<()> {
    let output = gifsicle.invoke(args)?;
    if output.success() {
        Ok(())
    } else {
        Err(CoreError::OperationFailed(format!(
            "{} failed: {}",
            gifsicle.name(),
            output.failure_summary()
        )))
    }
}

/// Runs both gifsicle passes, writing the repaired GIF to `cleaned`.
pub fn clean_transparency<T: ExternalTool>(gifsicle: &T, source: &Path, cleaned: &Path) -> CoreResult<()> {
    run_pass(gifsicle, &optimize_args(source, cleaned))?;
    run_pass(gifsicle, &unoptimize_args(cleaned))?;

    if !cleaned.is_file() {
        return Err(CoreError::OperationFailed(format!(
            "{} did not produce {}",
            gifsicle.name(),
            cleaned.display()
        )));
    }
    Ok(())
}

/// Returns the file the decoder should read: the repaired copy in
/// `workspace_dir`, or `source` itself when the pre-pass fails.
pub fn prepare_source<T: ExternalTool>(gifsicle: &T, source: &Path, workspace_dir: &Path) -> PathBuf {
    let cleaned = workspace_dir.join(CLEANED_SOURCE_NAME);
    match clean_transparency(gifsicle, source, &cleaned) {
        Ok(()) => {
            log::debug!("Alpha cleanup wrote {}", cleaned.display());
            cleaned
        }
        Err(e) => {
            log::warn!(
                "Alpha cleanup failed for {} ({e}), decoding the original",
                source.display()
            );
            source.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockTool;
    use tempfile::tempdir;

    #[test]
    fn optimize_then_unoptimize() {
        let ws = tempdir().unwrap();
        let gifsicle = MockTool::new("gifsicle").writes_arg_after("--output");
        let source = Path::new("/gifs/cat.gif");

        let decoded = prepare_source(&gifsicle, source, ws.path());
        assert_eq!(decoded, ws.path().join(CLEANED_SOURCE_NAME));

        let calls = gifsicle.received_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], optimize_args(source, &decoded));
        assert_eq!(calls[1], unoptimize_args(&decoded));
    }

    #[test]
    fn failure_falls_back_to_original() {
        let ws = tempdir().unwrap();
        let gifsicle = MockTool::new("gifsicle").exit_code(1);
        let source = Path::new("/gifs/cat.gif");

        assert_eq!(prepare_source(&gifsicle, source, ws.path()), source);
        assert_eq!(gifsicle.received_calls().len(), 1);
    }

    #[test]
    fn missing_output_falls_back_to_original() {
        let ws = tempdir().unwrap();
        let gifsicle = MockTool::new("gifsicle");
        let source = Path::new("/gifs/cat.gif");

        assert_eq!(prepare_source(&gifsicle, source, ws.path()), source);
        assert_eq!(gifsicle.received_calls().len(), 2);
    }
}
