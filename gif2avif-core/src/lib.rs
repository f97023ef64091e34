//! Core library for converting animated GIFs to animated AVIF images.
//!
//! The pipeline probes the source frame rate with ffprobe, decodes every frame
//! to an RGBA PNG with ffmpeg, duplicates single-frame sources, and encodes the
//! ordered frames with avifenc using one uniform frame duration on a
//! 1000-units-per-second timescale. Each job works in its own temporary
//! workspace that is removed whatever the outcome.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use gif2avif_core::{
//!     CoreConfig, ConversionJob, SystemToolchain, check_dependencies, default_output_path,
//!     find_processable_files, process_batch,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let mut config = CoreConfig::new(PathBuf::from("/path/to/output"));
//! config.speed = 4;
//! config.validate().unwrap();
//!
//! let paths = check_dependencies(&config).unwrap();
//! let tools = SystemToolchain::from_paths(&paths, &config);
//!
//! let jobs: Vec<ConversionJob> = find_processable_files(Path::new("/path/to/gifs"))
//!     .unwrap()
//!     .into_iter()
//!     .map(|source| {
//!         let output = default_output_path(&source, config.output_dir.as_deref()).unwrap();
//!         ConversionJob::new(source, output)
//!     })
//!     .collect();
//!
//! let summary = process_batch(&tools, &config, &jobs).unwrap();
//! println!("{} converted, {} failed", summary.succeeded.len(), summary.failed.len());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod logging;
pub mod processing;
pub mod utils;
pub mod workspace;

// Re-exports for public API
pub use config::{ChromaSubsampling, ColorTagging, CoreConfig};
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use external::{
    SystemToolchain, ToolPaths, Toolchain, check_dependencies, find_tool,
};
pub use processing::{
    BatchSummary, ConversionJob, ConversionResult, FailedJob, FrameDuration, FrameRate, JobState,
    convert_gif, default_output_path, process_batch,
};
pub use utils::{calculate_size_reduction, format_bytes, format_duration};
