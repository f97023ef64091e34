// ============================================================================
// gif2avif-core/src/processing/mod.rs
// ============================================================================
//
// PROCESSING: The GIF to AVIF Conversion Pipeline
//
// This module contains every stage of a conversion job and the drivers that
// run jobs, singly or in batches.
//
// KEY COMPONENTS:
// - frame_rate: rate probing with fallback, frame duration computation
// - frames: decoding into numbered RGBA PNG frames
// - alpha: optional gifsicle transparency repair
// - frame_set: single-frame normalization and ordered frame set assembly
// - encode: avifenc argument building and invocation
// - pipeline: per-job state machine, workspace handling, output publishing
// - batch: many jobs, sequential or parallel

pub mod alpha;
pub mod batch;
pub mod encode;
pub mod frame_rate;
pub mod frame_set;
pub mod frames;
pub mod pipeline;


pub use batch::{BatchSummary, ConversionJob, FailedJob, default_output_path, process_batch};
pub use encode::{build_avifenc_args, encode_frames};
pub use frame_rate::{
    FrameDuration, FrameRate, FrameRateParseError, TIMESCALE, extract_frame_rate, parse_frame_rate,
};
pub use frame_set::{FrameSet, assemble_frame_set, list_frame_files, normalize_single_frame};
pub use frames::{extract_frames, frame_file_name};
pub use pipeline::{ConversionResult, JobState, convert_gif, publish_output};
