//! Configuration structures and constants for the gif2avif-core library.
//!
//! This module provides the configuration for the conversion pipeline:
//! where outputs and workspaces go, the avifenc encoding parameters, and the
//! behavioural switches (alpha cleanup, strict probing, overwriting, timeouts,
//! batch parallelism).

use crate::error::CoreError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

// Default constants

/// Default color plane quality for avifenc (0-100, higher is better).
pub const DEFAULT_QUALITY_COLOR: u8 = 30;

/// Default alpha plane quality for avifenc (0-100, higher is better).
/// Kept well above the color quality so transparency edges stay clean.
pub const DEFAULT_QUALITY_ALPHA: u8 = 95;

/// Default number of encoder worker threads passed to avifenc `--jobs`.
pub const DEFAULT_ENCODER_JOBS: u32 = 8;

/// Default avifenc speed (0-10, lower is slower/better quality).
pub const DEFAULT_SPEED: u8 = 2;

/// Highest speed value avifenc accepts.
pub const MAX_SPEED: u8 = 10;

/// Highest quality value avifenc accepts.
pub const MAX_QUALITY: u8 = 100;

/// Default AV1 codec used by avifenc.
pub const DEFAULT_CODEC: &str = "aom";

/// Default advanced codec options passed as `-a key=value`.
pub const DEFAULT_CODEC_OPTIONS: &[&str] = &[
    "aq-mode=3",
    "enable-qm=1",
    "enable-chroma-deltaq=1",
    "enable-tpl-model=1",
    "end-usage=vbr",
    "tune=ssim",
];

/// Default number of conversions run at the same time in a batch.
pub const DEFAULT_PARALLEL_JOBS: usize = 1;

/// Chroma subsampling mode passed to avifenc `--yuv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    #[default]
    Yuv420,
    Yuv422,
    Yuv444,
    Yuv400,
}

impl ChromaSubsampling {
    /// Value as avifenc expects it.
    pub const fn as_str(self) -> &'static str {
        match self {
            ChromaSubsampling::Yuv420 => "420",
            ChromaSubsampling::Yuv422 => "422",
            ChromaSubsampling::Yuv444 => "444",
            ChromaSubsampling::Yuv400 => "400",
        }
    }
}

impl fmt::Display for ChromaSubsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChromaSubsampling {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "420" => Ok(ChromaSubsampling::Yuv420),
            "422" => Ok(ChromaSubsampling::Yuv422),
            "444" => Ok(ChromaSubsampling::Yuv444),
            "400" => Ok(ChromaSubsampling::Yuv400),
            other => Err(CoreError::Config(format!(
                "Unknown chroma subsampling '{other}'. Valid options: 420, 422, 444, 400"
            ))),
        }
    }
}

/// CICP color tagging triple passed to avifenc `--nclx` as `P/T/M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTagging {
    pub primaries: u16,
    pub transfer: u16,
    pub matrix: u16,
}

impl Default for ColorTagging {
    /// BT.709 primaries, sRGB transfer, BT.709 matrix.
    fn default() -> Self {
        Self {
            primaries: 1,
            transfer: 13,
            matrix: 1,
        }
    }
}

impl fmt::Display for ColorTagging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.primaries, self.transfer, self.matrix)
    }
}

impl FromStr for ColorTagging {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            CoreError::Config(format!(
                "Invalid color tagging '{s}', expected primaries/transfer/matrix (e.g. 1/13/1)"
            ))
        };

        let parts: Vec<&str> = s.trim().split('/').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut values = [0u16; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.trim().parse().map_err(|_| invalid())?;
        }

        Ok(Self {
            primaries: values[0],
            transfer: values[1],
            matrix: values[2],
        })
    }
}

/// Configuration for GIF to AVIF conversion including paths and encoding settings.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Directory where AVIF files are written. `None` writes each output next to its source.
    pub output_dir: Option<PathBuf>,

    /// Optional base directory for job workspaces (defaults to the job's output directory)
    pub temp_dir: Option<PathBuf>,

    /// Chroma subsampling for the color planes
    pub chroma: ChromaSubsampling,

    /// Color primaries / transfer / matrix tagging
    pub color_tagging: ColorTagging,

    /// Color plane quality (0-100)
    pub quality_color: u8,

    /// Alpha plane quality (0-100)
    pub quality_alpha: u8,

    /// Encoder worker threads
    pub encoder_jobs: u32,

    /// Encoder speed (0-10, lower is slower/better quality)
    pub speed: u8,

    /// AV1 codec name understood by avifenc (aom, rav1e, svt)
    pub codec: String,

    /// Let avifenc pick tiling automatically
    pub autotiling: bool,

    /// Advanced codec options, each passed as `-a <option>`
    pub codec_options: Vec<String>,

    /// Run the gifsicle optimize/unoptimize pass before decoding to repair broken transparency
    pub alpha_cleanup: bool,

    /// Fail the job when the frame rate probe cannot run instead of defaulting to 25 fps
    pub strict_probe: bool,

    /// Replace existing output files instead of failing the job
    pub overwrite: bool,

    /// Optional timeout for avifenc and gifsicle invocations
    pub tool_timeout: Option<Duration>,

    /// Number of conversions run concurrently in a batch
    pub parallel_jobs: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            temp_dir: None,
            chroma: ChromaSubsampling::default(),
            color_tagging: ColorTagging::default(),
            quality_color: DEFAULT_QUALITY_COLOR,
            quality_alpha: DEFAULT_QUALITY_ALPHA,
            encoder_jobs: DEFAULT_ENCODER_JOBS,
            speed: DEFAULT_SPEED,
            codec: DEFAULT_CODEC.to_string(),
            autotiling: true,
            codec_options: DEFAULT_CODEC_OPTIONS
                .iter()
                .map(|opt| opt.to_string())
                .collect(),
            alpha_cleanup: false,
            strict_probe: false,
            overwrite: false,
            tool_timeout: None,
            parallel_jobs: DEFAULT_PARALLEL_JOBS,
        }
    }
}

impl CoreConfig {
    /// Creates config writing into `output_dir`. Other fields use defaults.
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir: Some(output_dir),
            ..Default::default()
        }
    }

    /// Sets `parallel_jobs`, where 0 means one job per logical processor.
    pub fn set_parallel_jobs(&mut self, jobs: usize) {
        self.parallel_jobs = if jobs == 0 { num_cpus::get() } else { jobs };
    }

    /// Validates quality (0-100), speed (0-10), thread counts and codec name.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quality_color > MAX_QUALITY {
            return Err(CoreError::Config(format!(
                "quality_color must be 0-{MAX_QUALITY}, got {}",
                self.quality_color
            )));
        }

        if self.quality_alpha > MAX_QUALITY {
            return Err(CoreError::Config(format!(
                "quality_alpha must be 0-{MAX_QUALITY}, got {}",
                self.quality_alpha
            )));
        }

        if self.speed > MAX_SPEED {
            return Err(CoreError::Config(format!(
                "speed must be 0-{MAX_SPEED}, got {}",
                self.speed
            )));
        }

        if self.encoder_jobs == 0 {
            return Err(CoreError::Config(
                "encoder_jobs must be at least 1".to_string(),
            ));
        }

        if self.parallel_jobs == 0 {
            return Err(CoreError::Config(
                "parallel_jobs must be at least 1".to_string(),
            ));
        }

        if self.codec.trim().is_empty() {
            return Err(CoreError::Config("codec must not be empty".to_string()));
        }

        if matches!(self.tool_timeout, Some(timeout) if timeout.is_zero()) {
            return Err(CoreError::Config(
                "tool_timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
