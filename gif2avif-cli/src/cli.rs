// gif2avif-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use gif2avif_core::{ChromaSubsampling, ColorTagging};
use std::ffi::OsString;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "gif2avif: Animated GIF to animated AVIF converter",
    long_about = "Converts animated GIFs to animated AVIF images with ffmpeg and avifenc, \
                  keeping frame timing and transparency."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output for troubleshooting
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts a GIF file, or every GIF in a directory, to AVIF
    Convert(ConvertArgs),
    /// Reports which external tools were found
    Check(CheckArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// Input .gif file or directory containing .gif files
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// Output directory, or an output .avif file name for a single input file.
    /// Defaults to writing each AVIF next to its source.
    #[arg(short = 'o', long = "output", value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory for run log files (defaults to OUTPUT_DIR/logs when an output directory is given)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a run log file
    #[arg(long)]
    pub no_log: bool,

    /// Base directory for per-job temporary workspaces (defaults to the output directory)
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<PathBuf>,

    // --- Encoder Settings ---
    /// Chroma subsampling: 420, 422, 444 or 400
    #[arg(long, value_name = "FORMAT")]
    pub yuv: Option<ChromaSubsampling>,

    /// Color tagging as primaries/transfer/matrix (e.g. 1/13/1)
    #[arg(long, value_name = "P/T/M")]
    pub nclx: Option<ColorTagging>,

    /// Color plane quality (0-100, higher is better)
    #[arg(long, value_name = "Q", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub qcolor: Option<u8>,

    /// Alpha plane quality (0-100, higher is better)
    #[arg(long, value_name = "Q", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub qalpha: Option<u8>,

    /// Encoder worker threads per job
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Encoder speed (0-10, lower is slower/better quality)
    #[arg(long, value_name = "SPEED", value_parser = clap::value_parser!(u8).range(0..=10))]
    pub speed: Option<u8>,

    /// AV1 codec used by avifenc (aom, rav1e, svt)
    #[arg(long, value_name = "CODEC")]
    pub codec: Option<String>,

    /// Disable automatic tiling
    #[arg(long)]
    pub no_autotiling: bool,

    // --- Pipeline Behaviour ---
    /// Repair GIF transparency with gifsicle before decoding
    #[arg(long)]
    pub alpha_cleanup: bool,

    /// Fail a job when the frame rate probe cannot run instead of assuming 25 fps
    #[arg(long)]
    pub strict_probe: bool,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Timeout in seconds for each avifenc or gifsicle run
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Number of files converted at the same time (0 = one per CPU)
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Print the batch summary as JSON instead of the terminal report
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Also require gifsicle, needed by --alpha-cleanup
    #[arg(long)]
    pub alpha_cleanup: bool,

    /// Also require ffprobe, needed by --strict-probe
    #[arg(long)]
    pub strict_probe: bool,
}

/// Parses the process arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parses an explicit argument list. The first item is the program name.
pub fn parse_cli_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args)
}
