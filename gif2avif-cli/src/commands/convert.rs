//! Implementation of the 'convert' subcommand.
//!
//! This module handles file discovery, configuration setup, job planning and
//! delegation to the gif2avif-core batch driver.

use crate::cli::ConvertArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::logging::run_log_path;
use crate::output_path::OutputPathInfo;
use crate::terminal;

use gif2avif_core::utils::{GIF_EXTENSION, has_extension};
use gif2avif_core::{
    BatchSummary, ConversionJob, CoreConfig, CoreError, SystemToolchain, check_dependencies,
    default_output_path, process_batch,
};

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

/// Discovers .gif files from the input path (file or directory).
///
/// An empty directory yields an empty list rather than an error.
pub fn discover_convert_files(args: &ConvertArgs) -> CliResult<Vec<PathBuf>> {
    let input_path = args.input_path.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "Invalid input path '{}': {}",
            args.input_path.display(),
            e
        ))
    })?;

    let metadata = fs::metadata(&input_path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to access input path '{}': {}",
            input_path.display(),
            e
        ))
    })?;

    if metadata.is_dir() {
        match gif2avif_core::find_processable_files(&input_path) {
            Ok(files) => Ok(files),
            Err(CoreError::NoFilesFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    } else if metadata.is_file() {
        if has_extension(&input_path, GIF_EXTENSION) {
            Ok(vec![input_path])
        } else {
            Err(CoreError::OperationFailed(format!(
                "Input file '{}' is not a .gif file",
                input_path.display()
            )))
        }
    } else {
        Err(CoreError::OperationFailed(format!(
            "Input path '{}' is neither a file nor a directory",
            input_path.display()
        )))
    }
}

/// Creates and validates a CoreConfig from CLI arguments.
pub fn create_core_config(
    args: &ConvertArgs,
    output_dir: Option<PathBuf>,
) -> CliResult<CoreConfig> {
    let mut config = CoreConfig {
        output_dir,
        temp_dir: args.temp_dir.clone(),
        autotiling: !args.no_autotiling,
        alpha_cleanup: args.alpha_cleanup,
        strict_probe: args.strict_probe,
        overwrite: args.overwrite,
        tool_timeout: args.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    if let Some(chroma) = args.yuv {
        config.chroma = chroma;
    }
    if let Some(tagging) = args.nclx {
        config.color_tagging = tagging;
    }
    if let Some(quality) = args.qcolor {
        config.quality_color = quality;
    }
    if let Some(quality) = args.qalpha {
        config.quality_alpha = quality;
    }
    if let Some(jobs) = args.jobs {
        config.encoder_jobs = jobs;
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(codec) = &args.codec {
        config.codec = codec.clone();
    }
    if let Some(parallel) = args.parallel {
        config.set_parallel_jobs(parallel);
    }

    config.validate()?;
    Ok(config)
}

/// Pairs every source with its output path.
///
/// The filename override only applies to a single input file.
pub fn plan_jobs(files: &[PathBuf], output: &OutputPathInfo) -> CliResult<Vec<ConversionJob>> {
    files
        .iter()
        .map(|source| -> CliResult<ConversionJob> {
            let target = match (&output.filename_override, &output.output_dir) {
                (Some(name), Some(dir)) if files.len() == 1 => dir.join(name),
                _ => default_output_path(source, output.output_dir.as_deref())?,
            };
            Ok(ConversionJob::new(source.clone(), target))
        })
        .collect()
}

/// Creates the log directory and returns the run log path, if file logging applies.
///
/// Defaults to `OUTPUT_DIR/logs`; without an output directory or `--log-dir`
/// only the console receives log records.
pub fn prepare_log_file(args: &ConvertArgs, output: &OutputPathInfo) -> CliResult<Option<PathBuf>> {
    if args.no_log {
        return Ok(None);
    }

    let Some(log_dir) = args
        .log_dir
        .clone()
        .or_else(|| output.output_dir.as_ref().map(|dir| dir.join("logs")))
    else {
        return Ok(None);
    };

    fs::create_dir_all(&log_dir)
        .cli_with_context(|| format!("Failed to create log directory '{}'", log_dir.display()))?;
    Ok(Some(run_log_path(&log_dir)))
}

fn display_settings(args: &ConvertArgs, config: &CoreConfig, output: &OutputPathInfo, files: usize) {
    let output_display = match (&output.output_dir, &output.filename_override) {
        (Some(dir), Some(name)) => dir.join(name).display().to_string(),
        (Some(dir), None) => dir.display().to_string(),
        (None, _) => "beside each source".to_string(),
    };

    terminal::print_section("Conversion");
    terminal::print_status("Input", &args.input_path.display().to_string());
    terminal::print_status("Output", &output_display);
    terminal::print_status("Files", &files.to_string());
    terminal::print_status(
        "Encoder",
        &format!(
            "{} speed {}, yuv{}, quality {}/{}",
            config.codec, config.speed, config.chroma, config.quality_color, config.quality_alpha
        ),
    );
    if config.parallel_jobs > 1 {
        terminal::print_status("Parallel jobs", &config.parallel_jobs.to_string());
    }
    if config.alpha_cleanup {
        terminal::print_status("Alpha cleanup", "gifsicle");
    }
}

/// Runs the conversion and reports results.
///
/// Individual job failures are part of the returned summary; only setup
/// problems (bad config, missing tools) are errors.
pub fn run_convert(
    args: ConvertArgs,
    files: Vec<PathBuf>,
    output: OutputPathInfo,
) -> CliResult<BatchSummary> {
    let total_start_time = Instant::now();
    let config = create_core_config(&args, output.output_dir.clone())?;

    if !args.json {
        display_settings(&args, &config, &output, files.len());
    }

    if files.is_empty() {
        warn!("No processable .gif files found in the specified input path.");
        if args.json {
            terminal::print_batch_json(&BatchSummary::default())?;
        } else {
            terminal::print_warning("No GIF files found");
        }
        return Ok(BatchSummary::default());
    }

    let paths = check_dependencies(&config)?;
    debug!("Using tools: {paths:?}");
    let tools = SystemToolchain::from_paths(&paths, &config);

    let jobs = plan_jobs(&files, &output)?;
    info!("Converting {} file(s)", jobs.len());
    let summary = process_batch(&tools, &config, &jobs)?;

    if args.json {
        terminal::print_batch_json(&summary)?;
    } else {
        terminal::print_batch_report(&summary, total_start_time.elapsed());
    }

    Ok(summary)
}
