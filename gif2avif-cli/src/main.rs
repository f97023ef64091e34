// gif2avif-cli/src/main.rs
//
// Entry point for the gif2avif command-line tool.
//
// Parses arguments, sets up logging to the console and an optional run log
// file, dispatches to the selected command and maps the outcome to the
// process exit code: 0 when every job succeeded, 1 otherwise.

use gif2avif_cli::logging::log_level;
use gif2avif_cli::{
    CliResult, Cli, Commands, discover_convert_files, parse_cli, prepare_log_file,
    resolve_output_path, run_check, run_convert, terminal,
};
use gif2avif_core::CoreError;
use log::{LevelFilter, debug};
use std::path::Path;
use std::process;

fn init_logging(log_file: Option<&Path>, level: LevelFilter) -> CliResult<()> {
    gif2avif_core::logging::setup_logging(log_file, level)
        .map_err(|e| CoreError::OperationFailed(format!("Failed to initialize logging: {e:#}")))
}

fn run(cli: Cli) -> CliResult<i32> {
    let level = log_level(cli.verbose);

    match cli.command {
        Commands::Convert(args) => {
            let output = resolve_output_path(&args.input_path, args.output.as_deref())?;
            let files = discover_convert_files(&args)?;

            let log_file = prepare_log_file(&args, &output)?;
            init_logging(log_file.as_deref(), level)?;
            if let Some(path) = &log_file {
                debug!("Log file: {}", path.display());
            }
            debug!("Run started: {}", chrono::Local::now());

            let summary = run_convert(args, files, output)?;
            debug!("Finished at: {}", chrono::Local::now());
            Ok(i32::from(summary.has_failures()))
        }
        Commands::Check(args) => {
            init_logging(None, level)?;
            run_check(&args)
        }
    }
}

fn main() {
    let cli = parse_cli();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            terminal::print_error(&format!("Error: {e}"));
            1
        }
    };
    process::exit(code);
}
