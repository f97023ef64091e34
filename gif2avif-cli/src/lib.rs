// gif2avif-cli/src/lib.rs
//
// Library portion of the gif2avif CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output_path;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{CheckArgs, Cli, Commands, ConvertArgs, parse_cli, parse_cli_from};
pub use commands::check::run_check;
pub use commands::convert::{discover_convert_files, prepare_log_file, run_convert};
pub use error::{CliErrorContext, CliResult};
pub use output_path::{OutputPathInfo, resolve_output_path};
