//! Implementation of the 'check' subcommand.
//!
//! Lists where each external tool was found and runs the same dependency
//! check a conversion performs before its first job.

use crate::cli::CheckArgs;
use crate::error::CliResult;
use crate::terminal;

use gif2avif_core::external::{AVIFENC, FFMPEG, FFPROBE, GIFSICLE, find_on_path, find_tool};
use gif2avif_core::{CoreConfig, check_dependencies};

use std::path::PathBuf;

/// Where one tool was found, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub name: &'static str,
    pub path: Option<PathBuf>,
    pub required: bool,
}

/// Locates every tool. gifsicle is required only with `alpha_cleanup`, ffprobe
/// only with `strict_probe`.
///
/// ffprobe is looked up on `PATH` only, matching how it is invoked.
pub fn locate_tools(args: &CheckArgs) -> Vec<ToolStatus> {
    vec![
        ToolStatus {
            name: FFMPEG,
            path: find_tool(FFMPEG),
            required: true,
        },
        ToolStatus {
            name: FFPROBE,
            path: find_on_path(FFPROBE),
            required: args.strict_probe,
        },
        ToolStatus {
            name: AVIFENC,
            path: find_tool(AVIFENC),
            required: true,
        },
        ToolStatus {
            name: GIFSICLE,
            path: find_tool(GIFSICLE),
            required: args.alpha_cleanup,
        },
    ]
}

/// Prints tool locations. Returns the process exit code.
pub fn run_check(args: &CheckArgs) -> CliResult<i32> {
    terminal::print_section("Dependencies");
    for tool in locate_tools(args) {
        let location = match (&tool.path, tool.required) {
            (Some(path), _) => path.display().to_string(),
            (None, true) => "not found".to_string(),
            (None, false) => "not found (optional)".to_string(),
        };
        terminal::print_status(tool.name, &location);
    }

    let config = CoreConfig {
        alpha_cleanup: args.alpha_cleanup,
        strict_probe: args.strict_probe,
        ..Default::default()
    };
    match check_dependencies(&config) {
        Ok(_) => {
            terminal::print_success("All required tools are available");
            Ok(0)
        }
        Err(e) if e.is_tool_unavailable() => {
            terminal::print_error(&e.to_string());
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(args: &CheckArgs) -> Vec<&'static str> {
        locate_tools(args)
            .into_iter()
            .filter(|t| t.required)
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn only_decoder_and_encoder_are_required_by_default() {
        let args = CheckArgs {
            alpha_cleanup: false,
            strict_probe: false,
        };
        let names: Vec<&str> = locate_tools(&args).iter().map(|t| t.name).collect();
        assert_eq!(names, [FFMPEG, FFPROBE, AVIFENC, GIFSICLE]);
        assert_eq!(required(&args), [FFMPEG, AVIFENC]);
    }

    #[test]
    fn flags_make_optional_tools_required() {
        let args = CheckArgs {
            alpha_cleanup: true,
            strict_probe: true,
        };
        assert_eq!(required(&args), [FFMPEG, FFPROBE, AVIFENC, GIFSICLE]);
    }
}
