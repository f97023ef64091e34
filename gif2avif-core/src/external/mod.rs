// ============================================================================
// gif2avif-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates every subprocess the pipeline talks to: ffprobe
// for stream inspection, ffmpeg for frame extraction, avifenc for encoding and
// the optional gifsicle pre-pass. Each is hidden behind a trait so the
// pipeline can be driven by mocks in tests.
//
// KEY COMPONENTS:
// - Traits for tool interactions (FfprobeExecutor, FfmpegSpawner, ExternalTool)
// - Concrete implementations (CrateFfprobeExecutor, SidecarSpawner, ProcessTool)
// - Tool discovery and dependency checking
// - Toolchain: the bundle of tools one conversion job needs

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Traits and implementations for executing ffmpeg commands
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe commands
pub mod ffprobe_executor;

/// Generic process execution for avifenc and gifsicle
pub mod tool;

#[cfg(test)]
pub(crate) mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};
pub use tool::{ExternalTool, ProcessTool, ToolOutput};

// ============================================================================
// TOOL NAMES
// ============================================================================

pub const FFMPEG: &str = "ffmpeg";
pub const FFPROBE: &str = "ffprobe";
pub const AVIFENC: &str = "avifenc";
pub const GIFSICLE: &str = "gifsicle";

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that a command can be started by running it with `version_arg`.
///
/// The exit status is ignored; only the ability to start matters.
pub(crate) fn check_dependency(program: &Path, version_arg: &str) -> CoreResult<()> {
    let name = program.display().to_string();
    let result = Command::new(program)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{name}' not found.");
            Err(CoreError::DependencyNotFound(name))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{name}': {e}");
            Err(CoreError::CommandStart(name, e))
        }
    }
}

/// Locates a tool: next to the running executable first, then on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    let beside_exe = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .and_then(|dir| find_in_dir(&dir, name));

    beside_exe.or_else(|| find_on_path(name))
}

/// Locates a tool on `PATH` only.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var).find_map(|dir| find_in_dir(&dir, name))
}

fn find_in_dir(dir: &Path, name: &str) -> Option<PathBuf> {
    [name.to_string(), format!("{name}.exe")]
        .into_iter()
        .map(|candidate| dir.join(candidate))
        .find(|candidate| candidate.is_file())
}

/// Resolved locations of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    /// Missing ffprobe only matters with `strict_probe`; otherwise every job
    /// falls back to the default frame rate.
    pub ffprobe: Option<PathBuf>,
    pub avifenc: PathBuf,
    /// Only resolved when the alpha cleanup pre-pass is enabled.
    pub gifsicle: Option<PathBuf>,
}

/// Resolves every tool the configuration needs and checks each can be started.
///
/// All missing required tools are reported together in a single
/// [`CoreError::DependencyNotFound`]. ffprobe is looked up on `PATH` only,
/// since the probe crate invokes it by name, and is required only with
/// `strict_probe`.
pub fn check_dependencies(config: &CoreConfig) -> CoreResult<ToolPaths> {
    check_dependencies_with(config, |name, path_only| {
        if path_only { find_on_path(name) } else { find_tool(name) }
    })
}

/// [`check_dependencies`] with a custom tool locator taking `(name, path_only)`.
pub(crate) fn check_dependencies_with<F>(config: &CoreConfig, locate: F) -> CoreResult<ToolPaths>
where
    F: Fn(&str, bool) -> Option<PathBuf>,
{
    let usable = |name: &str, path_only: bool| {
        locate(name, path_only).filter(|path| check_dependency(path, version_arg(name)).is_ok())
    };

    let mut missing = Vec::new();
    let mut require = |name: &str, found: Option<PathBuf>| {
        if found.is_none() {
            missing.push(name.to_string());
        }
        found
    };

    let ffmpeg = require(FFMPEG, usable(FFMPEG, false));
    let ffprobe = usable(FFPROBE, true);
    let ffprobe = if config.strict_probe {
        require(FFPROBE, ffprobe)
    } else {
        if ffprobe.is_none() {
            log::warn!("ffprobe not found; frame rates will default to 25/1");
        }
        ffprobe
    };
    let avifenc = require(AVIFENC, usable(AVIFENC, false));
    let gifsicle = if config.alpha_cleanup {
        require(GIFSICLE, usable(GIFSICLE, false))
    } else {
        None
    };

    match (ffmpeg, avifenc) {
        (Some(ffmpeg), Some(avifenc)) if missing.is_empty() => Ok(ToolPaths {
            ffmpeg,
            ffprobe,
            avifenc,
            gifsicle,
        }),
        _ => Err(CoreError::DependencyNotFound(missing.join(", "))),
    }
}

fn version_arg(name: &str) -> &'static str {
    match name {
        FFMPEG | FFPROBE => "-version",
        _ => "--version",
    }
}

// ============================================================================
// TOOLCHAIN
// ============================================================================

/// The tools one conversion job uses.
///
/// Generic so tests can substitute mocks for every collaborator.
#[derive(Debug, Clone)]
pub struct Toolchain<P, S, T> {
    pub ffprobe: P,
    pub ffmpeg: S,
    pub avifenc: T,
    pub gifsicle: Option<T>,
}

/// Toolchain backed by the real executables.
pub type SystemToolchain = Toolchain<CrateFfprobeExecutor, SidecarSpawner, ProcessTool>;

impl SystemToolchain {
    /// Builds the real toolchain from resolved tool paths. `tool_timeout` applies to avifenc and gifsicle.
    pub fn from_paths(paths: &ToolPaths, config: &CoreConfig) -> Self {
        Toolchain {
            ffprobe: CrateFfprobeExecutor::new(),
            ffmpeg: SidecarSpawner::with_binary(paths.ffmpeg.clone()),
            avifenc: ProcessTool::new(AVIFENC, paths.avifenc.clone())
                .with_timeout(config.tool_timeout),
            gifsicle: paths
                .gifsicle
                .as_ref()
                .map(|path| ProcessTool::new(GIFSICLE, path.clone()).with_timeout(config.tool_timeout)),
        }
    }
}
