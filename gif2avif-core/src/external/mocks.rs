// gif2avif-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---
//
// Stand-ins for ffprobe, ffmpeg and the generic tools. They record the
// arguments they receive and fabricate the files the real tools would write,
// so the whole pipeline runs without any external binaries. State is shared
// behind Arc<Mutex> so the mocks are Sync and usable from the batch driver.

use super::*;
use crate::error::{CoreError, CoreResult};
use crate::processing::frames::frame_file_name;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::ffi::OsString;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::{Arc, Mutex};

fn exit_status(code: i32) -> ExitStatus {
    ExitStatus::from_raw(code << 8)
}

// ---- ffprobe ----

/// Mock implementation of FfprobeExecutor.
///
/// Returns the configured rate for every call until an error is queued; a
/// queued error is returned once.
#[derive(Clone)]
pub struct MockFfprobeExecutor {
    rate: Arc<Mutex<Option<String>>>,
    error: Arc<Mutex<Option<CoreError>>>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl Default for MockFfprobeExecutor {
    fn default() -> Self {
        Self::with_rate("25/1")
    }
}

impl MockFfprobeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(rate: &str) -> Self {
        Self {
            rate: Arc::new(Mutex::new(Some(rate.to_string()))),
            error: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_result(&self, result: CoreResult<Option<String>>) {
        match result {
            Ok(rate) => {
                *self.rate.lock().unwrap() = rate;
                *self.error.lock().unwrap() = None;
            }
            Err(e) => *self.error.lock().unwrap() = Some(e),
        }
    }

    /// Makes the next call fail as if ffprobe were not installed.
    pub fn fail_with_missing_tool(&self) {
        self.set_result(Err(CoreError::CommandStart(
            "ffprobe".to_string(),
            io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        )));
    }

    pub fn received_calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn get_average_frame_rate(&self, input_path: &Path) -> CoreResult<Option<String>> {
        self.calls.lock().unwrap().push(input_path.to_path_buf());
        if let Some(err) = self.error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(self.rate.lock().unwrap().clone())
    }
}

// ---- ffmpeg ----

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    events: Vec<FfmpegEvent>,
    exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

#[derive(Clone)]
enum SpawnBehavior {
    /// Write this many frames and exit successfully.
    Frames(usize),
    /// Write nothing, report an error line and exit with the code.
    Exit(i32, String),
    /// Fail to start.
    SpawnError,
    /// Delete the whole workspace, then exit with the code.
    RemoveWorkspace(i32),
}

/// Mock implementation of FfmpegSpawner.
///
/// On success it writes the requested number of frames using the output
/// pattern's directory (the last argument), named like ffmpeg would.
#[derive(Clone)]
pub struct MockFfmpegSpawner {
    behavior: SpawnBehavior,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new(frame_count: usize) -> Self {
        Self {
            behavior: SpawnBehavior::Frames(frame_count),
            received_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_exit(code: i32, message: &str) -> Self {
        Self {
            behavior: SpawnBehavior::Exit(code, message.to_string()),
            ..Self::new(0)
        }
    }

    /// Removes the workspace holding the frames directory and exits with `code`.
    pub fn removing_workspace(code: i32) -> Self {
        Self {
            behavior: SpawnBehavior::RemoveWorkspace(code),
            ..Self::new(0)
        }
    }

    pub fn failing_spawn() -> Self {
        Self {
            behavior: SpawnBehavior::SpawnError,
            ..Self::new(0)
        }
    }

    pub fn received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        self.received_calls.lock().unwrap().push(args.to_vec());

        match &self.behavior {
            SpawnBehavior::Frames(count) => {
                let pattern = PathBuf::from(args.last().cloned().unwrap_or_default());
                let dir = pattern.parent().map(Path::to_path_buf).unwrap_or_default();
                for index in 1..=*count {
                    std::fs::write(dir.join(frame_file_name(index)), format!("frame {index}"))?;
                }
                Ok(MockFfmpegProcess {
                    events: vec![FfmpegEvent::Log(LogLevel::Info, "mock decode".to_string())],
                    exit_status: exit_status(0),
                })
            }
            SpawnBehavior::Exit(code, message) => Ok(MockFfmpegProcess {
                events: vec![FfmpegEvent::Log(LogLevel::Error, message.clone())],
                exit_status: exit_status(*code),
            }),
            SpawnBehavior::RemoveWorkspace(code) => {
                let pattern = PathBuf::from(args.last().cloned().unwrap_or_default());
                if let Some(workspace) = pattern.parent().and_then(Path::parent) {
                    std::fs::remove_dir_all(workspace)?;
                }
                Ok(MockFfmpegProcess {
                    events: vec![FfmpegEvent::Log(LogLevel::Error, "workspace vanished".to_string())],
                    exit_status: exit_status(*code),
                })
            }
            SpawnBehavior::SpawnError => Err(CoreError::CommandStart(
                "ffmpeg (sidecar)".to_string(),
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            )),
        }
    }
}

// ---- generic tools (avifenc, gifsicle) ----

/// Mock implementation of ExternalTool.
#[derive(Clone)]
pub struct MockTool {
    name: String,
    exit_code: i32,
    stderr: String,
    output_flag: Option<String>,
    start_error: bool,
    remove_output_dir: bool,
    received_calls: Arc<Mutex<Vec<Vec<OsString>>>>,
}

impl MockTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            exit_code: 0,
            stderr: String::new(),
            output_flag: None,
            start_error: false,
            remove_output_dir: false,
            received_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// On success, writes a non-empty file at the argument following `flag`.
    pub fn writes_arg_after(mut self, flag: &str) -> Self {
        self.output_flag = Some(flag.to_string());
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_string();
        self
    }

    /// Deletes the directory of the argument following the output flag.
    pub fn removes_output_dir(mut self) -> Self {
        self.remove_output_dir = true;
        self
    }

    pub fn fails_to_start(mut self) -> Self {
        self.start_error = true;
        self
    }

    pub fn received_calls(&self) -> Vec<Vec<OsString>> {
        self.received_calls.lock().unwrap().clone()
    }
}

impl ExternalTool for MockTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, args: &[OsString]) -> CoreResult<ToolOutput> {
        self.received_calls.lock().unwrap().push(args.to_vec());

        if self.start_error {
            return Err(CoreError::CommandStart(
                self.name.clone(),
                io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            ));
        }

        let target = self.output_flag.as_ref().and_then(|flag| {
            args.iter()
                .position(|a| a.to_str() == Some(flag.as_str()))
                .and_then(|i| args.get(i + 1))
                .map(PathBuf::from)
        });

        if let Some(target) = &target {
            if self.remove_output_dir {
                if let Some(dir) = target.parent() {
                    std::fs::remove_dir_all(dir)?;
                }
            } else if self.exit_code == 0 {
                std::fs::write(target, b"mock output")?;
            }
        }

        Ok(ToolOutput {
            exit_code: Some(self.exit_code),
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}
