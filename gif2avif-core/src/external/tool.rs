//! Generic external command execution for avifenc and gifsicle.
//!
//! `ProcessTool` runs a program with piped stdout/stderr, drains both streams
//! on reader threads and optionally enforces a timeout by polling the child.
//! A timed-out child is killed before the error is returned.

use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Last non-empty stderr line, or a generic description of the exit.
    pub fn failure_summary(&self) -> String {
        self.stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| match self.exit_code {
                Some(code) => format!("exited with code {code}"),
                None => "terminated by signal".to_string(),
            })
    }
}

/// An external program the pipeline invokes with a list of arguments.
pub trait ExternalTool {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Runs the tool to completion. A non-zero exit is reported through
    /// [`ToolOutput::exit_code`], not as an error; errors mean the tool could
    /// not be started, waited on, or timed out.
    fn invoke(&self, args: &[OsString]) -> CoreResult<ToolOutput>;
}

/// [`ExternalTool`] that spawns a real process.
#[derive(Debug, Clone)]
pub struct ProcessTool {
    name: String,
    program: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessTool {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn wait_with_timeout(&self, child: &mut Child, timeout: Duration) -> CoreResult<ExitStatus> {
        let start = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if start.elapsed() >= timeout => {
                    log::warn!("{} timed out after {:?}, killing it", self.name, timeout);
                    if let Err(e) = child.kill() {
                        log::debug!("Failed to kill {}: {e}", self.name);
                    }
                    // Reap the child so it does not linger as a zombie.
                    let _ = child.wait();
                    return Err(CoreError::CommandTimeout(self.name.clone(), timeout));
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => return Err(command_wait_error(self.name.clone(), e)),
            }
        }
    }
}

impl ExternalTool for ProcessTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, args: &[OsString]) -> CoreResult<ToolOutput> {
        log::debug!(
            "Running {}: {} {}",
            self.name,
            self.program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(self.name.clone(), e))?;

        let stdout_handle = child.stdout.take().map(|out| spawn_reader(out, false));
        let stderr_handle = child.stderr.take().map(|err| spawn_reader(err, true));

        let status = match self.timeout {
            Some(timeout) => self.wait_with_timeout(&mut child, timeout),
            None => child
                .wait()
                .map_err(|e| command_wait_error(self.name.clone(), e)),
        }?;

        let output = ToolOutput {
            exit_code: status.code(),
            stdout: join_reader(stdout_handle),
            stderr: join_reader(stderr_handle),
        };

        if !output.success() {
            log::debug!("{} exited with {}: {}", self.name, status, output.stderr.trim());
        }
        Ok(output)
    }
}

fn spawn_reader<R: Read + Send + 'static>(stream: R, is_stderr: bool) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut lines = Vec::new();
        for line in BufReader::new(stream).lines().map_while(Result::ok) {
            if is_stderr {
                log::trace!("STDERR: {line}");
            } else {
                log::trace!("STDOUT: {line}");
            }
            lines.push(line);
        }
        lines.join("\n")
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
