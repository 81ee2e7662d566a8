//! Subprocess execution behind a trait so `gh` interactions can be faked.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use ghid_core::{IdentityError, Result};
use wait_timeout::ChildExt;

pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub timeout_ms: u64,
}

impl CommandRequest {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
            working_dir: None,
            timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Printable form used in error messages.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

/// Runs a command to completion. A non-zero exit is reported through
/// [`CommandOutput::success`], not as an error.
pub trait CommandRunner {
    fn run(&self, request: &CommandRequest) -> Result<CommandOutput>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Spawns real processes and kills them once the request timeout elapses.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, request: &CommandRequest) -> Result<CommandOutput> {
        let mut command = Command::new(request.program.trim());
        command
            .args(request.args.iter().map(String::as_str))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &request.working_dir {
            command.current_dir(dir);
        }
        let rendered = request.display();
        tracing::debug!(command = %rendered, "spawning command");

        let mut child = command.spawn().map_err(|error| IdentityError::Account {
            message: format!("failed to spawn {rendered}: {error}"),
        })?;
        let stdout = child.stdout.take().map(spawn_pipe_reader);
        let stderr = child.stderr.take().map(spawn_pipe_reader);

        let timeout = Duration::from_millis(request.timeout_ms.max(1));
        let waited = child
            .wait_timeout(timeout)
            .map_err(|error| IdentityError::Account {
                message: format!("failed while waiting for {rendered}: {error}"),
            })?;
        let Some(status) = waited else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(IdentityError::Account {
                message: format!(
                    "{rendered} timed out after {} ms",
                    request.timeout_ms.max(1)
                ),
            });
        };

        Ok(CommandOutput {
            success: status.success(),
            code: status.code(),
            stdout: join_pipe_reader(stdout),
            stderr: join_pipe_reader(stderr),
        })
    }
}

fn spawn_pipe_reader<R>(mut pipe: R) -> thread::JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn join_pipe_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
