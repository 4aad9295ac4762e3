//! External process execution
//!
//! Every toolchain invocation goes through a [`CommandRunner`]. The
//! production [`SystemRunner`] resolves executables on `PATH` with `which`
//! and spawns them with `tokio::process`, capturing stdout and stderr through
//! separate pipes. Children are spawned with `kill_on_drop`, so a timeout or a
//! dropped run future kills the process instead of leaving it running.

use super::outcome::format_timeout;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{ChildStdin, Command};
use tokio::task::JoinHandle;
use tracing::debug;

/// How long pipe readers may keep draining after a timed-out child is killed
const DRAIN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Executable not found: {program}")]
    NotFound { program: String },

    /// Carries whatever the child wrote before it was killed
    #[error("{program} timed out after {}", format_timeout(*.timeout))]
    Timeout {
        program: String,
        timeout: Duration,
        stdout: String,
        stderr: String,
    },

    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// One fully rendered external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub stdin: Option<String>,
    pub current_dir: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            stdin: None,
            current_dir: None,
        }
    }

    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Resolves an executable name to a path, `None` when it is not installed
    fn resolve(&self, program: &str) -> Option<PathBuf>;

    /// Runs the invocation to completion or until `timeout` expires
    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }

    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let program = invocation.program_name();
        let start = Instant::now();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &invocation.current_dir {
            cmd.current_dir(dir);
        }

        debug!(program = %program, args = invocation.args.len(), "Spawning process");

        let mut child = cmd.spawn().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ProcessError::NotFound {
                    program: program.clone(),
                }
            } else {
                ProcessError::Io {
                    program: program.clone(),
                    source,
                }
            }
        })?;

        let stdin_pipe = child.stdin.take();
        let (stdout_buf, stdout_reader) = capture(child.stdout.take());
        let (stderr_buf, stderr_reader) = capture(child.stderr.take());

        let waited = tokio::time::timeout(timeout, async {
            let ((), status) = tokio::join!(
                feed_stdin(stdin_pipe, invocation.stdin.as_deref()),
                child.wait()
            );
            status
        })
        .await;

        let status = match waited {
            Ok(Ok(status)) => {
                let _ = tokio::join!(stdout_reader, stderr_reader);
                status
            }
            Ok(Err(source)) => {
                stdout_reader.abort();
                stderr_reader.abort();
                return Err(ProcessError::Io { program, source });
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    debug!(program = %program, error = %e, "Failed to kill timed-out process");
                }
                // Grandchildren may still hold the pipes open
                let abort_stdout = stdout_reader.abort_handle();
                let abort_stderr = stderr_reader.abort_handle();
                let _ = tokio::time::timeout(DRAIN_GRACE, async {
                    let _ = tokio::join!(stdout_reader, stderr_reader);
                })
                .await;
                abort_stdout.abort();
                abort_stderr.abort();

                return Err(ProcessError::Timeout {
                    program,
                    timeout,
                    stdout: snapshot(&stdout_buf),
                    stderr: snapshot(&stderr_buf),
                });
            }
        };

        debug!(
            program = %program,
            exit_code = ?status.code(),
            elapsed_ms = start.elapsed().as_millis(),
            "Process finished"
        );

        Ok(ProcessOutput {
            exit_code: status.code(),
            stdout: snapshot(&stdout_buf),
            stderr: snapshot(&stderr_buf),
        })
    }
}

async fn feed_stdin(pipe: Option<ChildStdin>, input: Option<&str>) {
    if let (Some(mut pipe), Some(input)) = (pipe, input) {
        // The child may exit without reading everything; a broken pipe is not our failure
        if let Err(e) = pipe.write_all(input.as_bytes()).await {
            debug!(error = %e, "Child closed stdin early");
        }
        let _ = pipe.shutdown().await;
    }
}

/// Drains a pipe into a shared buffer so partial output survives a kill
fn capture<R>(pipe: Option<R>) -> (Arc<Mutex<Vec<u8>>>, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = buffer.clone();
    let reader = tokio::spawn(async move {
        let Some(mut pipe) = pipe else { return };
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if let Ok(mut buf) = sink.lock() {
                        buf.extend_from_slice(&chunk[..n]);
                    }
                }
            }
        }
    });
    (buffer, reader)
}

fn snapshot(buffer: &Mutex<Vec<u8>>) -> String {
    buffer
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).to_string())
        .unwrap_or_default()
}
