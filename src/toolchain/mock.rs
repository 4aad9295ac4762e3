use super::process::{CommandRunner, Invocation, ProcessError, ProcessOutput};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted result for one mock process run
#[derive(Debug, Clone)]
pub enum MockProcess {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Killed at the deadline after writing the given partial output
    Timeout { stdout: String, stderr: String },
}

impl MockProcess {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::Timeout {
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

/// A recorded call, including whether its working directory existed at the time
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub invocation: Invocation,
    pub dir_existed: bool,
}

/// Command runner that never spawns anything.
///
/// Programs count as installed only when listed. Runs consume scripted
/// responses in FIFO order; once the queue is empty every run succeeds with
/// empty output.
pub struct MockCommandRunner {
    installed: HashSet<String>,
    responses: Mutex<VecDeque<MockProcess>>,
    runs: Mutex<Vec<RecordedRun>>,
}

impl MockCommandRunner {
    pub fn new<I, S>(installed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: installed.into_iter().map(Into::into).collect(),
            responses: Mutex::new(VecDeque::new()),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(self, response: MockProcess) -> Self {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(response);
        }
        self
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn programs_run(&self) -> Vec<String> {
        self.runs()
            .into_iter()
            .map(|r| r.invocation.program_name())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.installed
            .contains(program)
            .then(|| PathBuf::from(program))
    }

    async fn run(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let dir_existed = invocation
            .current_dir
            .as_ref()
            .map(|d| d.is_dir())
            .unwrap_or(false);
        if let Ok(mut runs) = self.runs.lock() {
            runs.push(RecordedRun {
                invocation: invocation.clone(),
                dir_existed,
            });
        }

        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(MockProcess::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(ProcessOutput {
                exit_code: Some(code),
                stdout,
                stderr,
            }),
            Some(MockProcess::Timeout { stdout, stderr }) => Err(ProcessError::Timeout {
                program: invocation.program_name(),
                timeout,
                stdout,
                stderr,
            }),
            None => Ok(ProcessOutput {
                exit_code: Some(0),
                ..Default::default()
            }),
        }
    }
}
