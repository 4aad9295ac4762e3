use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Appended to stderr when a process is killed for exceeding its timeout
pub const TIMEOUT_MARKER: &str = "[polyrun] process timed out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    CompileError,
    RuntimeError,
    ToolMissing,
}

impl ExecutionStatus {
    /// Compile and runtime failures are code defects worth a repair suggestion.
    /// A missing tool is an environment defect and is not.
    pub fn triggers_recovery(&self) -> bool {
        matches!(self, Self::CompileError | Self::RuntimeError)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::CompileError => "compile error",
            Self::RuntimeError => "runtime error",
            Self::ToolMissing => "tool missing",
        };
        write!(f, "{}", s)
    }
}

/// `30s` for whole seconds, `1500ms` otherwise
pub(crate) fn format_timeout(timeout: Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

/// Uniform result of one adapter invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub duration_ms: u64,
}

impl ExecutionOutcome {
    pub fn new(
        status: ExecutionStatus,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            timed_out: false,
            duration_ms: 0,
        }
    }

    pub fn tool_missing(guidance: impl Into<String>) -> Self {
        Self::new(ExecutionStatus::ToolMissing, String::new(), guidance, None)
    }

    pub fn timed_out(stdout: impl Into<String>, stderr: impl Into<String>, timeout: Duration) -> Self {
        let mut stderr = stderr.into();
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&format!("{} after {}", TIMEOUT_MARKER, format_timeout(timeout)));

        Self {
            timed_out: true,
            ..Self::new(ExecutionStatus::RuntimeError, stdout, stderr, None)
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = duration.as_millis() as u64;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    /// Text handed to the recovery advisor: stderr, or stdout when stderr is empty
    pub fn diagnostic(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}
