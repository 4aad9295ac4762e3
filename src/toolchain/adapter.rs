use super::bridge::InterpreterBridge;
use super::compile::CompileThenRun;
use super::outcome::ExecutionOutcome;
use super::process::{CommandRunner, Invocation, ProcessError, ProcessOutput, SystemRunner};
use super::script::ScriptInterpreter;
use super::template::{CommandTemplate, TemplateVars};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterVariant {
    InProcessInterpreter,
    CompileThenRun,
    ScriptInterpreter,
}

impl fmt::Display for AdapterVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InProcessInterpreter => "in-process interpreter",
            Self::CompileThenRun => "compile-then-run",
            Self::ScriptInterpreter => "script interpreter",
        };
        write!(f, "{}", s)
    }
}

/// Environment shared by every adapter invocation of one dispatcher
#[derive(Clone)]
pub struct ExecutionContext {
    pub runner: Arc<dyn CommandRunner>,
    pub timeout: Duration,
    /// Parent directory for scratch directories, system temp dir when `None`
    pub scratch_root: Option<PathBuf>,
}

impl ExecutionContext {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self {
            runner,
            timeout,
            scratch_root: None,
        }
    }

    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Picks the first resolvable candidate, or a `ToolMissing` outcome with install guidance
    pub(crate) fn resolve(
        &self,
        template: &CommandTemplate,
        install_hint: &str,
    ) -> Result<PathBuf, ExecutionOutcome> {
        template
            .programs
            .iter()
            .find_map(|p| self.runner.resolve(p))
            .ok_or_else(|| {
                warn!(programs = %template.display_programs(), "Toolchain executable not found");
                ExecutionOutcome::tool_missing(missing_tool_guidance(
                    &template.display_programs(),
                    install_hint,
                ))
            })
    }

    /// Runs a rendered template. Failures that are not a finished process
    /// come back as a ready-made outcome.
    pub(crate) async fn invoke(
        &self,
        program: PathBuf,
        template: &CommandTemplate,
        vars: &TemplateVars<'_>,
        stdin: Option<&str>,
        install_hint: &str,
    ) -> Result<ProcessOutput, ExecutionOutcome> {
        let mut invocation = Invocation::new(program, template.render_args(vars));
        if let Some(input) = stdin {
            invocation = invocation.with_stdin(input);
        }
        if let Some(dir) = vars.dir {
            invocation = invocation.with_current_dir(dir);
        }

        debug!(program = %invocation.program_name(), "Invoking toolchain");

        match self.runner.run(&invocation, self.timeout).await {
            Ok(output) => Ok(output),
            Err(ProcessError::NotFound { program }) => Err(ExecutionOutcome::tool_missing(
                missing_tool_guidance(&program, install_hint),
            )),
            Err(ProcessError::Timeout {
                program,
                timeout,
                stdout,
                stderr,
            }) => {
                warn!(
                    program = %program,
                    timeout_ms = timeout.as_millis() as u64,
                    "Process timed out and was killed"
                );
                Err(ExecutionOutcome::timed_out(stdout, stderr, timeout))
            }
            Err(e @ ProcessError::Io { .. }) => {
                warn!(error = %e, "Process failed unexpectedly");
                Err(ExecutionOutcome::new(
                    super::ExecutionStatus::RuntimeError,
                    "",
                    e.to_string(),
                    None,
                ))
            }
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(Arc::new(SystemRunner), DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("timeout", &self.timeout)
            .field("scratch_root", &self.scratch_root)
            .finish_non_exhaustive()
    }
}

fn missing_tool_guidance(program: &str, install_hint: &str) -> String {
    format!(
        "Toolchain not found: {} is not installed or not on PATH.\n{}",
        program, install_hint
    )
}

/// The capability set used to run one language
#[derive(Debug, Clone)]
pub enum ToolchainAdapter {
    InProcessInterpreter(InterpreterBridge),
    CompileThenRun(CompileThenRun),
    ScriptInterpreter(ScriptInterpreter),
}

impl ToolchainAdapter {
    pub fn variant(&self) -> AdapterVariant {
        match self {
            Self::InProcessInterpreter(_) => AdapterVariant::InProcessInterpreter,
            Self::CompileThenRun(_) => AdapterVariant::CompileThenRun,
            Self::ScriptInterpreter(_) => AdapterVariant::ScriptInterpreter,
        }
    }

    /// Never fails: every problem is folded into the returned outcome
    pub async fn execute(&self, snippet: &str, ctx: &ExecutionContext) -> ExecutionOutcome {
        let start = Instant::now();
        let outcome = match self {
            Self::InProcessInterpreter(bridge) => bridge.execute(snippet, ctx).await,
            Self::CompileThenRun(adapter) => adapter.execute(snippet, ctx).await,
            Self::ScriptInterpreter(adapter) => adapter.execute(snippet, ctx).await,
        };
        outcome.with_duration(start.elapsed())
    }
}
