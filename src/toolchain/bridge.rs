use super::adapter::ExecutionContext;
use super::outcome::{ExecutionOutcome, ExecutionStatus};
use super::template::{CommandTemplate, TemplateVars};

/// Evaluates the snippet in a separate interpreter process fed over stdin.
///
/// Snippet text is never evaluated inside the polyrun process itself; the
/// interpreter child is the only place it runs.
#[derive(Debug, Clone)]
pub struct InterpreterBridge {
    pub command: CommandTemplate,
    pub install_hint: String,
}

impl InterpreterBridge {
    pub fn new(command: CommandTemplate, install_hint: impl Into<String>) -> Self {
        Self {
            command,
            install_hint: install_hint.into(),
        }
    }

    pub async fn execute(&self, snippet: &str, ctx: &ExecutionContext) -> ExecutionOutcome {
        let program = match ctx.resolve(&self.command, &self.install_hint) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };

        let output = match ctx
            .invoke(
                program,
                &self.command,
                &TemplateVars::default(),
                Some(snippet),
                &self.install_hint,
            )
            .await
        {
            Ok(output) => output,
            Err(outcome) => return outcome,
        };

        let status = if output.success() {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::RuntimeError
        };
        ExecutionOutcome::new(status, output.stdout, output.stderr, output.exit_code)
    }
}
