use super::adapter::ExecutionContext;
use super::outcome::{ExecutionOutcome, ExecutionStatus};
use super::template::{CommandTemplate, TemplateVars};

/// Runs the snippet with a single interpreter call, passing it as an argument
#[derive(Debug, Clone)]
pub struct ScriptInterpreter {
    pub command: CommandTemplate,
    pub install_hint: String,
}

impl ScriptInterpreter {
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

        let vars = TemplateVars {
            snippet: Some(snippet),
            ..Default::default()
        };

        match ctx
            .invoke(program, &self.command, &vars, None, &self.install_hint)
            .await
        {
            Ok(output) => {
                let status = if output.success() {
                    ExecutionStatus::Success
                } else {
                    ExecutionStatus::RuntimeError
                };
                ExecutionOutcome::new(status, output.stdout, output.stderr, output.exit_code)
            }
            Err(outcome) => outcome,
        }
    }
}
