use super::adapter::ExecutionContext;
use super::outcome::{ExecutionOutcome, ExecutionStatus};
use super::template::{CommandTemplate, TemplateVars};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Compiles the snippet in a scratch directory, then runs the result.
///
/// The scratch directory is a [`TempDir`] guard, so it is removed on every
/// exit path, including a timeout or a cancelled run future.
#[derive(Debug, Clone)]
pub struct CompileThenRun {
    pub compile: CommandTemplate,
    pub run: CommandTemplate,
    /// File name the snippet is written to, e.g. `TempProgram.java`
    pub entry_file: String,
    /// Unit the run command starts, e.g. `TempProgram`
    pub entry_unit: String,
    pub install_hint: String,
}

impl CompileThenRun {
    pub fn new(
        compile: CommandTemplate,
        run: CommandTemplate,
        entry_file: impl Into<String>,
        entry_unit: impl Into<String>,
        install_hint: impl Into<String>,
    ) -> Self {
        Self {
            compile,
            run,
            entry_file: entry_file.into(),
            entry_unit: entry_unit.into(),
            install_hint: install_hint.into(),
        }
    }

    fn create_scratch(ctx: &ExecutionContext) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("polyrun-");
        match &ctx.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    pub async fn execute(&self, snippet: &str, ctx: &ExecutionContext) -> ExecutionOutcome {
        // Both tools must exist before anything touches the disk
        let compiler = match ctx.resolve(&self.compile, &self.install_hint) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let launcher = match ctx.resolve(&self.run, &self.install_hint) {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };

        let scratch = match Self::create_scratch(ctx) {
            Ok(dir) => dir,
            Err(e) => {
                return ExecutionOutcome::new(
                    ExecutionStatus::RuntimeError,
                    "",
                    format!("Failed to create scratch directory: {}", e),
                    None,
                )
            }
        };

        let outcome = self.compile_and_run(snippet, ctx, &scratch, compiler, launcher).await;

        let path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!(dir = %path.display(), error = %e, "Failed to remove scratch directory");
        }
        outcome
    }

    async fn compile_and_run(
        &self,
        snippet: &str,
        ctx: &ExecutionContext,
        scratch: &TempDir,
        compiler: std::path::PathBuf,
        launcher: std::path::PathBuf,
    ) -> ExecutionOutcome {
        let dir = scratch.path();
        let file = dir.join(&self.entry_file);

        if let Err(e) = tokio::fs::write(&file, snippet).await {
            return ExecutionOutcome::new(
                ExecutionStatus::RuntimeError,
                "",
                format!("Failed to write {}: {}", file.display(), e),
                None,
            );
        }

        let vars = TemplateVars {
            snippet: Some(snippet),
            file: Some(&file),
            dir: Some(dir),
            entry: Some(&self.entry_unit),
        };

        let compiled = match ctx
            .invoke(compiler, &self.compile, &vars, None, &self.install_hint)
            .await
        {
            Ok(output) => output,
            Err(outcome) => return outcome,
        };

        if !compiled.success() {
            debug!(exit_code = ?compiled.exit_code, "Compilation failed, skipping run");
            return ExecutionOutcome::new(
                ExecutionStatus::CompileError,
                compiled.stdout,
                compiled.stderr,
                compiled.exit_code,
            );
        }

        let ran = match ctx
            .invoke(launcher, &self.run, &vars, None, &self.install_hint)
            .await
        {
            Ok(output) => output,
            Err(outcome) => return outcome,
        };

        let status = if ran.success() {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::RuntimeError
        };
        ExecutionOutcome::new(status, ran.stdout, ran.stderr, ran.exit_code)
    }
}
