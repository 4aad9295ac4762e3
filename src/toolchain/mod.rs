//! Toolchain adapters
//!
//! Each supported language is paired with a [`ToolchainAdapter`] that knows
//! how to turn a snippet into a finished [`ExecutionOutcome`]. Three shapes
//! cover every language:
//!
//! - [`InterpreterBridge`]: feeds the snippet to an interpreter over stdin
//! - [`CompileThenRun`]: writes a source file into a scratch directory,
//!   compiles it, then runs the produced unit
//! - [`ScriptInterpreter`]: passes the snippet as an interpreter argument
//!
//! Adapters never return errors. A missing executable, a compiler failure, a
//! non-zero exit or a timeout all come back as an outcome with the matching
//! [`ExecutionStatus`].

mod adapter;
mod bridge;
mod compile;
pub mod mock;
mod outcome;
mod process;
mod registry;
mod script;
mod template;

pub use adapter::{AdapterVariant, ExecutionContext, ToolchainAdapter};
pub use bridge::InterpreterBridge;
pub use compile::CompileThenRun;
pub use mock::{MockCommandRunner, MockProcess, RecordedRun};
pub use outcome::{ExecutionOutcome, ExecutionStatus, TIMEOUT_MARKER};
pub use process::{CommandRunner, Invocation, ProcessError, ProcessOutput, SystemRunner};
pub use registry::{ToolchainRegistry, ENTRY_UNIT};
pub use script::ScriptInterpreter;
pub use template::{CommandTemplate, TemplateVars};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn ctx(runner: Arc<MockCommandRunner>, root: &std::path::Path) -> ExecutionContext {
        ExecutionContext::new(runner, Duration::from_secs(5)).with_scratch_root(root)
    }

    fn java() -> ToolchainAdapter {
        ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::Java)
            .map(|a| (*a).clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_compile_failure_skips_run() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            MockCommandRunner::new(["javac", "java"])
                .with_response(MockProcess::failure(1, "TempProgram.java:1: error: ';' expected")),
        );

        let outcome = java().execute("public class TempProgram {", &ctx(runner.clone(), root.path())).await;

        assert_eq!(outcome.status, ExecutionStatus::CompileError);
        assert!(outcome.stderr.contains("';' expected"));
        assert_eq!(runner.programs_run(), vec!["javac"]);
    }

    #[tokio::test]
    async fn test_compile_then_run_success_and_cleanup() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            MockCommandRunner::new(["javac", "java"])
                .with_response(MockProcess::success(""))
                .with_response(MockProcess::success("Hello\n")),
        );

        let outcome = java()
            .execute(
                "public class TempProgram { public static void main(String[] a) {} }",
                &ctx(runner.clone(), root.path()),
            )
            .await;

        assert_eq!(outcome.status, ExecutionStatus::Success);
        assert_eq!(outcome.stdout, "Hello\n");

        let runs = runner.runs();
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.dir_existed));
        assert!(runs[0].invocation.args[0].ends_with("TempProgram.java"));
        assert_eq!(runs[1].invocation.args[2], "TempProgram");

        // Scratch directory is gone after the run
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_after_compile_failure() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(
            MockCommandRunner::new(["javac", "java"]).with_response(MockProcess::failure(1, "error")),
        );

        java().execute("class", &ctx(runner, root.path())).await;

        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_compiler_is_tool_missing() {
        let root = tempfile::tempdir().unwrap();
        let runner = Arc::new(MockCommandRunner::new(["java"]));

        let outcome = java().execute("class X {}", &ctx(runner.clone(), root.path())).await;

        assert_eq!(outcome.status, ExecutionStatus::ToolMissing);
        assert!(outcome.stderr.contains("javac"));
        assert!(outcome.stderr.contains("JDK"));
        assert_eq!(runner.run_count(), 0);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_script_interpreter_passes_snippet() {
        let runner = Arc::new(MockCommandRunner::new(["node"]).with_response(MockProcess::success("hi\n")));
        let adapter = ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::JavaScript)
            .unwrap();

        let context = ExecutionContext::new(runner.clone(), Duration::from_secs(5));
        let outcome = adapter.execute("console.log('hi')", &context).await;

        assert!(outcome.is_success());
        let runs = runner.runs();
        assert_eq!(runs[0].invocation.args, vec!["-e", "console.log('hi')"]);
        assert!(runs[0].invocation.current_dir.is_none());
    }

    #[tokio::test]
    async fn test_python_falls_back_to_python3() {
        let runner = Arc::new(MockCommandRunner::new(["python3"]));
        let adapter = ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::Python)
            .unwrap();

        let context = ExecutionContext::new(runner.clone(), Duration::from_secs(5));
        let outcome = adapter.execute("print('x')", &context).await;

        assert!(outcome.is_success());
        assert_eq!(runner.programs_run(), vec!["python3"]);
    }

    #[tokio::test]
    async fn test_bridge_feeds_stdin() {
        let runner = Arc::new(MockCommandRunner::new(["python"]));
        let adapter = ToolchainRegistry::with_defaults()
            .with_python_bridge()
            .get(crate::language::LanguageTag::Python)
            .unwrap();

        let context = ExecutionContext::new(runner.clone(), Duration::from_secs(5));
        adapter.execute("print(1)", &context).await;

        let runs = runner.runs();
        assert_eq!(runs[0].invocation.args, vec!["-"]);
        assert_eq!(runs[0].invocation.stdin.as_deref(), Some("print(1)"));
    }

    #[tokio::test]
    async fn test_timeout_becomes_runtime_error() {
        let runner = Arc::new(MockCommandRunner::new(["Rscript"]).with_response(MockProcess::timeout()));
        let adapter = ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::R)
            .unwrap();

        let context = ExecutionContext::new(runner, Duration::from_secs(2));
        let outcome = adapter.execute("while(TRUE){}", &context).await;

        assert_eq!(outcome.status, ExecutionStatus::RuntimeError);
        assert!(outcome.timed_out);
        assert!(outcome.stderr.contains(TIMEOUT_MARKER));
    }

    #[tokio::test]
    async fn test_timeout_keeps_partial_output() {
        let runner = Arc::new(MockCommandRunner::new(["node"]).with_response(MockProcess::Timeout {
            stdout: "tick\n".to_string(),
            stderr: "warning: slow".to_string(),
        }));
        let adapter = ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::JavaScript)
            .unwrap();

        let context = ExecutionContext::new(runner, Duration::from_millis(1500));
        let outcome = adapter.execute("for(;;){}", &context).await;

        assert!(outcome.timed_out);
        assert_eq!(outcome.stdout, "tick\n");
        assert_eq!(
            outcome.stderr,
            "warning: slow\n[polyrun] process timed out after 1500ms"
        );
        assert_eq!(
            outcome.diagnostic(),
            "warning: slow\n[polyrun] process timed out after 1500ms"
        );
    }

    #[tokio::test]
    async fn test_runtime_error_keeps_exit_code() {
        let runner = Arc::new(
            MockCommandRunner::new(["micropython"]).with_response(MockProcess::failure(1, "NameError")),
        );
        let adapter = ToolchainRegistry::with_defaults()
            .get(crate::language::LanguageTag::MicroPython)
            .unwrap();

        let context = ExecutionContext::new(runner, Duration::from_secs(5));
        let outcome = adapter.execute("foo()", &context).await;

        assert_eq!(outcome.status, ExecutionStatus::RuntimeError);
        assert_eq!(outcome.exit_code, Some(1));
        assert_eq!(outcome.diagnostic(), "NameError");
    }
}
