//! polyrun - detect, compile and run source snippets of unknown language
//!
//! A snippet goes through four stages:
//!
//! 1. **Detection**: lexical signatures and a fixed precedence order pick one
//!    of Java, Python, JavaScript, R, Kotlin or MicroPython
//! 2. **Pipeline**: a nominal six-phase compiler pipeline whose semantic check
//!    rejects function definitions without a parameter list
//! 3. **Execution**: the language's toolchain adapter compiles and/or runs the
//!    snippet as an external process, with a timeout
//! 4. **Recovery**: compile and runtime failures are sent to a generative model
//!    for a suggested fix
//!
//! # Example Usage
//!
//! ```no_run
//! use polyrun::{Dispatcher, ExecutionContext, ToolchainRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::new(ToolchainRegistry::with_defaults(), ExecutionContext::default());
//! let report = dispatcher.run("print(\"hi\")").await?;
//!
//! println!("{}: {}", report.detection.language, report.outcome.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`language`]: language tags, signature catalog and detector
//! - [`pipeline`]: compiler phase interface and orchestrator
//! - [`toolchain`]: adapters, process runner and registry
//! - [`recovery`]: repair prompt and advisor
//! - [`llm`]: model client abstraction
//! - [`dispatch`]: the end-to-end run

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod progress;
pub mod recovery;
pub mod toolchain;
pub mod util;

pub use config::{ConfigError, PolyrunConfig};
pub use dispatch::{DispatchError, Dispatcher, RunReport};
pub use language::{DetectionError, DetectionResult, Detector, LanguageTag, SignatureCatalog};
pub use llm::{BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use pipeline::{CompilerPipeline, PipelineArtifact, PipelineOrchestrator, SemanticError};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use recovery::{RecoveryAdvisor, RecoverySuggestion};
pub use toolchain::{
    AdapterVariant, ExecutionContext, ExecutionOutcome, ExecutionStatus, ToolchainAdapter,
    ToolchainRegistry,
};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_polyrun() {
        assert_eq!(NAME, "polyrun");
    }
}
