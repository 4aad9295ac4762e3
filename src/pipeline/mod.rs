//! Nominal compilation pipeline
//!
//! tokenize → parse → check_semantics → lower_to_ir → optimize → generate_target.
//! Real per-language implementations plug in through [`CompilerPipeline`]; the
//! default [`StubPipeline`] only enforces that every function-definition
//! keyword is followed by a parameter list.

mod artifact;
mod orchestrator;
mod phase_trait;

pub use artifact::{PipelineArtifact, SyntaxTree};
pub use orchestrator::PipelineOrchestrator;
pub use phase_trait::{CompilerPipeline, SemanticError, StubPipeline};
