use super::artifact::PipelineArtifact;
use super::phase_trait::{CompilerPipeline, SemanticError};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Drives a [`CompilerPipeline`] through its phases in order
#[derive(Clone)]
pub struct PipelineOrchestrator {
    pipeline: Arc<dyn CompilerPipeline>,
    progress_handler: Arc<dyn ProgressHandler>,
}

impl PipelineOrchestrator {
    pub fn new(
        pipeline: Arc<dyn CompilerPipeline>,
        progress_handler: Arc<dyn ProgressHandler>,
    ) -> Self {
        Self {
            pipeline,
            progress_handler,
        }
    }

    /// Runs all six phases. A semantic failure stops the run before lowering.
    pub fn execute(
        &self,
        snippet: &str,
        definition_keywords: &[&str],
    ) -> Result<PipelineArtifact, SemanticError> {
        let pipeline = self.pipeline.as_ref();

        let tokens = self.phase("tokenize", || pipeline.tokenize(snippet));
        let tree = self.phase("parse", || pipeline.parse(&tokens));
        self.phase("check_semantics", || {
            pipeline.check_semantics(&tree, definition_keywords)
        })?;
        let ir = self.phase("lower_to_ir", || pipeline.lower_to_ir(&tree));
        let optimized_ir = self.phase("optimize", || pipeline.optimize(&ir));
        let target_code = self.phase("generate_target", || {
            pipeline.generate_target(&optimized_ir)
        });

        debug!(
            tokens = tokens.len(),
            target_len = target_code.len(),
            "Pipeline complete"
        );

        Ok(PipelineArtifact {
            tokens,
            tree,
            ir,
            optimized_ir,
            target_code,
        })
    }

    fn phase<T>(&self, name: &'static str, f: impl FnOnce() -> T) -> T {
        info!("Phase: {}", name);
        self.progress_handler
            .on_progress(&ProgressEvent::PhaseStarted { phase: name });

        let start = Instant::now();
        let output = f();

        self.progress_handler.on_progress(&ProgressEvent::PhaseComplete {
            phase: name,
            duration: start.elapsed(),
        });
        output
    }
}

impl Default for PipelineOrchestrator {
    fn default() -> Self {
        Self::new(Arc::new(super::StubPipeline), Arc::new(NoOpHandler))
    }
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator").finish_non_exhaustive()
    }
}
