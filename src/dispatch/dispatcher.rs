use super::error::DispatchError;
use super::report::RunReport;
use crate::language::{DetectionResult, Detector};
use crate::pipeline::{CompilerPipeline, PipelineOrchestrator, StubPipeline};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::recovery::{RecoveryAdvisor, RecoverySuggestion};
use crate::toolchain::{ExecutionContext, ExecutionOutcome, ToolchainRegistry};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Detector → pipeline → adapter → recovery, for one snippet at a time.
///
/// Cloning is cheap: every collaborator sits behind an `Arc`, so clones can
/// be moved into tasks to process independent snippets concurrently.
#[derive(Clone)]
pub struct Dispatcher {
    detector: Arc<Detector>,
    pipeline: Arc<dyn CompilerPipeline>,
    registry: Arc<ToolchainRegistry>,
    context: ExecutionContext,
    advisor: Option<Arc<RecoveryAdvisor>>,
    progress: Arc<dyn ProgressHandler>,
}

impl Dispatcher {
    pub fn new(registry: ToolchainRegistry, context: ExecutionContext) -> Self {
        Self {
            detector: Arc::new(Detector::default()),
            pipeline: Arc::new(StubPipeline),
            registry: Arc::new(registry),
            context,
            advisor: None,
            progress: Arc::new(NoOpHandler),
        }
    }

    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn with_pipeline(mut self, pipeline: Arc<dyn CompilerPipeline>) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_recovery(mut self, advisor: RecoveryAdvisor) -> Self {
        self.advisor = Some(Arc::new(advisor));
        self
    }

    pub fn with_progress_handler(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn registry(&self) -> &ToolchainRegistry {
        &self.registry
    }

    /// Detects the snippet's language and logs the matched signatures
    pub fn detect(&self, snippet: &str) -> Result<DetectionResult, DispatchError> {
        match self.detector.detect(snippet) {
            Ok(detection) => {
                debug!(
                    language = %detection.language,
                    matched = ?detection.matched_signatures,
                    candidates = ?detection.candidates,
                    "Signatures matched"
                );
                self.progress.on_progress(&ProgressEvent::LanguageDetected {
                    language: detection.language,
                    matched_signatures: detection.matched_signatures.len(),
                });
                Ok(detection)
            }
            Err(e) => {
                debug!(error = %e, "Detection failed");
                Err(e.into())
            }
        }
    }

    /// Runs the pipeline and the toolchain for an already detected snippet
    pub async fn execute_detected(
        &self,
        snippet: &str,
        detection: DetectionResult,
    ) -> Result<RunReport, DispatchError> {
        self.execute_with_id(snippet, detection, new_run_id()).await
    }

    /// Full run: detect, compile through the pipeline, execute, recover
    pub async fn run(&self, snippet: &str) -> Result<RunReport, DispatchError> {
        self.run_observed(snippet, |_| {}).await
    }

    /// Same as [`run`](Self::run), calling `on_detected` once the language is
    /// known and before the pipeline starts
    pub async fn run_observed<F>(
        &self,
        snippet: &str,
        on_detected: F,
    ) -> Result<RunReport, DispatchError>
    where
        F: FnOnce(&DetectionResult) + Send,
    {
        let run_id = new_run_id();
        let start = Instant::now();
        self.progress.on_progress(&ProgressEvent::Started {
            run_id: run_id.clone(),
        });

        let result = match self.detect(snippet) {
            Ok(detection) => {
                on_detected(&detection);
                self.execute_with_id(snippet, detection, run_id).await
            }
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.progress.on_progress(&ProgressEvent::Completed {
                total_time: start.elapsed(),
            }),
            Err(e) => self.progress.on_progress(&ProgressEvent::Failed {
                error: e.to_string(),
            }),
        }
        result
    }

    /// Runs independent snippets concurrently; results keep the input order
    pub async fn run_batch(&self, snippets: Vec<String>) -> Vec<Result<RunReport, DispatchError>> {
        let total = snippets.len();
        let mut join_set = JoinSet::new();

        for (idx, snippet) in snippets.into_iter().enumerate() {
            let dispatcher = self.clone();
            join_set.spawn(async move { (idx, dispatcher.run(&snippet).await) });
        }

        let mut ordered: Vec<Option<Result<RunReport, DispatchError>>> = vec![None; total];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((idx, result)) => ordered[idx] = Some(result),
                Err(e) => warn!(error = %e, "Snippet task did not complete"),
            }
        }

        ordered
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(DispatchError::TaskFailed(
                        "task panicked or was cancelled".to_string(),
                    ))
                })
            })
            .collect()
    }

    async fn execute_with_id(
        &self,
        snippet: &str,
        detection: DetectionResult,
        run_id: String,
    ) -> Result<RunReport, DispatchError> {
        let language = detection.language;
        let keywords = self.detector.catalog().definition_keywords(language);

        let orchestrator = PipelineOrchestrator::new(self.pipeline.clone(), self.progress.clone());
        let artifact = orchestrator.execute(snippet, keywords)?;

        let adapter = self
            .registry
            .get(language)
            .ok_or(DispatchError::NoAdapter(language))?;
        let variant = adapter.variant();

        self.progress
            .on_progress(&ProgressEvent::ExecutionStarted { language, adapter: variant });
        let outcome = adapter.execute(snippet, &self.context).await;
        self.progress.on_progress(&ProgressEvent::ExecutionComplete {
            status: outcome.status,
            duration: std::time::Duration::from_millis(outcome.duration_ms),
        });

        info!(
            run_id = %run_id,
            language = %language,
            adapter = %variant,
            status = %outcome.status,
            "Execution finished"
        );

        let suggestion = self.recover(snippet, &outcome).await;

        Ok(RunReport {
            run_id,
            detection,
            artifact,
            adapter: variant,
            outcome,
            suggestion,
        })
    }

    async fn recover(&self, snippet: &str, outcome: &ExecutionOutcome) -> Option<RecoverySuggestion> {
        if !outcome.status.triggers_recovery() {
            return None;
        }
        let advisor = self.advisor.as_ref()?;

        self.progress.on_progress(&ProgressEvent::RecoveryRequested);
        let start = Instant::now();
        let suggestion = advisor.suggest(snippet, outcome.diagnostic()).await;
        self.progress.on_progress(&ProgressEvent::RecoveryComplete {
            has_suggestion: suggestion.has_suggestion(),
            duration: start.elapsed(),
        });

        Some(suggestion)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("languages", &self.registry.languages())
            .field("context", &self.context)
            .field("recovery", &self.advisor.is_some())
            .finish_non_exhaustive()
    }
}

fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}
