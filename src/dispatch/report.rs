use crate::language::DetectionResult;
use crate::pipeline::PipelineArtifact;
use crate::recovery::RecoverySuggestion;
use crate::toolchain::{AdapterVariant, ExecutionOutcome, ExecutionStatus};
use serde::Serialize;

/// Everything one dispatcher run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub detection: DetectionResult,
    pub artifact: PipelineArtifact,
    pub adapter: AdapterVariant,
    pub outcome: ExecutionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<RecoverySuggestion>,
}

impl RunReport {
    pub fn status(&self) -> ExecutionStatus {
        self.outcome.status
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
