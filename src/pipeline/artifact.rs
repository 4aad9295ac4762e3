use serde::Serialize;

/// Opaque parse result handed from `parse` to the later phases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    tokens: Vec<String>,
}

impl SyntaxTree {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Everything the pipeline produced for one snippet. Never reused across runs.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineArtifact {
    pub tokens: Vec<String>,
    #[serde(skip)]
    pub tree: SyntaxTree,
    pub ir: String,
    pub optimized_ir: String,
    pub target_code: String,
}
