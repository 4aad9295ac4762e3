use crate::language::{DetectionError, LanguageTag};
use crate::pipeline::SemanticError;
use thiserror::Error;

/// Reasons a run stops before a toolchain produces an outcome
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error("No toolchain adapter registered for {0}")]
    NoAdapter(LanguageTag),

    #[error("Snippet task failed: {0}")]
    TaskFailed(String),
}

impl DispatchError {
    /// User-facing message with guidance, as printed by the CLI
    pub fn help_message(&self) -> String {
        match self {
            DispatchError::Detection(DetectionError::UnknownLanguage) => {
                format!(
                    "Error: {}\n\n\
                    Help: The snippet did not match any known language signature.\n\
                    Supported languages: {}\n\
                    Check that the file contains source code and is not empty.",
                    self,
                    supported_languages()
                )
            }
            DispatchError::Detection(DetectionError::AmbiguousLanguage { .. }) => {
                format!(
                    "Error: {}\n\n\
                    Help: Several languages matched and none of them has precedence.\n\
                    Add a more distinctive construct (a class, function or print call).",
                    self
                )
            }
            DispatchError::Semantic(SemanticError::IncompleteDefinition { keyword, .. }) => {
                format!(
                    "Error: {}\n\n\
                    Help: Every `{}` definition needs a parameter list, e.g. `{} name():`.",
                    self, keyword, keyword
                )
            }
            DispatchError::NoAdapter(tag) => {
                format!(
                    "Error: {}\n\n\
                    Help: {} was detected but no toolchain is configured to run it.",
                    self, tag
                )
            }
            DispatchError::TaskFailed(_) => format!("Error: {}", self),
        }
    }
}

fn supported_languages() -> String {
    LanguageTag::all_variants()
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}
