use super::catalog::SignatureCatalog;
use super::tag::LanguageTag;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionError {
    #[error("Unable to determine the language: no known signature matched")]
    UnknownLanguage,

    #[error("Ambiguous language: {} all matched and none has precedence", format_tags(.candidates))]
    AmbiguousLanguage { candidates: Vec<LanguageTag> },
}

fn format_tags(tags: &[LanguageTag]) -> String {
    tags.iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a successful detection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub language: LanguageTag,
    /// Ids of the winning language's signatures that matched, in catalog order
    pub matched_signatures: Vec<String>,
    /// Every language with at least one match, in precedence order
    pub candidates: Vec<LanguageTag>,
}

/// Applies a signature catalog to snippets. Pure: no logging, no state.
#[derive(Debug, Clone)]
pub struct Detector {
    catalog: Arc<SignatureCatalog>,
}

impl Detector {
    pub fn new(catalog: Arc<SignatureCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    pub fn detect(&self, snippet: &str) -> Result<DetectionResult, DetectionError> {
        let mut matches: Vec<(LanguageTag, Vec<String>)> = self
            .catalog
            .languages()
            .iter()
            .filter_map(|lang| {
                let ids = lang.matching_ids(snippet);
                (!ids.is_empty()).then_some((lang.tag, ids))
            })
            .collect();

        if matches.is_empty() {
            return Err(DetectionError::UnknownLanguage);
        }

        // Ranked candidates first in precedence order, unranked ones keep catalog order
        matches.sort_by_key(|(tag, _)| self.catalog.rank(*tag).unwrap_or(usize::MAX));
        let candidates: Vec<LanguageTag> = matches.iter().map(|(tag, _)| *tag).collect();

        let winner_ranked = self.catalog.rank(matches[0].0).is_some();
        if !winner_ranked && matches.len() > 1 {
            return Err(DetectionError::AmbiguousLanguage { candidates });
        }

        let (language, matched_signatures) = matches.swap_remove(0);
        Ok(DetectionResult {
            language,
            matched_signatures,
            candidates,
        })
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(Arc::new(SignatureCatalog::with_defaults()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::catalog::LanguageSignatures;
    use yare::parameterized;

    #[parameterized(
        python_print = { "print(\"hi\")", LanguageTag::Python },
        python_def = { "def greet(name):\n    return name", LanguageTag::Python },
        java_class = { "public class Main { }", LanguageTag::Java },
        java_println = { "System.out.println(1);", LanguageTag::Java },
        javascript_console = { "console.log('x')", LanguageTag::JavaScript },
        javascript_arrow = { "const add = (a, b) => a + b", LanguageTag::JavaScript },
        r_assign = { "x <- c(1, 2, 3)", LanguageTag::R },
        r_library = { "library(ggplot2)", LanguageTag::R },
        kotlin_main = { "fun main() {\n    println(\"x\")\n}", LanguageTag::Kotlin },
        micropython_machine = { "import machine", LanguageTag::MicroPython },
    )]
    fn test_detects_language(snippet: &str, expected: LanguageTag) {
        let detector = Detector::default();
        let result = detector.detect(snippet).unwrap();
        assert_eq!(result.language, expected);
    }

    #[test]
    fn test_java_wins_over_python() {
        let detector = Detector::default();
        let snippet = "public class Mixed {}\ndef helper(x):\n    pass";
        let result = detector.detect(snippet).unwrap();

        assert_eq!(result.language, LanguageTag::Java);
        assert_eq!(result.matched_signatures, vec!["java.public-class"]);
        assert_eq!(
            &result.candidates[..2],
            &[LanguageTag::Java, LanguageTag::Python]
        );
    }

    #[test]
    fn test_python_wins_over_micropython_when_both_match() {
        let detector = Detector::default();
        let result = detector.detect("import machine\nprint('led')").unwrap();
        assert_eq!(result.language, LanguageTag::Python);
        assert!(result.candidates.contains(&LanguageTag::MicroPython));
    }

    #[test]
    fn test_empty_snippet_is_unknown() {
        let detector = Detector::default();
        assert_eq!(detector.detect(""), Err(DetectionError::UnknownLanguage));
    }

    #[test]
    fn test_plain_prose_is_unknown() {
        let detector = Detector::default();
        assert_eq!(
            detector.detect("just some words here"),
            Err(DetectionError::UnknownLanguage)
        );
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = Detector::default();
        let snippet = "fun main() { println(\"x\") }";
        let first = detector.detect(snippet).unwrap();
        for _ in 0..10 {
            assert_eq!(detector.detect(snippet).unwrap(), first);
        }
    }

    #[test]
    fn test_unranked_candidates_are_ambiguous() {
        let r = LanguageSignatures::new(LanguageTag::R, vec![])
            .with_signature("r.cat", r"cat\(")
            .unwrap();
        let kotlin = LanguageSignatures::new(LanguageTag::Kotlin, vec![])
            .with_signature("kotlin.cat", r"cat\(")
            .unwrap();
        let catalog = SignatureCatalog::new(vec![r, kotlin], vec![]).unwrap();
        let detector = Detector::new(Arc::new(catalog));

        let err = detector.detect("cat(1)").unwrap_err();
        assert_eq!(
            err,
            DetectionError::AmbiguousLanguage {
                candidates: vec![LanguageTag::R, LanguageTag::Kotlin]
            }
        );
        assert!(err.to_string().contains("R, Kotlin"));
    }

    #[test]
    fn test_single_unranked_candidate_wins() {
        let r = LanguageSignatures::new(LanguageTag::R, vec![])
            .with_signature("r.cat", r"cat\(")
            .unwrap();
        let catalog = SignatureCatalog::new(vec![r], vec![]).unwrap();
        let detector = Detector::new(Arc::new(catalog));

        assert_eq!(detector.detect("cat(1)").unwrap().language, LanguageTag::R);
    }

    #[test]
    fn test_ranked_candidate_beats_unranked() {
        let r = LanguageSignatures::new(LanguageTag::R, vec![])
            .with_signature("r.cat", r"cat\(")
            .unwrap();
        let kotlin = LanguageSignatures::new(LanguageTag::Kotlin, vec![])
            .with_signature("kotlin.cat", r"cat\(")
            .unwrap();
        let catalog = SignatureCatalog::new(vec![r, kotlin], vec![LanguageTag::Kotlin]).unwrap();
        let detector = Detector::new(Arc::new(catalog));

        assert_eq!(
            detector.detect("cat(1)").unwrap().language,
            LanguageTag::Kotlin
        );
    }
}
