//! Signature catalog: per-language lexical patterns and the precedence order
//! used when several languages match the same snippet.

use super::tag::LanguageTag;
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid pattern for signature {id}: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Language {0} is declared more than once")]
    DuplicateLanguage(LanguageTag),

    #[error("Language {0} appears more than once in the precedence order")]
    DuplicatePrecedence(LanguageTag),
}

/// A lexical pattern whose presence anywhere in a snippet is evidence for a language
#[derive(Debug, Clone)]
pub struct Signature {
    id: String,
    pattern: Regex,
}

impl Signature {
    pub fn new(id: impl Into<String>, pattern: &str) -> Result<Self, CatalogError> {
        let id = id.into();
        let pattern = Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
            id: id.clone(),
            source,
        })?;
        Ok(Self { id, pattern })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, snippet: &str) -> bool {
        self.pattern.is_match(snippet)
    }
}

/// Detection data for one language
#[derive(Debug, Clone)]
pub struct LanguageSignatures {
    pub tag: LanguageTag,
    pub signatures: Vec<Signature>,
    /// Keywords that open a function definition and must be followed by `(`
    pub definition_keywords: Vec<&'static str>,
}

impl LanguageSignatures {
    pub fn new(tag: LanguageTag, definition_keywords: Vec<&'static str>) -> Self {
        Self {
            tag,
            signatures: Vec::new(),
            definition_keywords,
        }
    }

    pub fn with_signature(mut self, id: &str, pattern: &str) -> Result<Self, CatalogError> {
        self.signatures.push(Signature::new(id, pattern)?);
        Ok(self)
    }

    /// Re-declares another language's signatures under this language's prefix
    pub fn reusing(mut self, other: &LanguageSignatures) -> Self {
        let prefix = self.tag.serde_name();
        for sig in &other.signatures {
            let suffix = sig.id().split_once('.').map(|(_, s)| s).unwrap_or(sig.id());
            self.signatures.push(Signature {
                id: format!("{}.{}", prefix, suffix),
                pattern: sig.pattern.clone(),
            });
        }
        self
    }

    /// Ids of the signatures that match, in declaration order
    pub fn matching_ids(&self, snippet: &str) -> Vec<String> {
        self.signatures
            .iter()
            .filter(|s| s.matches(snippet))
            .map(|s| s.id().to_string())
            .collect()
    }
}

/// Read-only table of language signatures plus a fixed precedence order
#[derive(Debug, Clone)]
pub struct SignatureCatalog {
    languages: Vec<LanguageSignatures>,
    precedence: Vec<LanguageTag>,
}

impl SignatureCatalog {
    pub fn new(
        languages: Vec<LanguageSignatures>,
        precedence: Vec<LanguageTag>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for lang in &languages {
            if !seen.insert(lang.tag) {
                return Err(CatalogError::DuplicateLanguage(lang.tag));
            }
        }

        let mut ranked = HashSet::new();
        for tag in &precedence {
            if !ranked.insert(*tag) {
                return Err(CatalogError::DuplicatePrecedence(*tag));
            }
        }

        Ok(Self {
            languages,
            precedence,
        })
    }

    /// The built-in catalog. Precedence: Java, Python, JavaScript, R, Kotlin, MicroPython.
    pub fn with_defaults() -> Self {
        Self::build_defaults().expect("built-in signature catalog must compile")
    }

    fn build_defaults() -> Result<Self, CatalogError> {
        let java = LanguageSignatures::new(LanguageTag::Java, vec![])
            .with_signature("java.public-class", r"public\s+class\s+\w+")?
            .with_signature("java.system-out", r"System\.out\.println")?
            .with_signature("java.void-main", r"void\s+main\s*\(")?;

        let python = LanguageSignatures::new(LanguageTag::Python, vec!["def"])
            .with_signature("python.def", r"def\s+\w+\s*\(")?
            .with_signature("python.print", r"\bprint\s*\(")?
            .with_signature(
                "python.main-guard",
                r#"if\s+__name__\s*==\s*["']__main__["']"#,
            )?;

        let javascript = LanguageSignatures::new(LanguageTag::JavaScript, vec!["function"])
            .with_signature("javascript.console-log", r"console\.log\s*\(")?
            .with_signature("javascript.function", r"\bfunction\s+\w+\s*\(")?
            .with_signature("javascript.binding", r"\b(const|let)\s+\w+\s*=")?
            .with_signature("javascript.arrow", r"=>")?;

        let r = LanguageSignatures::new(LanguageTag::R, vec!["function"])
            .with_signature("r.assign", r"\w+\s*<-\s*")?
            .with_signature("r.library", r"\blibrary\s*\(")?
            .with_signature("r.cat", r"\bcat\s*\(")?;

        let kotlin = LanguageSignatures::new(LanguageTag::Kotlin, vec!["fun"])
            .with_signature("kotlin.fun", r"\bfun\s+\w+\s*\(")?
            .with_signature("kotlin.println", r"\bprintln\s*\(")?
            .with_signature("kotlin.val", r"\bval\s+\w+\s*=")?;

        let micropython = LanguageSignatures::new(LanguageTag::MicroPython, vec!["def"])
            .reusing(&python)
            .with_signature(
                "micropython.machine",
                r"(?m)^\s*import\s+(machine|utime|micropython)\b",
            )?;

        Self::new(
            vec![java, python, javascript, r, kotlin, micropython],
            vec![
                LanguageTag::Java,
                LanguageTag::Python,
                LanguageTag::JavaScript,
                LanguageTag::R,
                LanguageTag::Kotlin,
                LanguageTag::MicroPython,
            ],
        )
    }

    pub fn languages(&self) -> &[LanguageSignatures] {
        &self.languages
    }

    pub fn precedence(&self) -> &[LanguageTag] {
        &self.precedence
    }

    pub fn get(&self, tag: LanguageTag) -> Option<&LanguageSignatures> {
        self.languages.iter().find(|l| l.tag == tag)
    }

    /// Position in the precedence order, `None` when the language is unranked
    pub fn rank(&self, tag: LanguageTag) -> Option<usize> {
        self.precedence.iter().position(|t| *t == tag)
    }

    pub fn definition_keywords(&self, tag: LanguageTag) -> &[&'static str] {
        self.get(tag)
            .map(|l| l.definition_keywords.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for SignatureCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}
