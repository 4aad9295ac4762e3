use super::artifact::SyntaxTree;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("Semantic error: function definition `{keyword}` at token {position} has no parameter list")]
    IncompleteDefinition { keyword: String, position: usize },
}

/// String literals and comments are matched so they can be skipped;
/// only the `tok` group produces tokens.
fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r#""""[\s\S]*?"""|'''[\s\S]*?'''"#,
            r#"|"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#,
            r"|//[^\n]*|/\*[\s\S]*?\*/|#[^\n]*",
            r"|(?P<tok>[\w]+|[{}()=;,.])",
        ))
        .expect("token pattern must compile")
    })
}

/// The six compilation phases, in order.
///
/// Every method has a default so an implementation only overrides the phases
/// it actually performs. Only [`CompilerPipeline::check_semantics`] does real
/// work by default; the lowering phases pass the token stream through.
pub trait CompilerPipeline: Send + Sync {
    fn tokenize(&self, snippet: &str) -> Vec<String> {
        token_pattern()
            .captures_iter(snippet)
            .filter_map(|caps| caps.name("tok"))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn parse(&self, tokens: &[String]) -> SyntaxTree {
        SyntaxTree::new(tokens.to_vec())
    }

    /// Rejects a definition keyword with no `(` token anywhere after it
    fn check_semantics(
        &self,
        tree: &SyntaxTree,
        definition_keywords: &[&str],
    ) -> Result<(), SemanticError> {
        let tokens = tree.tokens();
        for (position, token) in tokens.iter().enumerate() {
            if !definition_keywords.contains(&token.as_str()) {
                continue;
            }
            if !tokens[position + 1..].iter().any(|t| t == "(") {
                return Err(SemanticError::IncompleteDefinition {
                    keyword: token.clone(),
                    position,
                });
            }
        }
        Ok(())
    }

    fn lower_to_ir(&self, tree: &SyntaxTree) -> String {
        tree.tokens().join(" ")
    }

    fn optimize(&self, ir: &str) -> String {
        ir.to_string()
    }

    fn generate_target(&self, optimized_ir: &str) -> String {
        optimized_ir.to_string()
    }
}

/// Default pipeline: identity lowering plus the definition guard
#[derive(Debug, Default, Clone, Copy)]
pub struct StubPipeline;

impl CompilerPipeline for StubPipeline {}
