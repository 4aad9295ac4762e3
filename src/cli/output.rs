//! Report formatting for the CLI
//!
//! JSON and YAML serialize the whole [`RunReport`]; the human format is a
//! compact summary followed by the captured streams and any repair suggestion.

use anyhow::{Context, Result};

use crate::dispatch::RunReport;
use crate::toolchain::ExecutionStatus;

const RULE: &str = "\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}\u{2501}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

impl OutputFormat {
    /// Machine formats keep stdout free of anything but the report
    pub fn is_machine_readable(&self) -> bool {
        !matches!(self, OutputFormat::Human)
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
            }
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &RunReport) -> String {
        let outcome = &report.outcome;
        let mut output = String::new();

        if outcome.is_success() {
            output.push_str("\u{2713} Run Succeeded\n");
        } else {
            output.push_str(&format!("\u{2717} Run Failed ({})\n", outcome.status));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        output.push_str(&format!("Language:    {}\n", report.detection.language));
        output.push_str(&format!(
            "Signatures:  {}\n",
            report.detection.matched_signatures.join(", ")
        ));
        output.push_str(&format!("Adapter:     {}\n", report.adapter));

        let exit = outcome
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        output.push_str(&format!(
            "Status:      {} (exit code {}, {} ms)\n",
            outcome.status, exit, outcome.duration_ms
        ));
        if outcome.timed_out {
            output.push_str("Timed out:   yes\n");
        }

        if !outcome.stdout.is_empty() {
            output.push_str("\nOutput:\n");
            push_block(&mut output, &outcome.stdout);
        }

        if !outcome.stderr.is_empty() {
            let label = match outcome.status {
                ExecutionStatus::ToolMissing => "Toolchain",
                ExecutionStatus::CompileError => "Compiler Errors",
                _ => "Errors",
            };
            output.push_str(&format!("\n{}:\n", label));
            push_block(&mut output, &outcome.stderr);
        }

        if let Some(ref suggestion) = report.suggestion {
            output.push_str("\nSuggested Fix:\n");
            match (&suggestion.suggested_code, &suggestion.model_error) {
                (Some(code), _) => push_block(&mut output, code),
                (None, Some(error)) => {
                    output.push_str(&format!("(unavailable: {})\n", error));
                }
                (None, None) => output.push_str("(none)\n"),
            }
        }

        output
    }
}

fn push_block(output: &mut String, text: &str) {
    output.push_str(text);
    if !text.ends_with('\n') {
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{DetectionResult, LanguageTag};
    use crate::pipeline::{PipelineArtifact, SyntaxTree};
    use crate::recovery::RecoverySuggestion;
    use crate::toolchain::{AdapterVariant, ExecutionOutcome};

    fn report(outcome: ExecutionOutcome, suggestion: Option<RecoverySuggestion>) -> RunReport {
        RunReport {
            run_id: "run-1".to_string(),
            detection: DetectionResult {
                language: LanguageTag::Python,
                matched_signatures: vec!["python.print".to_string()],
                candidates: vec![LanguageTag::Python, LanguageTag::MicroPython],
            },
            artifact: PipelineArtifact {
                tokens: vec!["print".to_string(), "(".to_string(), ")".to_string()],
                tree: SyntaxTree::new(vec![]),
                ir: "print ( )".to_string(),
                optimized_ir: "print ( )".to_string(),
                target_code: "print ( )".to_string(),
            },
            adapter: AdapterVariant::ScriptInterpreter,
            outcome,
            suggestion,
        }
    }

    #[test]
    fn test_human_success() {
        let outcome = ExecutionOutcome::new(ExecutionStatus::Success, "hi\n", "", Some(0));
        let text = OutputFormatter::new(OutputFormat::Human)
            .format(&report(outcome, None))
            .unwrap();

        assert!(text.starts_with("\u{2713} Run Succeeded"));
        assert!(text.contains("Language:    Python"));
        assert!(text.contains("Adapter:     script interpreter"));
        assert!(text.contains("Output:\nhi\n"));
        assert!(!text.contains("Suggested Fix"));
    }

    #[test]
    fn test_human_failure_with_suggestion() {
        let outcome = ExecutionOutcome::new(
            ExecutionStatus::RuntimeError,
            "",
            "NameError: name 'x' is not defined",
            Some(1),
        );
        let suggestion = RecoverySuggestion {
            prompt: "p".to_string(),
            suggested_code: Some("x = 1\nprint(x)".to_string()),
            model_error: None,
        };
        let text = OutputFormatter::new(OutputFormat::Human)
            .format(&report(outcome, Some(suggestion)))
            .unwrap();

        assert!(text.starts_with("\u{2717} Run Failed (runtime error)"));
        assert!(text.contains("Errors:\nNameError"));
        assert!(text.contains("Suggested Fix:\nx = 1\nprint(x)\n"));
    }

    #[test]
    fn test_human_model_error() {
        let outcome = ExecutionOutcome::new(ExecutionStatus::RuntimeError, "", "boom", Some(1));
        let suggestion = RecoverySuggestion {
            prompt: "p".to_string(),
            suggested_code: None,
            model_error: Some("Request timed out after 60 seconds".to_string()),
        };
        let text = OutputFormatter::new(OutputFormat::Human)
            .format(&report(outcome, Some(suggestion)))
            .unwrap();

        assert!(text.contains("(unavailable: Request timed out after 60 seconds)"));
    }

    #[test]
    fn test_json_output() {
        let outcome = ExecutionOutcome::new(ExecutionStatus::Success, "hi\n", "", Some(0));
        let json = OutputFormatter::new(OutputFormat::Json)
            .format(&report(outcome, None))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["detection"]["language"], "python");
        assert_eq!(value["adapter"], "script_interpreter");
        assert_eq!(value["outcome"]["status"], "success");
        assert_eq!(value["outcome"]["stdout"], "hi\n");
        assert!(value.get("suggestion").is_none());
    }

    #[test]
    fn test_yaml_output() {
        let outcome = ExecutionOutcome::tool_missing("Toolchain not found: python");
        let yaml = OutputFormatter::new(OutputFormat::Yaml)
            .format(&report(outcome, None))
            .unwrap();

        assert!(yaml.contains("status: tool_missing"));
        assert!(yaml.contains("language: python"));
    }

    #[test]
    fn test_machine_readable() {
        assert!(OutputFormat::Json.is_machine_readable());
        assert!(OutputFormat::Yaml.is_machine_readable());
        assert!(!OutputFormat::Human.is_machine_readable());
    }
}
