use regex::Regex;
use std::sync::OnceLock;

const HEADER: &str = "The following code has an error:\n";
const DIAGNOSTIC_LABEL: &str = "\nError message:\n";
const FOOTER: &str = "\nPlease suggest a corrected version of the code.";

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```[^\n]*\n([\s\S]*?)```").expect("fence pattern is valid")
    })
}

/// Cuts `text` to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Renders the repair request, keeping the whole prompt within `max_chars`.
///
/// The snippet gives way first, then the diagnostic. A limit shorter than
/// the fixed frame cuts the rendered prompt itself.
pub fn build_prompt(snippet: &str, diagnostic: &str, max_chars: usize) -> String {
    let frame = HEADER.chars().count() + DIAGNOSTIC_LABEL.chars().count() + FOOTER.chars().count();
    let budget = max_chars.saturating_sub(frame);

    let diagnostic_len = diagnostic.chars().count();
    let snippet_budget = budget.saturating_sub(diagnostic_len);
    let snippet = truncate_chars(snippet, snippet_budget);
    let diagnostic_budget = budget.saturating_sub(snippet.chars().count());
    let diagnostic = truncate_chars(diagnostic, diagnostic_budget);

    let prompt = format!(
        "{}{}{}{}{}",
        HEADER, snippet, DIAGNOSTIC_LABEL, diagnostic, FOOTER
    );
    if budget == 0 {
        return truncate_chars(&prompt, max_chars).to_string();
    }
    prompt
}

/// Body of the first fenced code block, or the whole trimmed reply when there is none
pub fn extract_code(reply: &str) -> &str {
    let trimmed = reply.trim();
    fence_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('\n'))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = build_prompt("print(x", "SyntaxError: '(' was never closed", 4096);
        assert_eq!(
            prompt,
            "The following code has an error:\nprint(x\nError message:\nSyntaxError: '(' was never closed\nPlease suggest a corrected version of the code."
        );
    }

    #[test]
    fn test_snippet_truncated_before_diagnostic() {
        let snippet = "x".repeat(1000);
        let diagnostic = "error: boom";
        let prompt = build_prompt(&snippet, diagnostic, 300);

        assert!(prompt.chars().count() <= 300);
        assert!(prompt.contains("error: boom"));
        assert!(prompt.ends_with("Please suggest a corrected version of the code."));
    }

    #[test]
    fn test_diagnostic_truncated_when_snippet_is_gone() {
        let diagnostic = "e".repeat(1000);
        let prompt = build_prompt("code", &diagnostic, 256);

        assert!(prompt.chars().count() <= 256);
        assert!(!prompt.contains("code\n"));
    }

    #[test]
    fn test_limit_below_frame_length() {
        let prompt = build_prompt("code", "diag", 50);

        assert_eq!(prompt.chars().count(), 50);
        assert!(prompt.starts_with("The following code has an error:\n"));
        assert!(!prompt.contains("code\n"));
    }

    #[test]
    fn test_zero_limit_yields_empty_prompt() {
        assert_eq!(build_prompt("code", "diag", 0), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 5), "日本語");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_extract_first_fenced_block() {
        let reply = "Here you go:\n```python\nprint(\"hi\")\n```\nand also\n```\nother\n```";
        assert_eq!(extract_code(reply), "print(\"hi\")");
    }

    #[test]
    fn test_extract_without_fence() {
        assert_eq!(extract_code("  print(1)\n"), "print(1)");
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_whole_text() {
        let reply = "```java\nclass TempProgram {";
        assert_eq!(extract_code(reply), reply);
    }
}
