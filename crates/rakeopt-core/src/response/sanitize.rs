//! Isolate the JSON object inside a model reply.
//!
//! Precedence: a fenced code block wins; otherwise the span from the first
//! `{` to the last `}`; otherwise the trimmed text unchanged. This is a
//! heuristic scan, not a parser.

use std::sync::LazyLock;

use regex::Regex;

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
});

/// Strip code fences or surrounding prose from `raw`.
pub fn strip_markdown_wrappers(raw: &str) -> String {
    let text = raw.trim();

    if let Some(inner) = FENCE.captures(text).and_then(|caps| caps.get(1)) {
        return inner.as_str().trim().to_string();
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        // A closing brace before the first opening one leaves nothing to keep.
        if end < start {
            return String::new();
        }
        return text[start..=end].trim().to_string();
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object_is_unchanged() {
        assert_eq!(strip_markdown_wrappers(r#"{"a":1}"#), r#"{"a":1}"#);
        assert_eq!(strip_markdown_wrappers("  \n{\"a\":1}\n "), r#"{"a":1}"#);
    }

    #[test]
    fn sanitizing_is_idempotent() {
        let once = strip_markdown_wrappers("```json\n{\"plan\": []}\n```");
        assert_eq!(strip_markdown_wrappers(&once), once);
    }

    #[test]
    fn json_fence_is_stripped() {
        assert_eq!(strip_markdown_wrappers("```json\n{\"a\":1}\n```"), r#"{"a":1}"#);
    }

    #[test]
    fn untagged_and_uppercase_fences_are_stripped() {
        assert_eq!(strip_markdown_wrappers("```\n{\"a\":1}\n```"), r#"{"a":1}"#);
        assert_eq!(strip_markdown_wrappers("```JSON\n{\"a\":1}\n```"), r#"{"a":1}"#);
    }

    #[test]
    fn fence_surrounded_by_prose() {
        let text = "Sure! Here is the plan:\n```json\n{\n  \"a\": 1\n}\n```\nLet me know.";
        assert_eq!(strip_markdown_wrappers(text), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn only_first_fence_is_used() {
        let text = "```json\n{\"first\":1}\n```\nand\n```json\n{\"second\":2}\n```";
        assert_eq!(strip_markdown_wrappers(text), r#"{"first":1}"#);
    }

    #[test]
    fn fence_takes_precedence_over_brace_scan() {
        let text = "{\"outside\":0} ```json\n{\"inside\":1}\n```";
        assert_eq!(strip_markdown_wrappers(text), r#"{"inside":1}"#);
    }

    #[test]
    fn brace_scan_drops_surrounding_prose() {
        let text = "Here is your plan: {\"a\":1} \u{2014} hope that helps!";
        assert_eq!(strip_markdown_wrappers(text), r#"{"a":1}"#);
    }

    #[test]
    fn brace_scan_spans_first_open_to_last_close() {
        let text = "x {\"a\":{\"b\":2}} y }";
        assert_eq!(strip_markdown_wrappers(text), "{\"a\":{\"b\":2}} y }");
    }

    #[test]
    fn text_without_braces_passes_through_trimmed() {
        assert_eq!(strip_markdown_wrappers("  no json here  "), "no json here");
        assert_eq!(strip_markdown_wrappers("only { open"), "only { open");
    }

    #[test]
    fn reversed_braces_yield_empty_text() {
        assert_eq!(strip_markdown_wrappers("} then {"), "");
    }
}
