//! Markdown-to-prose normalization for raw model output.
//!
//! The normalizer strips formatting markers while keeping the text
//! itself, so downstream sentence splitting and word counting see plain
//! prose. It is a pure, total function and idempotent: once all markers
//! are removed, a second pass finds nothing left to rewrite.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// ATX headers at line start: `## Title` -> `Title`.
    static ref RE_HEADER: Regex = Regex::new(r"(?m)^#{1,6}\s*").unwrap();
    /// Fenced code markers with optional language tag (the code body stays).
    static ref RE_FENCE: Regex = Regex::new(r"(?m)^```[A-Za-z0-9_+-]*[ \t]*\n?").unwrap();
    /// Bold then italic; bold first so `**x**` does not leave stray `*`.
    static ref RE_BOLD: Regex = Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").unwrap();
    static ref RE_ITALIC: Regex = Regex::new(r"\*([^*\n]+)\*|\b_([^_\n]+)_\b").unwrap();
    /// Inline code spans: `` `code` `` -> `code`.
    static ref RE_INLINE_CODE: Regex = Regex::new(r"`([^`\n]*)`").unwrap();
    /// Bullet markers (`- `, `* `, `+ `) at line start.
    static ref RE_BULLET: Regex = Regex::new(r"(?m)^[ \t]*[-*+]\s+").unwrap();
    /// Numbered-list markers (`3. `) at line start.
    static ref RE_NUMBERED: Regex = Regex::new(r"(?m)^[ \t]*\d+\.\s+").unwrap();
    /// Three or more newlines collapse into a single blank line.
    static ref RE_BLANK_RUNS: Regex = Regex::new(r"\n{3,}").unwrap();
    /// Runs of spaces/tabs collapse into one space.
    static ref RE_SPACE_RUNS: Regex = Regex::new(r"[ \t]{2,}").unwrap();
}

/// Strip markdown formatting from `raw` and collapse excess whitespace.
///
/// Removes headers, bold/italic markers, bullet and numbered-list
/// markers, fenced code markers (keeping the code text), and inline
/// code backticks. Repeated blank lines collapse to one blank line and
/// repeated spaces to a single space.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)` for any input.
pub fn normalize(raw: &str) -> String {
    let s = RE_FENCE.replace_all(raw, "");
    let s = RE_HEADER.replace_all(&s, "");
    let s = RE_BOLD.replace_all(&s, "$1$2");
    let s = RE_ITALIC.replace_all(&s, "$1$2");
    let s = RE_INLINE_CODE.replace_all(&s, "$1");
    let s = RE_BULLET.replace_all(&s, "");
    let s = RE_NUMBERED.replace_all(&s, "");
    let s = RE_BLANK_RUNS.replace_all(&s, "\n\n");
    let s = s.replace('\t', " ");
    let s = RE_SPACE_RUNS.replace_all(&s, " ");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_headers_and_emphasis() {
        let raw = "## Top picks\n\n**Asana** is *great* for `tasks`.";
        assert_eq!(normalize(raw), "Top picks\n\nAsana is great for tasks.");
    }

    #[test]
    fn strips_list_markers() {
        let raw = "- first point\n* second point\n1. third point";
        assert_eq!(normalize(raw), "first point\nsecond point\nthird point");
    }

    #[test]
    fn strips_fences_keeps_code_text() {
        let raw = "before\n```python\nx = 1\n```\nafter";
        assert_eq!(normalize(raw), "before\nx = 1\nafter");
    }

    #[test]
    fn collapses_whitespace() {
        let raw = "a  b\tc\n\n\n\nd";
        assert_eq!(normalize(raw), "a b c\n\nd");
    }

    #[test]
    fn idempotent_on_markdown_input() {
        let samples = [
            "# H1\n\n**bold** and _it_\n\n- a\n- b\n\n```\ncode\n```\n",
            "plain already-normalized text",
            "1. one\n2. two\n\n\n\n3. three  spaced",
            "",
        ];
        for raw in samples {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }
}
