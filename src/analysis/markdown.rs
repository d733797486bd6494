//! Markdown text handling
//!
//! Heading extraction and reduction of a markdown body to plain text.

use regex_lite::Regex;
use std::sync::OnceLock;

struct Patterns {
    heading: Regex,
    fenced_code: Regex,
    inline_code: Regex,
    image: Regex,
    link: Regex,
    heading_marker: Regex,
    formatting: Regex,
    blank_lines: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        heading: Regex::new(r"(?m)^#{1,3}[ \t]+(.+)$").unwrap(),
        fenced_code: Regex::new(r"(?s)```.*?```").unwrap(),
        inline_code: Regex::new(r"`[^`]+`").unwrap(),
        image: Regex::new(r"!\[[^\]]*\]\([^)]+\)").unwrap(),
        link: Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap(),
        heading_marker: Regex::new(r"(?m)^#{1,6}\s+").unwrap(),
        formatting: Regex::new(r"[*_~`]").unwrap(),
        blank_lines: Regex::new(r"\n{3,}").unwrap(),
    })
}

/// Extract level 1-3 heading texts in document order
pub fn extract_headings(body: &str) -> Vec<String> {
    patterns()
        .heading
        .captures_iter(body)
        .map(|cap| cap[1].trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Reduce a markdown body to plain text
///
/// Code is dropped before punctuation stripping, and links are unwrapped to
/// their visible text before emphasis is removed so anchor text is cleaned
/// too. The passes repeat until the text is stable; each pass only removes
/// characters, so the loop terminates and the result is a fixed point.
pub fn strip_markdown(body: &str) -> String {
    let mut text = strip_pass(body);
    loop {
        let next = strip_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn strip_pass(text: &str) -> String {
    let p = patterns();
    let text = p.fenced_code.replace_all(text, "");
    let text = p.inline_code.replace_all(&text, "");
    let text = p.image.replace_all(&text, "");
    let text = p.link.replace_all(&text, "$1");
    let text = p.heading_marker.replace_all(&text, "");
    let text = p.formatting.replace_all(&text, "");
    let text = p.blank_lines.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Count whitespace-delimited tokens; empty text counts as zero words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_headings() {
        let body = "# Title\n\nText\n\n## Section  \n### Sub\n#### Too deep\n#NoSpace\n";
        assert_eq!(extract_headings(body), vec!["Title", "Section", "Sub"]);
    }

    #[test]
    fn test_headings_empty() {
        assert!(extract_headings("Just a paragraph.").is_empty());
    }

    #[test]
    fn test_strip_removes_code() {
        let body = "Before\n\n```rust\nfn main() { let _x = 1; }\n```\n\nAfter `inline_code` done";
        assert_eq!(strip_markdown(body), "Before\n\nAfter  done");
    }

    #[test]
    fn test_strip_images_and_links() {
        let body = "See ![diagram](/img/d.png) and [the **growth** guide](/growth).";
        assert_eq!(strip_markdown(body), "See  and the growth guide.");
    }

    #[test]
    fn test_strip_heading_markers_and_formatting() {
        let body = "# Title\n\nSome *emphasis*, __bold__ and ~~strike~~.";
        assert_eq!(strip_markdown(body), "Title\n\nSome emphasis, bold and strike.");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(strip_markdown("a\n\n\n\n\nb\n\n\n"), "a\n\nb");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let samples = [
            "# Heading\n\nBody with [link](/x) and `code`.\n\n\n\nEnd",
            "# # nested marker",
            "[a]*(b)",
            "```\nunclosed fence\n\n*text*",
            "",
        ];
        for sample in samples {
            let once = strip_markdown(sample);
            assert_eq!(strip_markdown(&once), once, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two\nthree\tfour"), 4);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n "), 0);
    }
}
