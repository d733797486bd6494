//! Shared-keyword explanations
//!
//! A rough lexical overlap between two pages, used only to word the reason
//! attached to an opportunity. It never affects which pairs are admitted.

use crate::document::Document;
use std::collections::HashSet;

/// Characters of content considered alongside the title
pub const KEYWORD_CONTENT_CHARS: usize = 500;

/// Maximum keywords quoted in a reason
pub const MAX_SHARED_KEYWORDS: usize = 5;

/// Reason used when two pages share no keywords
pub const FALLBACK_REASON: &str = "High semantic similarity";

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
    "this", "that", "these", "those", "it", "its", "you", "your", "we", "our", "they", "their",
    "what", "which", "who", "when", "where", "how",
];

/// Distinct keywords of a page in first-occurrence order
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    ordered: Vec<String>,
    set: HashSet<String>,
}

impl Keywords {
    /// Keywords of `title` plus the first [`KEYWORD_CONTENT_CHARS`] of content
    pub fn of(doc: &Document) -> Self {
        let excerpt: String = doc.content.chars().take(KEYWORD_CONTENT_CHARS).collect();
        Self::from_text(&format!("{} {}", doc.title, excerpt))
    }

    /// Lowercase, split on non-word characters, drop stop words and short tokens
    pub fn from_text(text: &str) -> Self {
        let mut keywords = Self::default();
        let lower = text.to_lowercase();
        for token in lower.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')) {
            if token.len() <= 3 || STOP_WORDS.contains(&token) {
                continue;
            }
            if keywords.set.insert(token.to_string()) {
                keywords.ordered.push(token.to_string());
            }
        }
        keywords
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Keywords present in both, in this page's order, capped at [`MAX_SHARED_KEYWORDS`]
    pub fn shared_with(&self, other: &Keywords) -> Vec<&str> {
        self.iter()
            .filter(|w| other.contains(w))
            .take(MAX_SHARED_KEYWORDS)
            .collect()
    }
}

/// Human-readable reason for a link opportunity
pub fn reason(shared: &[&str]) -> String {
    if shared.is_empty() {
        FALLBACK_REASON.to_string()
    } else {
        format!("Shared topics: {}", shared.join(", "))
    }
}
