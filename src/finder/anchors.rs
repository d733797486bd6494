//! Anchor text suggestions for a link target

use crate::document::Document;

/// Maximum anchor suggestions per opportunity
pub const MAX_ANCHORS: usize = 4;

/// Suggest anchor texts for linking to `target`, most specific first
///
/// Candidates in priority order: the title; the first heading when it differs
/// from the title; the first three title words longer than four characters
/// (when at least two exist); `"{category} guide"`. Duplicates are dropped.
pub fn suggest_anchors(target: &Document) -> Vec<String> {
    let mut candidates = vec![target.title.clone()];

    if let Some(heading) = target.headings.first() {
        if *heading != target.title {
            candidates.push(heading.clone());
        }
    }

    let long_words: Vec<&str> = target
        .title
        .split_whitespace()
        .filter(|w| w.chars().count() > 4)
        .collect();
    if long_words.len() >= 2 {
        candidates.push(long_words.iter().take(3).copied().collect::<Vec<_>>().join(" "));
    }

    if let Some(category) = &target.category {
        candidates.push(format!("{} guide", category));
    }

    let mut anchors: Vec<String> = Vec::with_capacity(MAX_ANCHORS);
    for candidate in candidates {
        if !anchors.contains(&candidate) {
            anchors.push(candidate);
        }
    }
    anchors.truncate(MAX_ANCHORS);
    anchors
}
