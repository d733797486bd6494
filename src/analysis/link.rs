//! Link extraction
//!
//! Finds `[text](target)` links in a markdown body and keeps the targets that
//! point inside the site.

use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Link classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// Root-relative path such as `/guides/seo`
    RootRelative,
    /// Path relative to the current document, `./x` or `../x`
    Relative,
    /// URL with a scheme (`https:`, `mailto:`) or protocol-relative `//host`
    External,
    /// Anchor within the same document
    Anchor,
    /// Anything else, e.g. a bare `other.md`
    Other,
}

impl LinkType {
    /// Whether links of this type count as existing internal links
    pub fn is_internal(self) -> bool {
        matches!(self, LinkType::RootRelative | LinkType::Relative)
    }
}

/// Classify a link target
///
/// Prefixes decide first, so `/out?to=https://x` stays root-relative. Only a
/// leading scheme (`[A-Za-z][A-Za-z0-9+.-]*:`) makes a target external.
pub fn classify_link(url: &str) -> LinkType {
    if url.starts_with('#') {
        LinkType::Anchor
    } else if url.starts_with("//") {
        LinkType::External
    } else if url.starts_with('/') {
        LinkType::RootRelative
    } else if url.starts_with("./") || url.starts_with("../") {
        LinkType::Relative
    } else if has_scheme(url) {
        LinkType::External
    } else {
        LinkType::Other
    }
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

fn link_pattern() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap())
}

/// Extract internal link targets, fragments stripped, duplicates removed
///
/// Targets keep their first-occurrence order. An optional link title
/// (`[a](/x "Title")`) is not part of the target.
pub fn extract_internal_links(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for cap in link_pattern().captures_iter(body) {
        let Some(target) = cap[2].split_whitespace().next() else {
            continue;
        };
        if !classify_link(target).is_internal() {
            continue;
        }

        let target = match target.find('#') {
            Some(pos) => &target[..pos],
            None => target,
        };
        if seen.insert(target.to_string()) {
            links.push(target.to_string());
        }
    }

    links
}
