//! Document analysis
//!
//! Turns a raw markdown file into a [`Document`]: frontmatter metadata,
//! headings, existing internal links and a normalized plain-text body.
//!
//! # Example
//!
//! ```
//! use interlink::analysis::parse_document;
//!
//! let raw = "---\ntitle: Growth Guide\n---\n# Growth\n\nRead [the basics](/basics).";
//! let doc = parse_document("guides/growth", raw).unwrap();
//! assert_eq!(doc.url, "/guides/growth");
//! assert_eq!(doc.title, "Growth Guide");
//! assert_eq!(doc.existing_links, vec!["/basics"]);
//! ```

mod frontmatter;
mod link;
mod markdown;

pub use frontmatter::{split_frontmatter, FrontMatter, FrontMatterError};
pub use link::{classify_link, extract_internal_links, LinkType};
pub use markdown::{extract_headings, strip_markdown, word_count};

use crate::corpus::SourceFile;
use crate::document::Document;
use std::path::PathBuf;
use thiserror::Error;

/// Per-document failure; the pipeline logs it and skips the file
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("invalid frontmatter in {0}: {1}")]
    FrontMatter(PathBuf, #[source] FrontMatterError),
}

/// Read and parse a discovered corpus file
pub fn parse_file(source: &SourceFile) -> Result<Document, ParseError> {
    let raw = std::fs::read_to_string(&source.path)
        .map_err(|e| ParseError::Read(source.relative_path.clone(), e))?;
    parse_document(&source.slug, &raw)
        .map_err(|e| ParseError::FrontMatter(source.relative_path.clone(), e))
}

/// Parse raw markdown published under `slug`
pub fn parse_document(slug: &str, raw: &str) -> Result<Document, FrontMatterError> {
    let (header, body) = split_frontmatter(raw);
    let meta = match header {
        Some(yaml) => FrontMatter::from_yaml(yaml)?,
        None => FrontMatter::default(),
    };

    let headings = extract_headings(body);
    let content = strip_markdown(body);
    let title = meta
        .title
        .or_else(|| headings.first().cloned())
        .unwrap_or_else(|| slug.to_string());

    Ok(Document {
        slug: slug.to_string(),
        url: format!("/{}", slug),
        title,
        description: meta.description,
        word_count: word_count(&content),
        existing_links: extract_internal_links(body),
        content,
        headings,
        category: meta.category,
        tags: meta.tags,
    })
}
