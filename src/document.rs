//! Records produced and consumed by the pipeline
//!
//! Field names serialize in camelCase so the artifacts stay readable by the
//! site tooling that consumes them.

use serde::{Deserialize, Serialize};

/// A parsed corpus document, before embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Corpus-relative path without extension or trailing `index` segment
    pub slug: String,
    /// Public path, always `/` + slug
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Body with all markdown syntax removed
    pub content: String,
    /// Level 1-3 heading texts in document order
    pub headings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub word_count: usize,
    /// Internal link targets, anchors stripped, first occurrence order
    pub existing_links: Vec<String>,
}

impl Document {
    /// Whether this document already links to `url`
    pub fn links_to(&self, url: &str) -> bool {
        self.existing_links.iter().any(|link| link == url)
    }
}

/// A document with its semantic embedding attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedDocument {
    #[serde(flatten)]
    pub document: Document,
    /// L2-normalized embedding vector
    pub embedding: Vec<f32>,
}

impl EmbeddedDocument {
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        Self {
            document,
            embedding,
        }
    }
}

impl std::ops::Deref for EmbeddedDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

/// A recommended link from one document to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOpportunity {
    pub source_url: String,
    pub source_title: String,
    pub target_url: String,
    pub target_title: String,
    /// Cosine similarity rounded to 3 decimals
    pub similarity: f32,
    /// Shared-keyword explanation or a generic fallback
    pub reason: String,
    /// Anchor text candidates for the target, most specific first
    pub suggested_anchors: Vec<String>,
}
