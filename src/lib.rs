//! Interlink: internal-link recommendations for markdown corpora
//!
//! A two-stage offline pipeline that suggests which pages of a site should
//! link to which, based on semantic similarity.
//!
//! # Stages
//!
//! - **Extract** ([`Extractor`]): discover `.md`/`.mdx` files, parse
//!   frontmatter, headings and existing links, reduce bodies to plain text,
//!   embed each page and write `pages.json`.
//! - **Find** ([`Finder`]): load `pages.json`, compare every ordered pair of
//!   pages by cosine similarity, and write ranked, explained link
//!   opportunities to `opportunities.json`.
//!
//! The stages share nothing but the persisted dataset.
//!
//! # Example
//!
//! ```
//! use interlink::{find_opportunities, EmbeddedDocument};
//!
//! let page = |slug: &str, embedding: Vec<f32>| {
//!     let doc = interlink::analysis::parse_document(slug, "Some text").unwrap();
//!     EmbeddedDocument::new(doc, embedding)
//! };
//! let pages = vec![page("a", vec![1.0, 0.0]), page("b", vec![0.9, 0.1])];
//!
//! let opportunities = find_opportunities(&pages, 0.7);
//! assert_eq!(opportunities.len(), 2);
//! ```

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod dataset;
mod document;
pub mod embedding;
pub mod extract;
pub mod finder;

pub use config::{ConfigError, PipelineConfig};
pub use corpus::{Corpus, CorpusError, SourceFile};
pub use dataset::DatasetError;
pub use document::{Document, EmbeddedDocument, LinkOpportunity};
pub use embedding::{cosine_similarity, Embedder, EmbeddingError};
pub use extract::{ExtractError, ExtractionSummary, Extractor};
pub use finder::{find_opportunities, Finder, FinderError, FinderSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
