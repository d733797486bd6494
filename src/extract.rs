//! Content extraction and embedding
//!
//! First pipeline stage: discover the corpus, parse every document, embed
//! each one with the injected [`Embedder`], and persist the result as
//! `pages.json`.
//!
//! Parsing is partial-failure tolerant: a bad file is logged and skipped.
//! Embedding is all-or-nothing: if any document fails to embed, nothing is
//! written.

use crate::analysis::parse_file;
use crate::config::PipelineConfig;
use crate::corpus::{Corpus, CorpusError};
use crate::dataset::{self, DatasetError};
use crate::document::{Document, EmbeddedDocument};
use crate::embedding::{embedding_input, normalize_l2, Embedder, EmbeddingError};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("failed to create output directory {0}: {1}")]
    OutputDir(PathBuf, #[source] std::io::Error),

    #[error("failed to embed {slug}: {source}")]
    Embedding {
        slug: String,
        #[source]
        source: EmbeddingError,
    },

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Runs the extraction stage with an explicitly provided embedder
pub struct Extractor {
    embedder: Box<dyn Embedder>,
    config: PipelineConfig,
}

impl Extractor {
    pub fn new(embedder: Box<dyn Embedder>, config: PipelineConfig) -> Self {
        Self { embedder, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze `content_dir` and write `pages.json` into the output directory
    pub fn run(&self, content_dir: &Path) -> Result<ExtractionSummary, ExtractError> {
        info!(dir = %content_dir.display(), "analyzing content");
        let corpus = Corpus::discover(content_dir)?;
        info!("found {} content files", corpus.len());

        let output_dir = &self.config.output_dir;
        std::fs::create_dir_all(output_dir)
            .map_err(|e| ExtractError::OutputDir(output_dir.clone(), e))?;

        let (documents, skipped) = parse_corpus(&corpus);
        info!("extracted {} pages", documents.len());

        let embedded = self.embed_documents(documents)?;

        let output = self.config.pages_path();
        dataset::write_json(&output, &embedded)?;
        info!(path = %output.display(), "saved analysis");

        Ok(ExtractionSummary::new(
            &embedded,
            skipped,
            output,
            self.config.report_limit,
        ))
    }

    /// Embed every document in order, failing the whole batch on any error
    pub fn embed_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<Vec<EmbeddedDocument>, ExtractError> {
        let total = documents.len();
        info!(
            model = self.embedder.model_name(),
            "generating embeddings for {} pages", total
        );

        let interval = self.config.progress_interval.max(1);
        let mut dimension: Option<usize> = None;
        let mut embedded = Vec::with_capacity(total);

        for (i, document) in documents.into_iter().enumerate() {
            let input = embedding_input(&document);
            let vector = self
                .embedder
                .embed(&input)
                .and_then(|v| check_dimension(v, &mut dimension))
                .map_err(|source| ExtractError::Embedding {
                    slug: document.slug.clone(),
                    source,
                })?;

            debug!(slug = %document.slug, bytes = input.len(), "embedded page");
            embedded.push(EmbeddedDocument::new(document, normalize_l2(vector)));

            if (i + 1) % interval == 0 {
                info!("processed {}/{} pages", i + 1, total);
            }
        }

        Ok(embedded)
    }
}

/// Parse all corpus files, returning documents and the paths that failed
fn parse_corpus(corpus: &Corpus) -> (Vec<Document>, Vec<PathBuf>) {
    let mut documents = Vec::with_capacity(corpus.len());
    let mut skipped = Vec::new();

    for file in &corpus.files {
        match parse_file(file) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                warn!(error = %e, "skipping document");
                skipped.push(file.relative_path.clone());
            }
        }
    }

    (documents, skipped)
}

fn check_dimension(
    vector: Vec<f32>,
    expected: &mut Option<usize>,
) -> Result<Vec<f32>, EmbeddingError> {
    if vector.is_empty() {
        return Err(EmbeddingError::EmptyResult);
    }
    if let Some(index) = vector.iter().position(|x| !x.is_finite()) {
        return Err(EmbeddingError::NonFinite { index });
    }
    match *expected {
        Some(dim) if dim != vector.len() => Err(EmbeddingError::DimensionMismatch {
            expected: dim,
            actual: vector.len(),
        }),
        Some(_) => Ok(vector),
        None => {
            *expected = Some(vector.len());
            Ok(vector)
        }
    }
}

/// URLs of documents that no other document links to, in corpus order
pub fn find_orphans(documents: &[EmbeddedDocument]) -> Vec<String> {
    documents
        .iter()
        .filter(|doc| {
            !documents
                .iter()
                .any(|other| other.slug != doc.slug && other.links_to(&doc.url))
        })
        .map(|doc| doc.url.clone())
        .collect()
}

/// Aggregate figures printed after extraction
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSummary {
    pub output: PathBuf,
    pub pages: usize,
    pub total_words: usize,
    pub skipped: Vec<PathBuf>,
    pub orphans: Vec<String>,
    report_limit: usize,
}

impl ExtractionSummary {
    pub fn new(
        documents: &[EmbeddedDocument],
        skipped: Vec<PathBuf>,
        output: PathBuf,
        report_limit: usize,
    ) -> Self {
        Self {
            output,
            pages: documents.len(),
            total_words: documents.iter().map(|d| d.word_count).sum(),
            skipped,
            orphans: find_orphans(documents),
            report_limit,
        }
    }

    /// Mean word count, rounded; 0 for an empty corpus
    pub fn average_words(&self) -> usize {
        if self.pages == 0 {
            0
        } else {
            (self.total_words as f64 / self.pages as f64).round() as usize
        }
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved analysis to {}", self.output.display())?;
        writeln!(f)?;
        writeln!(f, "Summary:")?;
        writeln!(f, "  Total pages: {}", self.pages)?;
        writeln!(f, "  Total words: {}", group_thousands(self.total_words))?;
        writeln!(f, "  Avg word count: {}", group_thousands(self.average_words()))?;
        if !self.skipped.is_empty() {
            writeln!(f, "  Skipped files: {}", self.skipped.len())?;
        }

        if !self.orphans.is_empty() {
            writeln!(f)?;
            writeln!(f, "Potential orphan pages (no inbound content links):")?;
            for url in self.orphans.iter().take(self.report_limit) {
                writeln!(f, "  - {}", url)?;
            }
            if self.orphans.len() > self.report_limit {
                writeln!(f, "  ... and {} more", self.orphans.len() - self.report_limit)?;
            }
        }
        Ok(())
    }
}

/// Format an integer with comma thousands separators
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
