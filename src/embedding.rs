//! Sentence embeddings
//!
//! A trait-based embedding backend (`Embedder`) so production code can use
//! fastembed-rs while tests use deterministic stub embedders. The provider is
//! constructed once by the caller and passed into the pipeline.

use crate::document::Document;
use std::fmt;

/// Characters of normalized content included in the embedding input
pub const EMBED_CONTENT_CHARS: usize = 1500;

/// Default sentence-embedding model
pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

/// Error type for embedding operations.
#[derive(Debug)]
pub enum EmbeddingError {
    /// The embedding model returned no results
    EmptyResult,
    /// Model loading or inference failed
    ModelError(String),
    /// The model name is not one the backend knows
    InvalidModel(String),
    /// A vector came back with a different length than the rest of the run
    DimensionMismatch { expected: usize, actual: usize },
    /// A vector component is NaN or infinite
    NonFinite { index: usize },
}

impl fmt::Display for EmbeddingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingError::EmptyResult => write!(f, "embedding returned no results"),
            EmbeddingError::ModelError(msg) => write!(f, "embedding model error: {}", msg),
            EmbeddingError::InvalidModel(name) => write!(
                f,
                "unknown embedding model '{}' (supported: all-MiniLM-L6-v2, bge-small-en-v1.5, \
                 bge-base-en-v1.5, bge-large-en-v1.5; add -q for quantized)",
                name
            ),
            EmbeddingError::DimensionMismatch { expected, actual } => write!(
                f,
                "embedding dimension mismatch: expected {}, got {}",
                expected, actual
            ),
            EmbeddingError::NonFinite { index } => {
                write!(f, "embedding has a non-finite value at index {}", index)
            }
        }
    }
}

impl std::error::Error for EmbeddingError {}

/// Trait for embedding text into vectors.
///
/// Implementations handle model loading and inference and are expected to be
/// configured for mean pooling. fastembed-rs for production, stubs for tests.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Name of the model, for logs.
    fn model_name(&self) -> &str {
        "unknown"
    }

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::EmptyResult)
    }
}

/// Build the text embedded for a document
///
/// Title, description and the first [`EMBED_CONTENT_CHARS`] characters of
/// content, space separated, skipping empty parts.
pub fn embedding_input(doc: &Document) -> String {
    let excerpt: String = doc.content.chars().take(EMBED_CONTENT_CHARS).collect();
    [
        doc.title.as_str(),
        doc.description.as_deref().unwrap_or(""),
        excerpt.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Scale a vector to unit length; zero vectors are returned unchanged.
pub fn normalize_l2(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
    vector
}

/// Cosine similarity between two vectors.
///
/// Zero vectors have similarity 0.0 with everything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

// ---------------------------------------------------------------------------
// FastEmbedEmbedder: production embedder behind the `embeddings` feature
// ---------------------------------------------------------------------------

#[cfg(feature = "embeddings")]
mod fastembed_impl {
    use super::{Embedder, EmbeddingError};
    use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Production embedder backed by fastembed (ONNX Runtime).
    ///
    /// Wraps `fastembed::TextEmbedding` in a `Mutex` because its `embed`
    /// method requires `&mut self`, while the `Embedder` trait uses `&self`.
    /// fastembed mean-pools the sentence-transformer models listed here.
    pub struct FastEmbedEmbedder {
        model: Mutex<TextEmbedding>,
        name: String,
    }

    impl FastEmbedEmbedder {
        /// Load a model by name, caching files under `cache_dir`.
        pub fn new(name: &str, cache_dir: Option<PathBuf>) -> Result<Self, EmbeddingError> {
            let model = parse_model_name(name)?;
            let mut options = InitOptions::new(model).with_show_download_progress(true);
            if let Some(dir) = cache_dir {
                std::fs::create_dir_all(&dir).map_err(|e| {
                    EmbeddingError::ModelError(format!(
                        "failed to create model cache {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
                options = options.with_cache_dir(dir);
            }
            let embedding = TextEmbedding::try_new(options)
                .map_err(|e| EmbeddingError::ModelError(e.to_string()))?;
            Ok(Self {
                model: Mutex::new(embedding),
                name: name.to_string(),
            })
        }
    }

    fn parse_model_name(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
        match name.to_lowercase().as_str() {
            "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
            "all-minilm-l6-v2-q" => Ok(EmbeddingModel::AllMiniLML6V2Q),
            "bge-small-en-v1.5" => Ok(EmbeddingModel::BGESmallENV15),
            "bge-small-en-v1.5-q" => Ok(EmbeddingModel::BGESmallENV15Q),
            "bge-base-en-v1.5" => Ok(EmbeddingModel::BGEBaseENV15),
            "bge-base-en-v1.5-q" => Ok(EmbeddingModel::BGEBaseENV15Q),
            "bge-large-en-v1.5" => Ok(EmbeddingModel::BGELargeENV15),
            "bge-large-en-v1.5-q" => Ok(EmbeddingModel::BGELargeENV15Q),
            _ => Err(EmbeddingError::InvalidModel(name.to_string())),
        }
    }

    impl Embedder for FastEmbedEmbedder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            let mut model = self
                .model
                .lock()
                .map_err(|_| EmbeddingError::ModelError("model lock poisoned".into()))?;
            let embeddings = model
                .embed(texts.to_vec(), None)
                .map_err(|e| EmbeddingError::ModelError(e.to_string()))?;
            if embeddings.is_empty() {
                return Err(EmbeddingError::EmptyResult);
            }
            Ok(embeddings)
        }

        fn model_name(&self) -> &str {
            &self.name
        }
    }

}

#[cfg(feature = "embeddings")]
pub use fastembed_impl::FastEmbedEmbedder;
