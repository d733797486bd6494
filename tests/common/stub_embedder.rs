//! Deterministic embedders for pipeline tests
//!
//! `StubEmbedder` hashes lowercase word tokens into a fixed number of
//! buckets (bag of words). Texts that share most of their vocabulary land
//! close together; texts with disjoint vocabulary are nearly orthogonal.

use interlink::{Embedder, EmbeddingError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Bag-of-words hashing embedder
pub struct StubEmbedder {
    dimensions: usize,
    calls: Arc<AtomicUsize>,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl StubEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of `embed_batch` calls
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn vector(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = fnv1a(&token.to_lowercase()) as usize % self.dimensions;
            v[bucket] += 1.0;
        }
        v
    }
}

impl Embedder for StubEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn model_name(&self) -> &str {
        "stub-bag-of-words"
    }
}

/// Embedder that succeeds until its `fail_on`-th call (1-based)
pub struct FailingEmbedder {
    inner: StubEmbedder,
    fail_on: usize,
}

impl FailingEmbedder {
    pub fn new(fail_on: usize) -> Self {
        Self {
            inner: StubEmbedder::default(),
            fail_on,
        }
    }
}

impl Embedder for FailingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let call = self.inner.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if call >= self.fail_on {
            return Err(EmbeddingError::ModelError("provider unavailable".into()));
        }
        Ok(texts.iter().map(|t| self.inner.vector(t)).collect())
    }
}

fn fnv1a(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Embedder whose vectors start with NaN
pub struct NanEmbedder;

impl Embedder for NanEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|_| vec![f32::NAN, 1.0]).collect())
    }
}
