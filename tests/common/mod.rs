//! Common test utilities for pipeline integration tests
//!
//! Deterministic embedders and temporary corpus fixtures.

#![allow(dead_code)]

pub mod corpus;
pub mod stub_embedder;

pub use corpus::TempCorpus;
pub use stub_embedder::{FailingEmbedder, NanEmbedder, StubEmbedder};
