//! Complaint triage library crate (used by the `triage` binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`TriageService`] - Owns the embedder, the embedding cache, the snapshot worker and
//!   the classifier
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`ComplaintRecord`], [`ClassificationFields`], [`ClassificationProgress`] - Record model
//!
//! ## Classification
//! - [`parse`], [`ParsedReply`], [`Provenance`], [`ParseError`] - Model reply parsing
//! - [`Classifier`], [`BatchReport`] - Prompt, inference call and write-back
//! - [`OllamaClient`], [`InferenceBackend`] - Inference boundary
//!
//! ## Similarity
//! - [`EmbeddingCache`], [`SnapshotWorker`] - Id to vector cache with snapshot persistence
//! - [`SimilarityScorer`] - Embedding plus metadata scoring
//! - [`SimilarityEngine`], [`SimilarityCapability`], [`SimilarityCandidate`] - Ranking
//! - [`SentenceEmbedder`], [`SentenceConfig`], [`LazyEmbedder`] - Embedding generation
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod classify;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod inference;
pub mod parser;
pub mod record;
pub mod scoring;
pub mod service;
pub mod similarity;

pub use cache::{CacheConfig, CacheError, CacheResult, EmbeddingCache, SnapshotWorker};
pub use classify::{BatchReport, ClassificationError, Classifier, ClassifyResult, build_prompt};
pub use config::{Config, ConfigError};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{CountingEmbedder, CountingFactory, FailingFactory};
pub use embedding::{
    EmbedderFactory, EmbeddingError, LazyEmbedder, SENTENCE_EMBEDDING_DIM, SentenceConfig,
    SentenceEmbedder, TextEmbedder,
};
pub use hashing::{TextFingerprint, fingerprint_text, hash_to_u64};
#[cfg(any(test, feature = "mock"))]
pub use inference::MockInferenceBackend;
pub use inference::{
    InferenceBackend, InferenceConfig, InferenceError, InferenceResult, ModelInfo, OllamaClient,
};
pub use parser::{ClassificationResult, ParseError, ParsedReply, Provenance, parse};
pub use record::{
    ClassificationFields, ClassificationProgress, ComplaintRecord, UNCLASSIFIED_MARKERS,
};
pub use scoring::{ScoringMetadata, SimilarityScorer, cosine_similarity};
pub use service::{ServiceError, TriageService};
pub use similarity::{
    SimilarityCandidate, SimilarityCapability, SimilarityEngine, SimilarityError,
    SimilarityResult, rank_candidates,
};
