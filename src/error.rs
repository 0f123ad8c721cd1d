//! Error taxonomy (spec.md §7).
//!
//! Mirrors the teacher's `StorageError`/`EmbeddingError` shape: a
//! `#[non_exhaustive]` `thiserror` enum per boundary, composed into one
//! top-level error for anything that crosses the crate's public API.

use thiserror::Error;

/// Errors surfaced by the `MemoryStore` capability (spec.md §6).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("memory not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("merge conflict: {0}")]
    Conflict(String),
}

/// Errors from the embedding provider boundary. Recovered locally by
/// callers — never fatal to an orchestration (spec.md §7).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider unavailable: {0}")]
    Unavailable(String),
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Top-level error type for anything crossing the crate's public API.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(#[from] EmbeddingError),
    #[error("computation error: {0}")]
    Computation(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
