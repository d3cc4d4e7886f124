//! Error types for the kbscope domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! None of these are fatal to a request: the engine degrades to "less
//! context" instead of aborting. They exist so collaborators can report
//! what went wrong to the operator log.

use thiserror::Error;

/// The top-level error type for kbscope operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Knowledge errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a knowledge collaborator.
#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error("Knowledge source not configured: {0}")]
    NotConfigured(String),

    #[error("Knowledge source unavailable: {0}")]
    Unavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid knowledge row at index {index}: {reason}")]
    InvalidRow { index: usize, reason: String },
}
