//! Error types for sigil-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors
    #[error("Store error: {0}")]
    Store(String),

    /// Query evaluation errors
    #[error("Query error: {0}")]
    Query(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reproducible identifier requested with an empty seed list
    #[error("Cannot derive a reproducible identifier from an empty seed")]
    EmptySeed,

    /// Mutation attempted on a transaction that was already committed
    #[error("Transaction {0} is sealed and cannot be modified")]
    TransactionSealed(String),

    /// A store-contract violation (e.g. a committed transaction without a
    /// success status)
    #[error("Consistency violation: {0}")]
    Consistency(String),

    /// JSON serialization error (transaction log)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Create a query error
    pub fn query(msg: impl Into<String>) -> Self {
        Error::Query(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a consistency violation error
    pub fn consistency(msg: impl Into<String>) -> Self {
        Error::Consistency(msg.into())
    }
}
