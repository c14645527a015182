//! # Sigil Ingest
//!
//! Per-request pre-processing for incoming graph fragments: fragment-local
//! type classification, deterministic blank-node resolution and intra-batch
//! duplicate merging, ending with submission to the storage layer.
//!
//! The stages run strictly in sequence (each depends on the previous
//! stage's output) and every failure is an input-validation error raised
//! before any write reaches the store. Duplicates that already exist in
//! the store are out of scope here; the scheduled jobs in `sigil-jobs`
//! reconcile those.

pub mod anonymous;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod schema;
pub mod submit;
pub mod types;
pub mod validate;

// Re-exports
pub use anonymous::{resolve_anonymous, IdentifierMapping};
pub use error::{IngestError, Result};
pub use merge::{merge_anonymous, merge_named};
pub use pipeline::{Pipeline, ProcessReport};
pub use schema::SchemaRegistry;
pub use submit::submit_fragment;
pub use types::{assign_types, classification_of, Classification};
pub use validate::check_required_types;
