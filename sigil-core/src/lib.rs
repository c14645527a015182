//! # Sigil Core
//!
//! Graph data model, local-identifier generation and the store contract for
//! the sigil identity-resolution engine.
//!
//! This crate provides:
//! - The statement/fragment model pre-processing stages operate on
//! - `LocalId`: random, reproducible and derived identifier generation
//! - The `EntityStore`/`TransactionLog` seams the engine talks to storage
//!   through, plus an in-memory reference implementation
//! - The accumulating `Transaction` unit of graph mutation
//!
//! The triple store itself, the wire layer and RDF serialization formats
//! are external collaborators and live elsewhere.

pub mod error;
pub mod fragment;
pub mod identifier;
pub mod memory;
pub mod statement;
pub mod store;
pub mod term;
pub mod transaction;

// Re-exports
pub use error::{Error, Result};
pub use fragment::Fragment;
pub use identifier::{LocalId, IDENTIFIER_LENGTH};
pub use memory::{MemoryStore, MemoryTransactionLog};
pub use statement::Statement;
pub use store::{AuthContext, Binding, BindingStream, EntityStore, SelectQuery, TransactionLog};
pub use term::{BlankId, Iri, Literal, Term};
pub use transaction::{Transaction, TransactionStatus};
