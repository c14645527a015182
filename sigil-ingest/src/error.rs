//! Ingest error types
//!
//! Everything here is an input-validation error: raised during
//! pre-processing and propagated to the submitting caller before any write
//! reaches the store.

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, IngestError>;

/// Pre-processing errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// Subject lacks the external type statement its classification requires
    #[error("The fragment with subject [{subject}] is missing a type definition")]
    MissingType {
        /// The offending subject
        subject: String,
    },

    /// A classifier-typed subject lacks a characteristic property
    #[error("The entity of type [{entity_type}] was marked as classifier, but it lacks a characteristic property")]
    MissingCharacteristicProperty {
        /// The registered classifier type that triggered the rule
        entity_type: String,
    },

    /// A blank node reached resolution without a classification
    #[error("No classification was assigned to [{subject}], which is a prerequisite for generating identifiers")]
    MissingClassification {
        /// The offending subject
        subject: String,
    },

    /// An embedded blank node is referenced by no other statement
    #[error("An unreferenced blank node [{subject}] exists in the fragment")]
    UnreferencedEmbedded {
        /// The offending subject
        subject: String,
    },

    /// Subject matched none of the three classification rules
    #[error("The fragment with subject [{subject}] could not be classified")]
    Unclassifiable {
        /// The offending subject
        subject: String,
    },

    /// Core error (identifier generation, store access)
    #[error("Core error: {0}")]
    Core(#[from] sigil_core::Error),
}
