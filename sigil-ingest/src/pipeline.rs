//! Pre-processing pipeline
//!
//! The stages of one incoming fragment run strictly in sequence, each
//! depending on the previous stage's output:
//!
//! 1. type classification
//! 2. required-type validation
//! 3. blank-node resolution
//! 4. intra-batch duplicate merging
//!
//! The first failing stage short-circuits the chain; the caller sees the
//! validation error before anything is written.

use crate::anonymous::{resolve_anonymous, IdentifierMapping};
use crate::error::Result;
use crate::merge::{merge_anonymous, merge_named};
use crate::schema::SchemaRegistry;
use crate::types::assign_types;
use crate::validate::check_required_types;
use sigil_core::Fragment;
use tracing::debug;

/// Outcome of pre-processing one fragment
#[derive(Clone, Debug, Default)]
pub struct ProcessReport {
    /// Blank-node replacements that were applied
    pub mappings: Vec<IdentifierMapping>,
    /// Number of intra-batch duplicates converged
    pub merged: usize,
}

/// The ordered pre-processing stages for incoming fragments
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    schema: SchemaRegistry,
}

impl Pipeline {
    /// Pipeline with the default schema registrations
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with a custom schema registry
    pub fn with_schema(schema: SchemaRegistry) -> Self {
        Self { schema }
    }

    /// The schema registry the stages consult
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Run all stages over the fragment, mutating it in place.
    pub fn process(&self, fragment: &mut Fragment) -> Result<ProcessReport> {
        debug!(statements = fragment.len(), "pre-processing incoming fragment");

        assign_types(fragment, &self.schema)?;
        check_required_types(fragment)?;
        let mappings = resolve_anonymous(fragment, &self.schema)?;
        let merged = merge_anonymous(fragment);
        merge_named(fragment);

        debug!(
            statements = fragment.len(),
            replaced = mappings.len(),
            merged,
            "fragment pre-processing finished"
        );
        Ok(ProcessReport { mappings, merged })
    }
}
