//! Cross-batch duplicate detection
//!
//! Entities submitted in separate requests are never checked against each
//! other at ingest time, so semantically identical linked entities can end
//! up persisted twice:
//!
//! ```text
//! [] a schema:VideoObject ;
//!     schema:hasDefinedTerm [ a schema:DefinedTerm ; rdfs:label "Term 1" ] .
//!
//! [] a schema:VideoObject ;
//!     schema:hasDefinedTerm [ a schema:DefinedTerm ; rdfs:label "Term 1" ] .
//! ```
//!
//! This job patrols the persisted store for subjects sharing both a type
//! and a value of the configured shared property, elects a canonical
//! survivor per group (descending identifier order, head wins — arbitrary
//! but deterministic) and reroutes every inbound reference onto it. The
//! duplicate's own statements are removed but their values are not
//! migrated onto the canonical node; richer reconciliation is a known
//! incompleteness.
//!
//! Triggers are guarded by a single-flight flag: a trigger arriving while
//! a run is in progress is dropped. A store error aborts the current cycle
//! only; the flag clears regardless of outcome.

use crate::config::JobsConfig;
use crate::error::{JobError, Result};
use crate::single_flight::SingleFlight;
use futures::TryStreamExt;
use sigil_core::{AuthContext, EntityStore, Iri, SelectQuery, Statement, Term, Transaction};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A (type, shared-property, shared-value) tuple discovered in the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateCandidate {
    /// Shared rdf:type value
    pub entity_type: Iri,
    /// The configured shared property
    pub shared_property: Iri,
    /// The property value the duplicates share
    pub shared_value: Term,
}

/// Counters from one completed detection cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectStats {
    /// Candidate (type, value) groups found
    pub candidates: usize,
    /// Duplicate subjects converged into their canonical
    pub duplicates_merged: usize,
    /// Inbound references repointed
    pub links_rerouted: usize,
}

/// Outcome of one trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The cycle ran to completion
    Completed(DetectStats),
    /// A run was already in progress; the trigger was dropped
    Skipped,
}

/// Scheduled cross-batch duplicate detector
#[derive(Debug)]
pub struct DuplicateDetector<S> {
    store: Arc<S>,
    config: JobsConfig,
    guard: SingleFlight,
}

impl<S: EntityStore> DuplicateDetector<S> {
    /// Create a detector over the given store
    pub fn new(store: Arc<S>, config: JobsConfig) -> Self {
        Self {
            store,
            config,
            guard: SingleFlight::new(),
        }
    }

    /// Run one detection cycle.
    ///
    /// Returns [`RunOutcome::Skipped`] if a cycle is already in progress.
    pub async fn run(&self, ctx: &AuthContext) -> Result<RunOutcome> {
        let Some(_token) = self.guard.try_begin() else {
            trace!("duplicate check already in progress, trigger dropped");
            return Ok(RunOutcome::Skipped);
        };

        debug!("duplicate check started");
        // token drops on every path below, clearing the flag
        let stats = self.run_cycle(ctx).await?;
        debug!(
            candidates = stats.candidates,
            merged = stats.duplicates_merged,
            rerouted = stats.links_rerouted,
            "duplicate check finished"
        );
        Ok(RunOutcome::Completed(stats))
    }

    async fn run_cycle(&self, ctx: &AuthContext) -> Result<DetectStats> {
        let shared_property = Iri::new(&self.config.shared_property);
        let candidates = self.find_candidates(&shared_property, ctx).await?;

        let mut stats = DetectStats {
            candidates: candidates.len(),
            ..DetectStats::default()
        };
        let mut pending: Vec<Transaction> = Vec::new();

        for candidate in candidates {
            trace!(
                entity_type = %candidate.entity_type,
                value = %candidate.shared_value,
                "entities share type and value of the shared property"
            );
            let duplicates = self.find_duplicates(&candidate, ctx).await?;
            // an earlier merge in this cycle may already have consumed the
            // group
            if duplicates.len() < 2 {
                continue;
            }
            let trx = self.merge(&duplicates, ctx, &mut stats).await?;
            pending.push(trx);
            if pending.len() >= self.config.commit_batch_size {
                self.commit_batch(&mut pending, ctx).await?;
            }
        }
        self.commit_batch(&mut pending, ctx).await?;
        Ok(stats)
    }

    async fn find_candidates(
        &self,
        shared_property: &Iri,
        ctx: &AuthContext,
    ) -> Result<Vec<DuplicateCandidate>> {
        let mut rows = self
            .store
            .query(
                SelectQuery::DuplicateCandidates {
                    shared_property: shared_property.clone(),
                },
                ctx,
            )
            .await?;

        let mut candidates = Vec::new();
        while let Some(row) = rows.try_next().await? {
            let entity_type = row
                .require("type")?
                .as_iri()
                .cloned()
                .ok_or_else(|| sigil_core::Error::query("candidate type is not an IRI"))?;
            candidates.push(DuplicateCandidate {
                entity_type,
                shared_property: shared_property.clone(),
                shared_value: row.require("value")?.clone(),
            });
        }
        Ok(candidates)
    }

    /// The full duplicate set for a candidate, sorted by descending
    /// identifier order: the first element is the canonical survivor.
    async fn find_duplicates(
        &self,
        candidate: &DuplicateCandidate,
        ctx: &AuthContext,
    ) -> Result<Vec<Iri>> {
        let mut rows = self
            .store
            .query(
                SelectQuery::SubjectsMatching {
                    entity_type: candidate.entity_type.clone(),
                    property: candidate.shared_property.clone(),
                    value: candidate.shared_value.clone(),
                },
                ctx,
            )
            .await?;

        let mut ids = Vec::new();
        while let Some(row) = rows.try_next().await? {
            if let Some(iri) = row.require("id")?.as_iri() {
                ids.push(iri.clone());
            }
        }
        ids.sort_by(|a, b| b.as_str().cmp(a.as_str()));
        Ok(ids)
    }

    /// Build the merge transaction for one duplicate set.
    async fn merge(
        &self,
        duplicates: &[Iri],
        ctx: &AuthContext,
        stats: &mut DetectStats,
    ) -> Result<Transaction> {
        let canonical = Term::Iri(duplicates[0].clone());
        let mut trx = Transaction::new();
        trx.mark_affected(canonical.clone());

        for duplicate in &duplicates[1..] {
            let duplicate = Term::Iri(duplicate.clone());
            debug!(duplicate = %duplicate, canonical = %canonical, "rerouting links to duplicate");

            let mut inserts = Vec::new();
            let mut deletes = Vec::new();
            for record in self.find_references(&duplicate, ctx).await? {
                inserts.push(Statement::new(
                    record.subject.clone(),
                    record.predicate.clone(),
                    canonical.clone(),
                ));
                deletes.push(Statement::new(
                    record.subject,
                    record.predicate,
                    duplicate.clone(),
                ));
                stats.links_rerouted += 1;
            }
            deletes.extend(
                self.store
                    .list_statements(Some(&duplicate), None, None, ctx)
                    .await?,
            );

            self.store.insert(inserts, &mut trx).await?;
            self.store.delete(deletes, &mut trx).await?;
            trx.mark_affected(duplicate);
            stats.duplicates_merged += 1;
        }
        Ok(trx)
    }

    /// All (subject, predicate) pairs referencing the duplicate as object
    async fn find_references(
        &self,
        duplicate: &Term,
        ctx: &AuthContext,
    ) -> Result<Vec<ReroutingRecord>> {
        let mut rows = self
            .store
            .query(
                SelectQuery::ReferencesTo {
                    object: duplicate.clone(),
                },
                ctx,
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.try_next().await? {
            let subject = row.require("subject")?.clone();
            let predicate = row
                .require("predicate")?
                .as_iri()
                .cloned()
                .ok_or_else(|| sigil_core::Error::query("reference predicate is not an IRI"))?;
            trace!(subject = %subject, predicate = %predicate, "statement points to duplicate");
            records.push(ReroutingRecord { subject, predicate });
        }
        Ok(records)
    }

    async fn commit_batch(
        &self,
        pending: &mut Vec<Transaction>,
        ctx: &AuthContext,
    ) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let committed = self
            .store
            .commit(std::mem::take(pending), ctx)
            .await
            .map_err(JobError::Core)?;
        for trx in &committed {
            if !trx.is_success() {
                warn!(transaction = %trx.id(), reason = ?trx.failure_reason(), "merge transaction failed");
            }
        }
        Ok(())
    }
}

/// A (subject, predicate) pair that referenced a duplicate and must be
/// repointed at the canonical resource
#[derive(Clone, Debug, PartialEq, Eq)]
struct ReroutingRecord {
    subject: Term,
    predicate: Iri,
}
