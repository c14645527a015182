//! Global-identifier normalization
//!
//! Subjects typed under a foreign naming scheme are rewritten into the
//! local namespace: every statement with the foreign identifier as subject
//! or object is rebuilt around a derived local identifier, and the new
//! subject records the foreign value under the original-identifier
//! provenance predicate.
//!
//! Within one transaction the replacements are inserted before the
//! originals are deleted, so a reader never observes a disconnected graph.
//! The pair is not atomic at the store level: a crash between the two
//! steps leaves both the old and the new copy present. That residue is the
//! accepted trade-off (at-least-once, not exactly-once) — the next cycle
//! re-queries from scratch, there is no persisted cursor.
//!
//! Transactions are committed in fixed-size batches; every committed
//! transaction must report a success status (anything else is a
//! store-contract violation and fatal for the run) and is then persisted
//! to the transaction log, also batched.

use crate::config::JobsConfig;
use crate::error::{JobError, Result};
use futures::TryStreamExt;
use sigil_core::{
    AuthContext, EntityStore, Iri, LocalId, SelectQuery, Statement, Term, Transaction,
    TransactionLog,
};
use sigil_vocab::local;
use std::sync::Arc;
use tracing::{debug, trace};

/// Scheduled foreign-identifier normalizer
#[derive(Debug)]
pub struct IdentifierNormalizer<S, L> {
    store: Arc<S>,
    trx_log: Arc<L>,
    config: JobsConfig,
}

impl<S: EntityStore, L: TransactionLog> IdentifierNormalizer<S, L> {
    /// Create a normalizer over the given store and transaction log
    pub fn new(store: Arc<S>, trx_log: Arc<L>, config: JobsConfig) -> Self {
        Self {
            store,
            trx_log,
            config,
        }
    }

    /// Run one normalization cycle over at most one page of foreign
    /// identifiers. Returns the committed transactions.
    pub async fn run(&self, ctx: &AuthContext) -> Result<Vec<Transaction>> {
        let subjects = self.find_foreign_subjects(ctx).await?;
        if subjects.is_empty() {
            debug!("no foreign identifiers found");
            return Ok(Vec::new());
        }
        debug!(
            count = subjects.len(),
            "rewriting foreign identifiers into the local namespace"
        );

        let mut committed_all = Vec::new();
        let mut pending: Vec<Transaction> = Vec::new();
        let mut log_buffer: Vec<Transaction> = Vec::new();

        for subject in subjects {
            let trx = self.rewrite_subject(&subject, ctx).await?;
            pending.push(trx);
            if pending.len() >= self.config.commit_batch_size {
                self.commit_batch(&mut pending, &mut log_buffer, &mut committed_all, ctx)
                    .await?;
            }
        }
        self.commit_batch(&mut pending, &mut log_buffer, &mut committed_all, ctx)
            .await?;
        if !log_buffer.is_empty() {
            self.trx_log.store(std::mem::take(&mut log_buffer)).await?;
        }

        debug!(
            transactions = committed_all.len(),
            "identifier normalization finished"
        );
        Ok(committed_all)
    }

    /// One page of typed subjects outside the local namespace, re-queried
    /// from scratch each cycle.
    async fn find_foreign_subjects(&self, ctx: &AuthContext) -> Result<Vec<Iri>> {
        let mut rows = self
            .store
            .query(
                SelectQuery::ForeignTypedSubjects {
                    local_namespace: self.config.local_namespace.clone(),
                    limit: self.config.page_size,
                },
                ctx,
            )
            .await?;

        let mut subjects = Vec::new();
        while let Some(row) = rows.try_next().await? {
            if let Some(iri) = row.require("subject")?.as_iri() {
                subjects.push(iri.clone());
            }
        }
        Ok(subjects)
    }

    /// Build the replacement transaction for one foreign identifier.
    async fn rewrite_subject(&self, foreign: &Iri, ctx: &AuthContext) -> Result<Transaction> {
        let foreign_term = Term::Iri(foreign.clone());
        let subject_statements = self
            .store
            .list_statements(Some(&foreign_term), None, None, ctx)
            .await?;
        let object_statements = self
            .store
            .list_statements(None, None, Some(&foreign_term), ctx)
            .await?;

        let derived = LocalId::derived(&self.config.local_namespace, foreign.local_name());
        let local_term = Term::Iri(derived.iri());
        trace!(foreign = %foreign_term, local = %local_term, "derived local identifier");

        let mut replacements =
            Vec::with_capacity(subject_statements.len() + object_statements.len() + 1);
        for st in &subject_statements {
            replacements.push(Statement::new(local_term.clone(), st.p.clone(), st.o.clone()));
        }
        for st in &object_statements {
            replacements.push(Statement::new(st.s.clone(), st.p.clone(), local_term.clone()));
        }
        replacements.push(Statement::new(
            local_term.clone(),
            Iri::new(local::ORIGINAL_IDENTIFIER),
            foreign_term.clone(),
        ));

        let mut trx = Transaction::new();
        trx.mark_affected(local_term);
        trx.mark_affected(foreign_term);
        // insert precedes delete: a reader must never observe the graph
        // disconnected
        self.store.insert(replacements, &mut trx).await?;
        let mut originals = subject_statements;
        originals.extend(object_statements);
        self.store.delete(originals, &mut trx).await?;
        Ok(trx)
    }

    async fn commit_batch(
        &self,
        pending: &mut Vec<Transaction>,
        log_buffer: &mut Vec<Transaction>,
        committed_all: &mut Vec<Transaction>,
        ctx: &AuthContext,
    ) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let committed = self.store.commit(std::mem::take(pending), ctx).await?;
        for trx in &committed {
            if !trx.is_success() {
                return Err(JobError::Consistency(format!(
                    "committed transaction {} reports status '{}'",
                    trx.id(),
                    trx.status().as_str()
                )));
            }
        }

        log_buffer.extend(committed.iter().cloned());
        if log_buffer.len() >= self.config.commit_batch_size {
            self.trx_log.store(std::mem::take(log_buffer)).await?;
        }
        committed_all.extend(committed);
        Ok(())
    }
}
