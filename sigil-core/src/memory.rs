//! In-memory reference implementation of the store contract
//!
//! Backed by a sorted statement set behind a read-write lock, so query
//! results and listings come back in a deterministic order. Used by the
//! integration tests and as executable documentation of the commit
//! contract; a production deployment plugs a real triple store into the
//! same traits.

use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::store::{AuthContext, Binding, BindingStream, EntityStore, SelectQuery, TransactionLog};
use crate::term::{Iri, Term};
use crate::transaction::Transaction;
use async_trait::async_trait;
use futures::stream;
use futures::StreamExt;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

/// In-memory statement store with set semantics
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeSet<Statement>>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a statement directly, bypassing the transaction contract.
    ///
    /// Note: takes `&self` (not `&mut self`) due to interior mutability.
    /// Intended for seeding test fixtures.
    pub fn put(&self, statement: Statement) {
        self.data
            .write()
            .expect("RwLock poisoned")
            .insert(statement);
    }

    /// Snapshot of all statements, in sorted order
    pub fn statements(&self) -> Vec<Statement> {
        self.data
            .read()
            .expect("RwLock poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Number of stored statements
    pub fn len(&self) -> usize {
        self.data.read().expect("RwLock poisoned").len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> BTreeSet<Statement> {
        self.data.read().expect("RwLock poisoned").clone()
    }

    fn eval(&self, query: SelectQuery) -> Vec<Binding> {
        let snapshot = self.snapshot();
        let rdf_type = Iri::new(sigil_vocab::rdf::TYPE);

        match query {
            SelectQuery::DuplicateCandidates { shared_property } => {
                let mut types: BTreeMap<&Term, BTreeSet<&Iri>> = BTreeMap::new();
                let mut values: BTreeMap<&Term, BTreeSet<&Term>> = BTreeMap::new();
                for st in &snapshot {
                    if st.p == rdf_type {
                        if let Term::Iri(t) = &st.o {
                            types.entry(&st.s).or_default().insert(t);
                        }
                    } else if st.p == shared_property {
                        values.entry(&st.s).or_default().insert(&st.o);
                    }
                }

                let mut groups: BTreeMap<(&Iri, &Term), BTreeSet<&Term>> = BTreeMap::new();
                for (subject, subject_types) in &types {
                    if let Some(subject_values) = values.get(subject) {
                        for &t in subject_types {
                            for &v in subject_values {
                                groups.entry((t, v)).or_default().insert(*subject);
                            }
                        }
                    }
                }

                groups
                    .into_iter()
                    .filter(|(_, subjects)| subjects.len() > 1)
                    .map(|((t, v), _)| {
                        Binding::new()
                            .bind("type", Term::Iri(t.clone()))
                            .bind("value", v.clone())
                    })
                    .collect()
            }

            SelectQuery::SubjectsMatching {
                entity_type,
                property,
                value,
            } => {
                let type_term = Term::Iri(entity_type);
                let typed: BTreeSet<&Term> = snapshot
                    .iter()
                    .filter(|st| st.p == rdf_type && st.o == type_term)
                    .map(|st| &st.s)
                    .collect();
                snapshot
                    .iter()
                    .filter(|st| st.p == property && st.o == value && typed.contains(&st.s))
                    .map(|st| &st.s)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .map(|s| Binding::new().bind("id", s.clone()))
                    .collect()
            }

            SelectQuery::ReferencesTo { object } => snapshot
                .iter()
                .filter(|st| st.o == object)
                .map(|st| {
                    Binding::new()
                        .bind("subject", st.s.clone())
                        .bind("predicate", Term::Iri(st.p.clone()))
                })
                .collect(),

            SelectQuery::ForeignTypedSubjects {
                local_namespace,
                limit,
            } => snapshot
                .iter()
                .filter(|st| st.p == rdf_type)
                .filter_map(|st| st.s.as_iri())
                .filter(|iri| !iri.as_str().starts_with(&local_namespace))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .take(limit)
                .map(|iri| Binding::new().bind("subject", Term::Iri(iri.clone())))
                .collect(),
        }
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn query(&self, query: SelectQuery, _ctx: &AuthContext) -> Result<BindingStream> {
        let rows = self.eval(query);
        Ok(stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    async fn commit(
        &self,
        transactions: Vec<Transaction>,
        _ctx: &AuthContext,
    ) -> Result<Vec<Transaction>> {
        let mut committed = Vec::with_capacity(transactions.len());
        for mut trx in transactions {
            if trx.is_sealed() {
                return Err(Error::consistency(format!(
                    "transaction {} was already committed",
                    trx.id()
                )));
            }
            {
                // One write lock per transaction: all-or-nothing application,
                // inserts applied before removals.
                let mut data = self.data.write().expect("RwLock poisoned");
                for st in trx.inserted() {
                    data.insert(st.clone());
                }
                for st in trx.removed() {
                    data.remove(st);
                }
            }
            trx.seal_success();
            committed.push(trx);
        }
        Ok(committed)
    }

    async fn list_statements(
        &self,
        s: Option<&Term>,
        p: Option<&Iri>,
        o: Option<&Term>,
        _ctx: &AuthContext,
    ) -> Result<Vec<Statement>> {
        Ok(self
            .snapshot()
            .into_iter()
            .filter(|st| {
                s.map_or(true, |s| &st.s == s)
                    && p.map_or(true, |p| &st.p == p)
                    && o.map_or(true, |o| &st.o == o)
            })
            .collect())
    }
}

/// In-memory transaction log
#[derive(Clone, Debug, Default)]
pub struct MemoryTransactionLog {
    entries: Arc<RwLock<Vec<Transaction>>>,
}

impl MemoryTransactionLog {
    /// Create a new empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the logged transactions, in append order
    pub fn entries(&self) -> Vec<Transaction> {
        self.entries.read().expect("RwLock poisoned").clone()
    }
}

#[async_trait]
impl TransactionLog for MemoryTransactionLog {
    async fn store(&self, transactions: Vec<Transaction>) -> Result<()> {
        self.entries
            .write()
            .expect("RwLock poisoned")
            .extend(transactions);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use sigil_vocab::{rdf, rdfs, schema};

    fn type_st(s: &str, t: &str) -> Statement {
        Statement::new(Term::iri(s), Iri::new(rdf::TYPE), Term::iri(t))
    }

    fn label_st(s: &str, label: &str) -> Statement {
        Statement::new(Term::iri(s), Iri::new(rdfs::LABEL), Term::literal(label))
    }

    #[tokio::test]
    async fn staged_statements_only_apply_at_commit() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();

        let mut trx = Transaction::new();
        store
            .insert(vec![label_st("urn:sigil:e:aaaaaaaaaaaa", "x")], &mut trx)
            .await
            .unwrap();
        assert!(store.is_empty());

        let committed = store.commit(vec![trx], &ctx).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(committed[0].is_success());
    }

    #[tokio::test]
    async fn commit_applies_inserts_before_removals() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();
        store.put(label_st("https://example.com/old", "kept"));

        let mut trx = Transaction::new();
        store
            .insert(vec![label_st("urn:sigil:e:aaaaaaaaaaaa", "kept")], &mut trx)
            .await
            .unwrap();
        store
            .delete(vec![label_st("https://example.com/old", "kept")], &mut trx)
            .await
            .unwrap();
        store.commit(vec![trx], &ctx).await.unwrap();

        let listed = store
            .list_statements(None, None, None, &ctx)
            .await
            .unwrap();
        assert_eq!(listed, vec![label_st("urn:sigil:e:aaaaaaaaaaaa", "kept")]);
    }

    #[tokio::test]
    async fn committing_a_sealed_transaction_is_a_contract_violation() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();

        let mut trx = Transaction::new();
        trx.seal_success();
        let err = store.commit(vec![trx], &ctx).await.unwrap_err();
        assert!(matches!(err, Error::Consistency(_)));
    }

    #[tokio::test]
    async fn duplicate_candidates_require_shared_type_and_value() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();

        store.put(type_st("urn:sigil:e:aaaaaaaaaaaa", schema::DEFINED_TERM));
        store.put(label_st("urn:sigil:e:aaaaaaaaaaaa", "Term 1"));
        store.put(type_st("urn:sigil:e:bbbbbbbbbbbb", schema::DEFINED_TERM));
        store.put(label_st("urn:sigil:e:bbbbbbbbbbbb", "Term 1"));
        // same label, different type: not a candidate pair with the others
        store.put(type_st("urn:sigil:e:cccccccccccc", schema::PERSON));
        store.put(label_st("urn:sigil:e:cccccccccccc", "Term 1"));

        let rows: Vec<Binding> = store
            .query(
                SelectQuery::DuplicateCandidates {
                    shared_property: Iri::new(rdfs::LABEL),
                },
                &ctx,
            )
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("type"),
            Some(&Term::iri(schema::DEFINED_TERM))
        );
        assert_eq!(rows[0].get("value"), Some(&Term::literal("Term 1")));
    }

    #[tokio::test]
    async fn references_to_reports_subject_and_predicate() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();
        let term = Term::iri("urn:sigil:e:bbbbbbbbbbbb");
        store.put(Statement::new(
            Term::iri("urn:sigil:e:aaaaaaaaaaaa"),
            Iri::new("https://schema.org/hasDefinedTerm"),
            term.clone(),
        ));

        let rows: Vec<Binding> = store
            .query(SelectQuery::ReferencesTo { object: term }, &ctx)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("subject"),
            Some(&Term::iri("urn:sigil:e:aaaaaaaaaaaa"))
        );
        assert_eq!(
            rows[0].get("predicate"),
            Some(&Term::iri("https://schema.org/hasDefinedTerm"))
        );
    }

    #[tokio::test]
    async fn foreign_subject_discovery_skips_local_identifiers_and_pages() {
        let store = MemoryStore::new();
        let ctx = AuthContext::system();
        store.put(type_st("urn:sigil:e:aaaaaaaaaaaa", schema::PERSON));
        store.put(type_st("https://example.com/p1", schema::PERSON));
        store.put(type_st("https://example.com/p2", schema::PERSON));

        let rows: Vec<Binding> = store
            .query(
                SelectQuery::ForeignTypedSubjects {
                    local_namespace: "urn:sigil:e:".to_string(),
                    limit: 1,
                },
                &ctx,
            )
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("subject"),
            Some(&Term::iri("https://example.com/p1"))
        );
    }
}
