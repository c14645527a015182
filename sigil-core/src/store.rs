//! Store contract consumed by the identity-resolution engine
//!
//! The triple store itself is an external collaborator; this module defines
//! the seam the engine talks through. The traits are runtime-agnostic and
//! use `async_trait` for async support.
//!
//! ## Traits
//!
//! - [`EntityStore`]: query and mutate the persisted graph
//! - [`TransactionLog`]: persist committed transactions
//!
//! ## Queries
//!
//! The engine only ever issues a handful of query shapes, so the contract
//! models them as a typed [`SelectQuery`] enum rather than a query string;
//! the storage layer owns the translation into its own query language.
//! Binding rows stream back so page-sized result sets don't have to be
//! buffered by the store.

use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::term::{Iri, Term};
use crate::transaction::Transaction;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Caller identity handed to every store operation.
///
/// Authentication itself is out of scope; the engine only distinguishes
/// the system identity its scheduled jobs run under from API callers.
#[derive(Clone, Debug)]
pub struct AuthContext {
    principal: Arc<str>,
    admin: bool,
}

impl AuthContext {
    /// The run-as identity used by scheduled jobs
    pub fn system() -> Self {
        Self {
            principal: Arc::from("system"),
            admin: true,
        }
    }

    /// A regular caller identity
    pub fn user(principal: impl AsRef<str>) -> Self {
        Self {
            principal: Arc::from(principal.as_ref()),
            admin: false,
        }
    }

    /// The authenticated principal
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// True for the system identity
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// The query shapes the engine issues against the store.
///
/// Each variant documents the variables its binding rows carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectQuery {
    /// (type, value) pairs of the shared property where more than one
    /// subject carries both. Rows bind `type` and `value`.
    ///
    /// Assumes GROUP BY/HAVING-style aggregation on the store side; a store
    /// without it can stream all (subject, type, value) triples and group
    /// in-process at a performance cost.
    DuplicateCandidates {
        /// Property whose shared values indicate duplication
        shared_property: Iri,
    },

    /// All subjects carrying the given type and property value.
    /// Rows bind `id`.
    SubjectsMatching {
        /// Required rdf:type value
        entity_type: Iri,
        /// Property to match
        property: Iri,
        /// Required property value
        value: Term,
    },

    /// All (subject, predicate) pairs referencing the given term in object
    /// position. Rows bind `subject` and `predicate`.
    ReferencesTo {
        /// The referenced object
        object: Term,
    },

    /// Typed subjects whose IRI does not start with the local namespace,
    /// bounded by `limit`. Rows bind `subject`.
    ForeignTypedSubjects {
        /// Namespace that marks an identifier as local
        local_namespace: String,
        /// Page size for one discovery cycle
        limit: usize,
    },
}

/// One row of query results
#[derive(Clone, Debug, Default)]
pub struct Binding {
    values: HashMap<String, Term>,
}

impl Binding {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a variable (builder style)
    pub fn bind(mut self, var: impl Into<String>, term: Term) -> Self {
        self.values.insert(var.into(), term);
        self
    }

    /// Look up a bound variable
    pub fn get(&self, var: &str) -> Option<&Term> {
        self.values.get(var)
    }

    /// Look up a bound variable, failing with a query error if absent
    pub fn require(&self, var: &str) -> Result<&Term> {
        self.get(var)
            .ok_or_else(|| Error::query(format!("missing binding for variable '{var}'")))
    }
}

/// Stream of binding rows from a query
pub type BindingStream = BoxStream<'static, Result<Binding>>;

/// Query and mutation contract of the underlying triple store.
///
/// `insert` and `delete` stage statements into the given transaction; the
/// store only changes at `commit`, which applies each transaction
/// all-or-nothing, seals it with a success or failure status and returns
/// the sealed transactions. A store error aborts the operation; callers
/// must impose any timeout at this boundary.
#[async_trait]
pub trait EntityStore: Debug + Send + Sync {
    /// Evaluate a query, streaming binding rows
    async fn query(&self, query: SelectQuery, ctx: &AuthContext) -> Result<BindingStream>;

    /// Stage statements for insertion under the transaction
    async fn insert(&self, statements: Vec<Statement>, trx: &mut Transaction) -> Result<()> {
        trx.insert_all(statements)
    }

    /// Stage statements for removal under the transaction
    async fn delete(&self, statements: Vec<Statement>, trx: &mut Transaction) -> Result<()> {
        trx.remove_all(statements)
    }

    /// Commit staged transactions, returning each sealed with its status
    async fn commit(
        &self,
        transactions: Vec<Transaction>,
        ctx: &AuthContext,
    ) -> Result<Vec<Transaction>>;

    /// List statements matching the pattern (`None` matches anything)
    async fn list_statements(
        &self,
        s: Option<&Term>,
        p: Option<&Iri>,
        o: Option<&Term>,
        ctx: &AuthContext,
    ) -> Result<Vec<Statement>>;
}

/// Persistence for committed transactions
#[async_trait]
pub trait TransactionLog: Debug + Send + Sync {
    /// Append committed transactions to the log
    async fn store(&self, transactions: Vec<Transaction>) -> Result<()>;
}
