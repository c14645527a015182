//! Transaction - an accumulating unit of graph mutation
//!
//! A transaction collects the statements a create/update operation or a
//! scheduled-job cycle wants inserted and removed, carries a status and a
//! creation timestamp, and becomes immutable once the store has committed
//! it. Committed transactions serialize to JSON for the transaction log.

use crate::error::{Error, Result};
use crate::identifier::LocalId;
use crate::statement::Statement;
use crate::term::{Iri, Term};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sigil_vocab::{local, transactions};

/// Commit status of a transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Still accumulating statements
    Running,
    /// Committed successfully
    Success,
    /// Commit failed
    Failure,
}

impl TransactionStatus {
    /// The status literal used in the transaction vocabulary
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Running => transactions::RUNNING,
            TransactionStatus::Success => transactions::SUCCESS,
            TransactionStatus::Failure => transactions::FAILURE,
        }
    }
}

/// An accumulating, eventually-committed unit of graph mutation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    id: Iri,
    at: DateTime<Utc>,
    status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure_reason: Option<String>,
    inserted: Vec<Statement>,
    removed: Vec<Statement>,
    affected: Vec<Term>,
}

impl Transaction {
    /// Create a new running transaction with a random identifier in the
    /// transactions namespace
    pub fn new() -> Self {
        Self {
            id: LocalId::random(local::TRANSACTIONS).iri(),
            at: Utc::now(),
            status: TransactionStatus::Running,
            failure_reason: None,
            inserted: Vec::new(),
            removed: Vec::new(),
            affected: Vec::new(),
        }
    }

    /// The transaction identifier
    pub fn id(&self) -> &Iri {
        &self.id
    }

    /// Creation timestamp
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// Current status
    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Reason attached to a failed commit
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// True once the store has committed (or failed) this transaction
    pub fn is_sealed(&self) -> bool {
        self.status != TransactionStatus::Running
    }

    /// True if the transaction committed successfully
    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Statements queued for insertion
    pub fn inserted(&self) -> &[Statement] {
        &self.inserted
    }

    /// Statements queued for removal
    pub fn removed(&self) -> &[Statement] {
        &self.removed
    }

    /// Resources this transaction touches
    pub fn affected(&self) -> &[Term] {
        &self.affected
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_sealed() {
            return Err(Error::TransactionSealed(self.id.as_str().to_string()));
        }
        Ok(())
    }

    /// Queue a statement for insertion
    pub fn insert(&mut self, statement: Statement) -> Result<()> {
        self.ensure_open()?;
        self.inserted.push(statement);
        Ok(())
    }

    /// Queue statements for insertion
    pub fn insert_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> Result<()> {
        self.ensure_open()?;
        self.inserted.extend(statements);
        Ok(())
    }

    /// Queue a statement for removal
    pub fn remove(&mut self, statement: Statement) -> Result<()> {
        self.ensure_open()?;
        self.removed.push(statement);
        Ok(())
    }

    /// Queue statements for removal
    pub fn remove_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> Result<()> {
        self.ensure_open()?;
        self.removed.extend(statements);
        Ok(())
    }

    /// Record a resource as touched by this transaction
    pub fn mark_affected(&mut self, resource: Term) {
        if !self.affected.contains(&resource) {
            self.affected.push(resource);
        }
    }

    /// Seal the transaction as committed successfully.
    ///
    /// Only the store's commit path should call this.
    pub fn seal_success(&mut self) {
        self.status = TransactionStatus::Success;
    }

    /// Seal the transaction as failed, with a reason.
    pub fn seal_failure(&mut self, reason: impl Into<String>) {
        self.status = TransactionStatus::Failure;
        self.failure_reason = Some(reason.into());
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement() -> Statement {
        Statement::new(
            Term::iri("urn:sigil:e:ab12cd34ef56"),
            Iri::new("http://www.w3.org/2000/01/rdf-schema#label"),
            Term::literal("Term 1"),
        )
    }

    #[test]
    fn new_transaction_is_running() {
        let trx = Transaction::new();
        assert_eq!(trx.status(), TransactionStatus::Running);
        assert!(!trx.is_sealed());
        assert!(trx.id().as_str().starts_with(local::TRANSACTIONS));
    }

    #[test]
    fn sealed_transaction_rejects_mutation() {
        let mut trx = Transaction::new();
        trx.insert(statement()).unwrap();
        trx.seal_success();

        assert!(trx.is_success());
        assert!(matches!(
            trx.insert(statement()),
            Err(Error::TransactionSealed(_))
        ));
        assert!(matches!(
            trx.remove(statement()),
            Err(Error::TransactionSealed(_))
        ));
        assert_eq!(trx.inserted().len(), 1);
    }

    #[test]
    fn failure_carries_reason() {
        let mut trx = Transaction::new();
        trx.seal_failure("store unreachable");
        assert_eq!(trx.status(), TransactionStatus::Failure);
        assert_eq!(trx.failure_reason(), Some("store unreachable"));
    }

    #[test]
    fn serializes_for_the_transaction_log() {
        let mut trx = Transaction::new();
        trx.insert(statement()).unwrap();
        trx.seal_success();

        let json = serde_json::to_string(&trx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status(), TransactionStatus::Success);
        assert_eq!(back.inserted(), trx.inserted());
    }
}
