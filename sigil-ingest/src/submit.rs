//! Fragment submission
//!
//! Runs the pre-processing pipeline over an incoming fragment and hands the
//! result to the storage layer under a fresh transaction. Validation errors
//! surface before any write; a failed pipeline leaves the store untouched.

use crate::error::{IngestError, Result};
use crate::pipeline::Pipeline;
use sigil_core::{AuthContext, EntityStore, Error, Fragment, Transaction};
use tracing::debug;

/// Pre-process and persist one incoming fragment.
///
/// Returns the committed transaction. Nothing is written if any
/// pre-processing stage rejects the fragment.
pub async fn submit_fragment<S: EntityStore>(
    store: &S,
    pipeline: &Pipeline,
    mut fragment: Fragment,
    ctx: &AuthContext,
) -> Result<Transaction> {
    pipeline.process(&mut fragment)?;

    let mut trx = Transaction::new();
    for subject in fragment.subjects() {
        trx.mark_affected(subject);
    }
    let count = fragment.len();
    store
        .insert(fragment.into_statements(), &mut trx)
        .await
        .map_err(IngestError::Core)?;

    let mut committed = store.commit(vec![trx], ctx).await?;
    let trx = committed
        .pop()
        .ok_or_else(|| Error::consistency("commit returned no transaction"))?;
    debug!(transaction = %trx.id(), statements = count, "fragment persisted");
    Ok(trx)
}
