//! Application layer containing the business operations.
//!
//! `LoyaltyProgram` and `BillingLedger` own their store ports and apply the
//! domain rules; `LedgerEngine` routes journal commands to them. Every update
//! is a read-modify-compare-and-set cycle, re-run from a fresh read when a
//! concurrent writer got there first.

pub mod billing;
pub mod engine;
pub mod loyalty;

use crate::domain::ports::{Document, DocumentStore};
use crate::error::{LedgerError, Result};
use tracing::debug;

pub const DEFAULT_MAX_WRITE_ATTEMPTS: u32 = 5;

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Loads `id`, applies `mutate`, and writes it back if nobody else wrote in
/// between. Derived fields are therefore always recomputed from the version
/// that is actually replaced.
pub(crate) async fn update_with_retry<D, T, F>(
    store: &dyn DocumentStore<D>,
    id: &str,
    max_attempts: u32,
    mut mutate: F,
) -> Result<(D, T)>
where
    D: Document,
    F: FnMut(&mut D) -> Result<T>,
{
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let mut doc = store
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(D::ENTITY, id))?;
        let expected = doc.version();
        let output = mutate(&mut doc)?;

        match store.replace(doc, expected).await {
            Ok(stored) => return Ok((stored, output)),
            Err(LedgerError::VersionConflict { found, .. }) => {
                debug!(
                    entity = D::ENTITY,
                    id,
                    attempt,
                    expected,
                    found,
                    "concurrent write detected, retrying"
                );
            }
            Err(e) => return Err(e),
        }
    }

    Err(LedgerError::Contended {
        entity: D::ENTITY,
        id: id.to_string(),
        attempts: max_attempts,
    })
}
