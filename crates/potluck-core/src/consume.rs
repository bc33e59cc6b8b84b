//! pool consumer
//!
//! discovers and consumes all confidential notes addressed to the
//! pool, realizing the contributions into its public balance.
//! consumption is one batched transaction over every currently
//! discoverable note: it fully commits or the notes remain pending.

use potluck_ledger::{AccountId, Amount, AssetId, LedgerClient};
use serde::Serialize;

use crate::error::{PoolError, Result};

/// result of a batched consumption
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ConsumeOutcome {
    /// notes consumed in the batch
    pub consumed_count: usize,
    /// pool balance increase realized by the batch; exact because
    /// [`LedgerClient::consume`] credits before returning
    pub newly_visible_total: Amount,
}

/// consume every note currently addressed to the pool
///
/// zero discoverable notes is not an error: it signals
/// [`PoolError::NoPendingContributions`] and the caller decides whether
/// to retry or proceed with no new contributions. notes not yet settled
/// are simply not discovered.
pub async fn consume_pending<L: LedgerClient + ?Sized>(
    client: &L,
    pool: AccountId,
    asset_id: AssetId,
) -> Result<ConsumeOutcome> {
    let notes = client.consumable_notes(pool).await?;
    if notes.is_empty() {
        tracing::debug!("no notes addressed to the pool are ready");
        return Err(PoolError::NoPendingContributions);
    }

    let before = client.balance(pool, asset_id).await?;
    client.consume(pool, &notes).await?;
    let after = client.balance(pool, asset_id).await?;

    let newly_visible_total = after.saturating_sub(before);
    tracing::info!(count = notes.len(), "pool consumed contribution batch");
    Ok(ConsumeOutcome {
        consumed_count: notes.len(),
        newly_visible_total,
    })
}
