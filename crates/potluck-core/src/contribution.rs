//! contribution issuer
//!
//! builds one private (amount-hidden) note per contributor, addressed
//! to the pool and guarded by a consume predicate bound to it, and
//! submits it from the contributor's account. evidence is an
//! append-only list of proofs; a proof never carries the contributed
//! amount, which exists only folded into the pool's aggregate balance.

use chrono::{DateTime, Utc};
use potluck_ledger::{
    Account, AccountId, Amount, Asset, AssetId, ConfidentialNote, LedgerClient, NoteSerial,
    RecipientScript, TxRef, Visibility,
};
use serde::Serialize;

use crate::error::{PoolError, Result};
use crate::report::ProgressReporter;

/// evidence of one successful private contribution
///
/// append-only: created once per successful submission, never mutated
#[derive(Clone, Debug, Serialize)]
pub struct ContributionProof {
    pub contributor: String,
    pub account_id: AccountId,
    pub tx_ref: TxRef,
    pub timestamp: DateTime<Utc>,
    pub verified: bool,
    /// visibility of the submitted note; the verification engine
    /// asserts privacy from this rather than inferring it
    pub note_visibility: Visibility,
}

/// submit one private contribution and record the proof
pub async fn issue_contribution<L, R>(
    client: &L,
    rng: &mut R,
    pool: AccountId,
    asset_id: AssetId,
    contributor: &Account,
    amount: Amount,
) -> Result<ContributionProof>
where
    L: LedgerClient + ?Sized,
    R: rand::RngCore,
{
    // fresh independent serial per note; reuse would break
    // unlinkability and risk double-count collisions
    let serial = NoteSerial::random(rng);
    let note = ConfidentialNote::new(
        pool,
        vec![Asset::new(asset_id, amount)],
        Visibility::Private,
        serial,
        RecipientScript::for_account(pool),
    );

    tracing::info!(contributor = %contributor.name, "submitting private contribution");
    let tx_ref = client
        .submit_note(contributor.id, note)
        .await
        .map_err(|e| PoolError::ContributionFailed {
            contributor: contributor.name.clone(),
            reason: e.to_string(),
        })?;

    Ok(ContributionProof {
        contributor: contributor.name.clone(),
        account_id: contributor.id,
        tx_ref,
        timestamp: Utc::now(),
        verified: true,
        note_visibility: Visibility::Private,
    })
}

/// issue every planned contribution in order
///
/// contributions are independent of each other; sequential processing
/// keeps event ordering deterministic. the first failure aborts with no
/// record appended for it.
pub async fn issue_contributions<L, R>(
    client: &L,
    rng: &mut R,
    reporter: &dyn ProgressReporter,
    pool: AccountId,
    asset_id: AssetId,
    plan: &[(Account, Amount)],
) -> Result<Vec<ContributionProof>>
where
    L: LedgerClient + ?Sized,
    R: rand::RngCore,
{
    let mut proofs = Vec::with_capacity(plan.len());
    for (contributor, amount) in plan {
        let proof = issue_contribution(client, rng, pool, asset_id, contributor, *amount).await?;
        reporter.on_contribution_proof(&proof);
        proofs.push(proof);
    }
    Ok(proofs)
}
