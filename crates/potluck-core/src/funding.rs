//! funding orchestrator
//!
//! provisions starting balances: per contributor, mint the
//! caller-specified amount from the issuer, wait for the mint to
//! settle, consume the incoming notes, and confirm the balance is
//! spendable. funding is a prerequisite for the run, not best-effort;
//! settlement exhaustion aborts.

use potluck_ledger::{Account, AccountId, Amount, Asset, AssetId, LedgerClient};

use crate::error::Result;
use crate::settle::{self, SettleConfig};

/// fund one contributor and confirm the amount is spendable
pub async fn fund_contributor<L: LedgerClient + ?Sized>(
    client: &L,
    settle: &SettleConfig,
    issuer: AccountId,
    asset_id: AssetId,
    contributor: &Account,
    amount: Amount,
) -> Result<()> {
    tracing::info!(contributor = %contributor.name, "minting starting balance");
    client
        .mint(issuer, contributor.id, Asset::new(asset_id, amount))
        .await?;

    let recipient = contributor.id;
    let what = format!("mint note for {}", contributor.name);
    settle::wait_for(client, settle, &what, move || async move {
        Ok(!client.consumable_notes(recipient).await?.is_empty())
    })
    .await?;

    let notes = client.consumable_notes(recipient).await?;
    client.consume(recipient, &notes).await?;

    // spendable only once the consume itself has settled
    let what = format!("balance of {} to reflect mint", contributor.name);
    settle::wait_for(client, settle, &what, move || async move {
        Ok(client.balance(recipient, asset_id).await? >= amount)
    })
    .await?;

    tracing::debug!(contributor = %contributor.name, "funded");
    Ok(())
}

/// fund every contributor in order; amounts need not be equal
pub async fn fund_contributors<L: LedgerClient + ?Sized>(
    client: &L,
    settle: &SettleConfig,
    issuer: AccountId,
    asset_id: AssetId,
    plan: &[(Account, Amount)],
) -> Result<()> {
    for (contributor, amount) in plan {
        fund_contributor(client, settle, issuer, asset_id, contributor, *amount).await?;
    }
    Ok(())
}
