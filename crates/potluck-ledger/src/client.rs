//! ledger client adapter
//!
//! the capability set the pool orchestrator consumes; implemented by a
//! concrete ledger binding (or [`crate::MemoryLedger`] in tests)

use async_trait::async_trait;
use thiserror::Error;

use crate::account::{AccountId, Visibility};
use crate::note::{ConfidentialNote, NoteId, TxRef};
use crate::value::{Amount, Asset, AssetId};

/// synced chain height
pub type LedgerHeight = u64;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("unknown account: {0}")]
    UnknownAccount(AccountId),

    #[error("transaction rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// privacy-preserving ledger capability set
///
/// every method is a short request/await pair; the orchestrator holds
/// no other shared resource
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// create a wallet account, returning its ledger identity
    async fn create_account(&self, visibility: Visibility) -> Result<AccountId>;

    /// deploy an asset-issuing (faucet) account
    async fn create_asset_issuer(
        &self,
        code: &str,
        decimals: u8,
        max_supply: Amount,
    ) -> Result<(AccountId, AssetId)>;

    /// mint an asset amount from the issuer to a recipient
    async fn mint(&self, issuer: AccountId, recipient: AccountId, asset: Asset) -> Result<TxRef>;

    /// submit a note-carrying transaction from a sender account
    async fn submit_note(&self, sender: AccountId, note: ConfidentialNote) -> Result<TxRef>;

    /// resynchronize ledger state, returning the synced height
    async fn sync(&self) -> Result<LedgerHeight>;

    /// notes addressed to the account that are ready to consume
    async fn consumable_notes(&self, account: AccountId) -> Result<Vec<NoteId>>;

    /// consume notes into the account's balance as one batch
    ///
    /// all-or-nothing: on failure the notes remain pending. on success
    /// the credited balance is visible to [`Self::balance`] before the
    /// call returns; a binding whose consume transaction settles later
    /// must block on that settlement here
    async fn consume(&self, account: AccountId, notes: &[NoteId]) -> Result<TxRef>;

    /// public balance of an account in a denomination
    async fn balance(&self, account: AccountId, asset_id: AssetId) -> Result<Amount>;
}
