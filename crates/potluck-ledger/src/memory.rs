//! in-process simulated ledger
//!
//! models the settlement behavior the orchestrator has to cope with:
//! a submitted note becomes consumable only after a configurable number
//! of sync steps, consumption is at-most-once and batched
//! all-or-nothing, and individual note amounts are never exposed
//! through the public surface (only balances and note existence).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::{AccountId, Visibility};
use crate::client::{LedgerClient, LedgerError, LedgerHeight, Result};
use crate::note::{ConfidentialNote, NoteId, NoteSerial, RecipientScript, TxRef};
use crate::value::{Amount, Asset, AssetId};

struct PendingNote {
    note: ConfidentialNote,
    settles_at: u64,
}

#[derive(Default)]
struct State {
    height: u64,
    accounts: HashSet<AccountId>,
    balances: HashMap<(AccountId, AssetId), Amount>,
    pending: HashMap<NoteId, PendingNote>,
    consumed: HashSet<NoteId>,
    serials: HashSet<[u8; 32]>,
    minted: HashMap<AssetId, Amount>,
    supply_caps: HashMap<AssetId, Amount>,
    next_id: u64,
    offline: bool,
    fail_submit_from: HashSet<AccountId>,
    submit_count: u64,
    fail_submit_at: Option<u64>,
}

impl State {
    fn fresh_id(&mut self, domain: &[u8]) -> [u8; 32] {
        self.next_id += 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain);
        hasher.update(&self.next_id.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    fn credit(&mut self, account: AccountId, asset: Asset) {
        let entry = self
            .balances
            .entry((account, asset.asset_id))
            .or_insert(Amount::ZERO);
        *entry = entry.saturating_add(asset.amount);
    }

    fn debit(&mut self, account: AccountId, asset: Asset) -> Result<()> {
        let entry = self
            .balances
            .entry((account, asset.asset_id))
            .or_insert(Amount::ZERO);
        *entry = entry.checked_sub(asset.amount).ok_or_else(|| {
            LedgerError::Rejected(format!("insufficient balance on {}", account.short()))
        })?;
        Ok(())
    }
}

/// simulated ledger for tests and demos
#[derive(Clone)]
pub struct MemoryLedger {
    state: Arc<RwLock<State>>,
    /// sync steps between submission and settlement
    settle_delay: u64,
}

impl MemoryLedger {
    pub fn new(settle_delay: u64) -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            settle_delay,
        }
    }

    /// take the ledger offline; every call fails with `Unavailable`
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    /// reject the next submissions from an account
    pub async fn fail_submits_from(&self, account: AccountId) {
        self.state.write().await.fail_submit_from.insert(account);
    }

    /// reject the nth note submission (1-based) seen by the ledger
    pub async fn fail_nth_submit(&self, n: u64) {
        self.state.write().await.fail_submit_at = Some(n);
    }

    /// count of notes settled but not yet consumed for an account
    pub async fn pending_for(&self, account: AccountId) -> usize {
        let state = self.state.read().await;
        state
            .pending
            .values()
            .filter(|p| p.note.recipient == account)
            .count()
    }

    fn check_online(state: &State) -> Result<()> {
        if state.offline {
            return Err(LedgerError::Unavailable("ledger offline".into()));
        }
        Ok(())
    }

    fn check_account(state: &State, account: AccountId) -> Result<()> {
        if !state.accounts.contains(&account) {
            return Err(LedgerError::UnknownAccount(account));
        }
        Ok(())
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new(2)
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn create_account(&self, _visibility: Visibility) -> Result<AccountId> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        let id = AccountId(state.fresh_id(b"memory.account"));
        state.accounts.insert(id);
        Ok(id)
    }

    async fn create_asset_issuer(
        &self,
        code: &str,
        decimals: u8,
        max_supply: Amount,
    ) -> Result<(AccountId, AssetId)> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        let id = AccountId(state.fresh_id(b"memory.issuer"));
        state.accounts.insert(id);

        let mut metadata = Vec::with_capacity(code.len() + 1 + 32);
        metadata.extend_from_slice(code.as_bytes());
        metadata.push(decimals);
        metadata.extend_from_slice(&id.0);
        let asset_id = AssetId::derive(&metadata);
        state.supply_caps.insert(asset_id, max_supply);
        Ok((id, asset_id))
    }

    async fn mint(&self, issuer: AccountId, recipient: AccountId, asset: Asset) -> Result<TxRef> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        Self::check_account(&state, issuer)?;
        Self::check_account(&state, recipient)?;

        let cap = state
            .supply_caps
            .get(&asset.asset_id)
            .copied()
            .ok_or_else(|| LedgerError::Rejected("unknown denomination".into()))?;
        let minted = state
            .minted
            .get(&asset.asset_id)
            .copied()
            .unwrap_or(Amount::ZERO);
        let total = minted
            .checked_add(asset.amount)
            .filter(|t| *t <= cap)
            .ok_or_else(|| LedgerError::Rejected("max supply exceeded".into()))?;
        state.minted.insert(asset.asset_id, total);

        // mint lands as a public note the recipient consumes later
        let serial = NoteSerial(state.fresh_id(b"memory.mint-serial"));
        let note = ConfidentialNote::new(
            recipient,
            vec![asset],
            Visibility::Public,
            serial,
            RecipientScript::for_account(recipient),
        );
        let note_id = note.id();
        let settles_at = state.height + self.settle_delay;
        state.pending.insert(note_id, PendingNote { note, settles_at });
        tracing::debug!(recipient = %recipient.short(), "mint submitted");
        Ok(TxRef(state.fresh_id(b"memory.tx")))
    }

    async fn submit_note(&self, sender: AccountId, note: ConfidentialNote) -> Result<TxRef> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        Self::check_account(&state, sender)?;
        Self::check_account(&state, note.recipient)?;

        state.submit_count += 1;
        if state.fail_submit_from.remove(&sender)
            || state.fail_submit_at == Some(state.submit_count)
        {
            return Err(LedgerError::Rejected("submission refused".into()));
        }
        if !state.serials.insert(note.serial.0) {
            return Err(LedgerError::Rejected("note serial reuse".into()));
        }

        // sender funds the note at submission time
        for asset in &note.assets {
            state.debit(sender, *asset)?;
        }

        let note_id = note.id();
        if state.consumed.contains(&note_id) || state.pending.contains_key(&note_id) {
            return Err(LedgerError::Rejected("duplicate note".into()));
        }
        let settles_at = state.height + self.settle_delay;
        state.pending.insert(note_id, PendingNote { note, settles_at });
        tracing::debug!(sender = %sender.short(), note = %note_id, "note submitted");
        Ok(TxRef(state.fresh_id(b"memory.tx")))
    }

    async fn sync(&self) -> Result<LedgerHeight> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        state.height += 1;
        Ok(state.height)
    }

    async fn consumable_notes(&self, account: AccountId) -> Result<Vec<NoteId>> {
        let state = self.state.read().await;
        Self::check_online(&state)?;
        Self::check_account(&state, account)?;
        Ok(state
            .pending
            .iter()
            .filter(|(_, p)| p.note.recipient == account && p.settles_at <= state.height)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn consume(&self, account: AccountId, notes: &[NoteId]) -> Result<TxRef> {
        let mut state = self.state.write().await;
        Self::check_online(&state)?;
        Self::check_account(&state, account)?;

        if notes.is_empty() {
            return Err(LedgerError::Rejected("empty note batch".into()));
        }

        // validate the whole batch before touching balances
        let mut seen = HashSet::with_capacity(notes.len());
        for id in notes {
            if !seen.insert(*id) {
                return Err(LedgerError::Rejected(format!(
                    "note {} duplicated in batch",
                    id
                )));
            }
            let pending = state.pending.get(id).ok_or_else(|| {
                LedgerError::Rejected(format!("note {} not pending", id))
            })?;
            if pending.settles_at > state.height {
                return Err(LedgerError::Rejected(format!("note {} not settled", id)));
            }
            if pending.note.script.target() != account {
                return Err(LedgerError::Rejected(format!(
                    "note {} not consumable by {}",
                    id,
                    account.short()
                )));
            }
        }

        for id in notes {
            if let Some(pending) = state.pending.remove(id) {
                for asset in &pending.note.assets {
                    state.credit(account, *asset);
                }
                state.consumed.insert(*id);
            }
        }
        tracing::debug!(account = %account.short(), count = notes.len(), "batch consumed");
        Ok(TxRef(state.fresh_id(b"memory.tx")))
    }

    async fn balance(&self, account: AccountId, asset_id: AssetId) -> Result<Amount> {
        let state = self.state.read().await;
        Self::check_online(&state)?;
        Self::check_account(&state, account)?;
        Ok(state
            .balances
            .get(&(account, asset_id))
            .copied()
            .unwrap_or(Amount::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (MemoryLedger, AccountId, AccountId, AccountId, AssetId) {
        let ledger = MemoryLedger::new(1);
        let (issuer, asset_id) = ledger
            .create_asset_issuer("TRV", 2, Amount::new(1_000_000))
            .await
            .unwrap();
        let alice = ledger.create_account(Visibility::Public).await.unwrap();
        let pool = ledger.create_account(Visibility::Public).await.unwrap();
        (ledger, issuer, alice, pool, asset_id)
    }

    #[tokio::test]
    async fn test_mint_settles_after_delay() {
        let (ledger, issuer, alice, _, asset_id) = setup().await;
        ledger
            .mint(issuer, alice, Asset::new(asset_id, 600u64))
            .await
            .unwrap();

        // not settled yet
        assert!(ledger.consumable_notes(alice).await.unwrap().is_empty());

        ledger.sync().await.unwrap();
        let notes = ledger.consumable_notes(alice).await.unwrap();
        assert_eq!(notes.len(), 1);

        ledger.consume(alice, &notes).await.unwrap();
        assert_eq!(
            ledger.balance(alice, asset_id).await.unwrap(),
            Amount::new(600)
        );
    }

    #[tokio::test]
    async fn test_consume_is_at_most_once() {
        let (ledger, issuer, alice, _, asset_id) = setup().await;
        ledger
            .mint(issuer, alice, Asset::new(asset_id, 600u64))
            .await
            .unwrap();
        ledger.sync().await.unwrap();

        let notes = ledger.consumable_notes(alice).await.unwrap();
        ledger.consume(alice, &notes).await.unwrap();

        // consumed notes disappear from discovery and cannot re-credit
        assert!(ledger.consumable_notes(alice).await.unwrap().is_empty());
        assert!(ledger.consume(alice, &notes).await.is_err());
        assert_eq!(
            ledger.balance(alice, asset_id).await.unwrap(),
            Amount::new(600)
        );
    }

    #[tokio::test]
    async fn test_only_script_target_consumes() {
        let (ledger, issuer, alice, pool, asset_id) = setup().await;
        ledger
            .mint(issuer, alice, Asset::new(asset_id, 600u64))
            .await
            .unwrap();
        ledger.sync().await.unwrap();
        let notes = ledger.consumable_notes(alice).await.unwrap();
        ledger.consume(alice, &notes).await.unwrap();

        let note = ConfidentialNote::new(
            pool,
            vec![Asset::new(asset_id, 300u64)],
            Visibility::Private,
            NoteSerial([3u8; 32]),
            RecipientScript::for_account(pool),
        );
        let id = note.id();
        ledger.submit_note(alice, note).await.unwrap();
        ledger.sync().await.unwrap();

        assert!(ledger.consume(alice, &[id]).await.is_err());
        ledger.consume(pool, &[id]).await.unwrap();
        assert_eq!(
            ledger.balance(pool, asset_id).await.unwrap(),
            Amount::new(300)
        );
        // sender was debited at submission
        assert_eq!(
            ledger.balance(alice, asset_id).await.unwrap(),
            Amount::new(300)
        );
    }

    #[tokio::test]
    async fn test_duplicate_note_in_batch_rejected() {
        let (ledger, issuer, alice, _, asset_id) = setup().await;
        ledger
            .mint(issuer, alice, Asset::new(asset_id, 600u64))
            .await
            .unwrap();
        ledger.sync().await.unwrap();
        let notes = ledger.consumable_notes(alice).await.unwrap();
        let id = notes[0];

        // rejected up front; nothing credited, note still pending
        assert!(matches!(
            ledger.consume(alice, &[id, id]).await,
            Err(LedgerError::Rejected(_))
        ));
        assert_eq!(ledger.balance(alice, asset_id).await.unwrap(), Amount::ZERO);
        assert_eq!(ledger.pending_for(alice).await, 1);

        ledger.consume(alice, &[id]).await.unwrap();
        assert_eq!(
            ledger.balance(alice, asset_id).await.unwrap(),
            Amount::new(600)
        );
    }

    #[tokio::test]
    async fn test_serial_reuse_rejected() {
        let (ledger, issuer, alice, pool, asset_id) = setup().await;
        ledger
            .mint(issuer, alice, Asset::new(asset_id, 600u64))
            .await
            .unwrap();
        ledger.sync().await.unwrap();
        let notes = ledger.consumable_notes(alice).await.unwrap();
        ledger.consume(alice, &notes).await.unwrap();

        let serial = NoteSerial([5u8; 32]);
        let make = |amount: u64| {
            ConfidentialNote::new(
                pool,
                vec![Asset::new(asset_id, amount)],
                Visibility::Private,
                serial,
                RecipientScript::for_account(pool),
            )
        };
        ledger.submit_note(alice, make(100)).await.unwrap();
        assert!(matches!(
            ledger.submit_note(alice, make(200)).await,
            Err(LedgerError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_fails_everything() {
        let (ledger, _, alice, _, asset_id) = setup().await;
        ledger.set_offline(true).await;
        assert!(matches!(
            ledger.sync().await,
            Err(LedgerError::Unavailable(_))
        ));
        assert!(ledger.balance(alice, asset_id).await.is_err());
        assert!(ledger.create_account(Visibility::Public).await.is_err());
    }
}
