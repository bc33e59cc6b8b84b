//! account directory
//!
//! tracks the logical roles of the run (pool, contributors, issuer)
//! and their ledger identities. provisioning is idempotent per
//! role-instance; accounts are immutable once created.

use std::collections::HashMap;

use potluck_ledger::{Account, AccountId, AccountRole, AssetId, Amount, LedgerClient, Visibility};

use crate::error::{PoolError, Result};
use crate::report::ProgressReporter;

pub struct AccountDirectory {
    accounts: HashMap<AccountRole, Account>,
    asset_id: Option<AssetId>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
            asset_id: None,
        }
    }

    /// provision an account for a role, creating it on first request
    pub async fn provision<L: LedgerClient + ?Sized>(
        &mut self,
        client: &L,
        reporter: &dyn ProgressReporter,
        role: AccountRole,
        name: &str,
    ) -> Result<Account> {
        if let Some(existing) = self.accounts.get(&role) {
            return Ok(existing.clone());
        }

        let id = client
            .create_account(Visibility::Public)
            .await
            .map_err(|e| PoolError::LedgerUnavailable(e.to_string()))?;
        let account = Account::new(role, id, name);
        reporter.on_account(name, &id.to_string());
        tracing::debug!(role = ?role, account = %id.short(), "provisioned");
        self.accounts.insert(role, account.clone());
        Ok(account)
    }

    /// provision the asset-issuing account and record the denomination
    pub async fn provision_issuer<L: LedgerClient + ?Sized>(
        &mut self,
        client: &L,
        reporter: &dyn ProgressReporter,
        name: &str,
        code: &str,
        decimals: u8,
        max_supply: Amount,
    ) -> Result<(Account, AssetId)> {
        if let (Some(existing), Some(asset_id)) =
            (self.accounts.get(&AccountRole::Issuer), self.asset_id)
        {
            return Ok((existing.clone(), asset_id));
        }

        let (id, asset_id) = client
            .create_asset_issuer(code, decimals, max_supply)
            .await
            .map_err(|e| PoolError::LedgerUnavailable(e.to_string()))?;
        let account = Account::new(AccountRole::Issuer, id, name);
        reporter.on_account(name, &id.to_string());
        tracing::debug!(account = %id.short(), code, "issuer deployed");
        self.accounts.insert(AccountRole::Issuer, account.clone());
        self.asset_id = Some(asset_id);
        Ok((account, asset_id))
    }

    pub fn get(&self, role: AccountRole) -> Option<&Account> {
        self.accounts.get(&role)
    }

    pub fn pool(&self) -> Option<&Account> {
        self.get(AccountRole::Pool)
    }

    pub fn contributor(&self, index: usize) -> Option<&Account> {
        self.get(AccountRole::Contributor(index))
    }

    pub fn asset_id(&self) -> Option<AssetId> {
        self.asset_id
    }

    /// id of the pool account, if provisioned
    pub fn pool_id(&self) -> Option<AccountId> {
        self.pool().map(|a| a.id)
    }
}

impl Default for AccountDirectory {
    fn default() -> Self {
        Self::new()
    }
}
