//! accounts and roles

use serde::{Deserialize, Serialize};

/// account identifier (32 bytes, assigned by the ledger)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// short hex form for logs and step details
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl core::fmt::Display for AccountId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// logical role an account plays in the pool workflow
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountRole {
    /// shared destination aggregating all contributions
    Pool,
    /// contributor by index
    Contributor(usize),
    /// asset-issuing (faucet) account
    Issuer,
}

/// storage/note visibility mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// contents disclosed on the public ledger
    Public,
    /// only existence and consumption are disclosed
    Private,
}

/// a provisioned ledger account
///
/// identity is immutable after creation; owned by the account directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub role: AccountRole,
    pub id: AccountId,
    pub name: String,
}

impl Account {
    pub fn new(role: AccountRole, id: AccountId, name: impl Into<String>) -> Self {
        Self {
            role,
            id,
            name: name.into(),
        }
    }
}
