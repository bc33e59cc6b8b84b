//! asset and amount types
//!
//! amounts are unsigned integers in minor units; the asset id is an
//! opaque denomination derived from issuer metadata

use serde::{Deserialize, Serialize};

use crate::ASSET_DOMAIN;

/// asset identifier (32 bytes, derived from issuer metadata)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 32]);

impl AssetId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// derive asset id from issuer metadata (code, decimals, issuer account)
    pub fn derive(metadata: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(ASSET_DOMAIN);
        hasher.update(metadata);
        Self(*hasher.finalize().as_bytes())
    }
}

impl core::fmt::Display for AssetId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(&self.0[..8]))
    }
}

/// amount in minor units
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// format with decimals, e.g. 750 with 2 decimals renders "7.50"
    pub fn format(&self, decimals: u8) -> String {
        if decimals == 0 {
            return self.0.to_string();
        }
        let divisor = 10u64.pow(decimals as u32);
        let whole = self.0 / divisor;
        let frac = self.0 % divisor;
        format!("{}.{:0>width$}", whole, frac, width = decimals as usize)
    }
}

impl From<u64> for Amount {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<Amount> for u64 {
    fn from(v: Amount) -> Self {
        v.0
    }
}

/// a typed value (denomination + amount)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,
    pub amount: Amount,
}

impl Asset {
    pub fn new(asset_id: AssetId, amount: impl Into<Amount>) -> Self {
        Self {
            asset_id,
            amount: amount.into(),
        }
    }
}
