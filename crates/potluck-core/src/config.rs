//! workflow parameters

use potluck_ledger::Amount;
use serde::{Deserialize, Serialize};

use crate::error::{PoolError, Result};
use crate::settle::SettleConfig;

/// one contributor's plan: starting balance and contribution amount
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContributorSpec {
    pub name: String,
    /// amount minted to the contributor up front
    pub funding: Amount,
    /// amount contributed privately to the pool
    pub contribution: Amount,
}

impl ContributorSpec {
    pub fn new(name: impl Into<String>, funding: impl Into<Amount>, contribution: impl Into<Amount>) -> Self {
        Self {
            name: name.into(),
            funding: funding.into(),
            contribution: contribution.into(),
        }
    }
}

/// pool workflow configuration
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub pool_name: String,
    /// token code for the issuing faucet
    pub token_code: String,
    pub token_decimals: u8,
    pub max_supply: Amount,
    pub contributors: Vec<ContributorSpec>,
    /// minimum per-contributor amount assumed by the fairness check
    pub min_contribution: Amount,
    pub settle: SettleConfig,
}

impl PoolConfig {
    /// three friends splitting a travel fund: 6.00/4.00/5.00 funding,
    /// 3.00/2.00/2.50 contributions, 1.00 threshold
    pub fn demo() -> Self {
        Self {
            pool_name: "Travel Fund".into(),
            token_code: "TRV".into(),
            token_decimals: 2,
            max_supply: Amount::new(1_000_000),
            contributors: vec![
                ContributorSpec::new("Alice", 600u64, 300u64),
                ContributorSpec::new("Bob", 400u64, 200u64),
                ContributorSpec::new("Charlie", 500u64, 250u64),
            ],
            min_contribution: Amount::new(100),
            settle: SettleConfig::default(),
        }
    }

    /// check preconditions before any ledger interaction
    pub fn validate(&self) -> Result<()> {
        if self.contributors.is_empty() {
            return Err(PoolError::EnvironmentUnsupported(
                "at least one contributor is required".into(),
            ));
        }
        for spec in &self.contributors {
            if spec.contribution > spec.funding {
                return Err(PoolError::EnvironmentUnsupported(format!(
                    "{} is funded below their contribution",
                    spec.name
                )));
            }
        }
        let total_funding = self
            .contributors
            .iter()
            .try_fold(Amount::ZERO, |acc, s| acc.checked_add(s.funding));
        match total_funding {
            Some(total) if total <= self.max_supply => Ok(()),
            _ => Err(PoolError::EnvironmentUnsupported(
                "total funding exceeds max supply".into(),
            )),
        }
    }

    pub fn expected_contributors(&self) -> usize {
        self.contributors.len()
    }
}
