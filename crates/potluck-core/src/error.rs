//! error types for the pool workflow

use potluck_ledger::LedgerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    /// preconditions for running the workflow not met; raised before
    /// any ledger interaction
    #[error("environment unsupported: {0}")]
    EnvironmentUnsupported(String),

    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("settlement timeout waiting for {waiting_for}")]
    SettlementTimeout { waiting_for: String },

    #[error("contribution from {contributor} failed: {reason}")]
    ContributionFailed { contributor: String, reason: String },

    /// informational: no notes addressed to the pool are ready yet.
    /// the only kind a caller may treat as retryable without aborting.
    #[error("no pending contributions")]
    NoPendingContributions,

    #[error("verification inconsistent: {0}")]
    VerificationInconsistent(String),
}

impl PoolError {
    /// fatal kinds abort the remaining workflow phases
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PoolError::NoPendingContributions)
    }
}

impl From<LedgerError> for PoolError {
    fn from(e: LedgerError) -> Self {
        PoolError::LedgerUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;
