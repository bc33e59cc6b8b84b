//! potluck core
//!
//! orchestrates a confidential multi-party contribution pool on a
//! privacy-preserving ledger: contributors fund a shared pool with
//! amount-hidden notes while the pool's aggregate balance and
//! participation stay publicly verifiable.
//!
//! # workflow
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ provision accounts (pool, contributors, issuer)          │
//! │   → fund contributors (mint, settle, consume)            │
//! │   → issue private contributions (one note per friend)    │
//! │   → settle → pool consumes all notes in one batch        │
//! │   → verify aggregate (participation, fairness, privacy)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! the ledger is an injected [`potluck_ledger::LedgerClient`]; progress
//! goes to an injected [`ProgressReporter`]. any phase failure aborts
//! the remaining phases.

pub mod config;
pub mod consume;
pub mod contribution;
pub mod directory;
pub mod error;
pub mod funding;
pub mod report;
pub mod settle;
pub mod verify;
pub mod workflow;

pub use config::{ContributorSpec, PoolConfig};
pub use consume::ConsumeOutcome;
pub use contribution::ContributionProof;
pub use directory::AccountDirectory;
pub use error::{PoolError, Result};
pub use report::{NullReporter, ProgressReporter, StepStatus, TracingReporter};
pub use settle::SettleConfig;
pub use verify::VerificationSummary;
pub use workflow::run_pool;
