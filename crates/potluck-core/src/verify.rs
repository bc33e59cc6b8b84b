//! verification engine
//!
//! pure function over the pool's public balance and the contribution
//! evidence. individual amounts are never inspected; every property is
//! computed from the aggregate.
//!
//! # aggregate-only fairness
//!
//! fairness holds when `total >= threshold * expected`: the sum is
//! consistent with every contributor having met the threshold. the
//! engine cannot confirm any single contributor individually did, and
//! cannot detect a zero contributor offset by an over-contributor.
//! this is a property of the privacy design, not a defect; do not
//! strengthen it by inspecting per-note amounts.

use potluck_ledger::{Amount, Visibility};
use serde::Serialize;

use crate::contribution::ContributionProof;
use crate::error::{PoolError, Result};

/// privacy-preserving verification result
///
/// derived once per run; only the aggregate total is ever exposed
#[derive(Clone, Copy, Debug, Serialize)]
pub struct VerificationSummary {
    /// pool's public balance after consumption
    pub total_visible: Amount,
    /// contribution records with verified=true
    pub contributor_count: usize,
    /// every expected contributor has a verified record
    pub all_participated: bool,
    /// total is consistent with all contributors meeting the threshold
    pub fair_contributions: bool,
    /// every recorded note was private; asserted, not inferred
    pub privacy_preserved: bool,
}

/// compute the verification summary
pub fn verify(
    pool_balance: Amount,
    records: &[ContributionProof],
    expected_contributors: usize,
    min_threshold: Amount,
) -> Result<VerificationSummary> {
    let contributor_count = records.iter().filter(|r| r.verified).count();
    let all_participated = contributor_count == expected_contributors;

    let required = min_threshold
        .checked_mul(expected_contributors as u64)
        .ok_or_else(|| {
            PoolError::VerificationInconsistent("threshold * contributors overflows".into())
        })?;
    let fair_contributions = pool_balance >= required;

    let privacy_preserved = records
        .iter()
        .all(|r| r.note_visibility == Visibility::Private);

    Ok(VerificationSummary {
        total_visible: pool_balance,
        contributor_count,
        all_participated,
        fair_contributions,
        privacy_preserved,
    })
}
