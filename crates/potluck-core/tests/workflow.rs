//! end-to-end workflow scenarios against the in-process ledger

use std::collections::HashMap;
use std::sync::Mutex;

use potluck_core::{
    run_pool, ContributionProof, NullReporter, PoolConfig, PoolError, ProgressReporter,
    SettleConfig, StepStatus, VerificationSummary,
};
use potluck_ledger::{AccountId, Amount, AssetId, LedgerClient, MemoryLedger};

/// reporter capturing every event for assertions
#[derive(Default)]
struct Capture {
    steps: Mutex<Vec<(String, String, StepStatus, Option<String>)>>,
    accounts: Mutex<HashMap<String, String>>,
    proofs: Mutex<Vec<ContributionProof>>,
    summaries: Mutex<Vec<VerificationSummary>>,
    errors: Mutex<Vec<String>>,
}

impl Capture {
    fn account_id(&self, name: &str) -> AccountId {
        let hex_id = self.accounts.lock().unwrap()[name].clone();
        let bytes: [u8; 32] = hex::decode(hex_id).unwrap().try_into().unwrap();
        AccountId(bytes)
    }
}

impl ProgressReporter for Capture {
    fn on_step(&self, step_id: &str, title: &str, status: StepStatus, details: Option<&str>) {
        self.steps.lock().unwrap().push((
            step_id.into(),
            title.into(),
            status,
            details.map(Into::into),
        ));
    }

    fn on_account(&self, name: &str, account_id: &str) {
        self.accounts
            .lock()
            .unwrap()
            .insert(name.into(), account_id.into());
    }

    fn on_contribution_proof(&self, proof: &ContributionProof) {
        self.proofs.lock().unwrap().push(proof.clone());
    }

    fn on_fund_state(&self, summary: &VerificationSummary) {
        self.summaries.lock().unwrap().push(*summary);
    }

    fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.into());
    }
}

fn fast_demo() -> PoolConfig {
    let mut config = PoolConfig::demo();
    config.settle = SettleConfig::fast();
    config
}

fn pool_asset(capture: &Capture, code: &str) -> (AccountId, AssetId) {
    // re-derive the asset id the run used from the faucet identity
    let issuer = capture.account_id("Token Faucet");
    let mut metadata = Vec::new();
    metadata.extend_from_slice(code.as_bytes());
    metadata.push(2);
    metadata.extend_from_slice(&issuer.0);
    (capture.account_id("Travel Fund"), AssetId::derive(&metadata))
}

#[tokio::test]
async fn scenario_three_friends_fund_and_verify() {
    let ledger = MemoryLedger::new(1);
    let capture = Capture::default();

    let summary = run_pool(&ledger, &capture, &fast_demo()).await.unwrap();

    assert_eq!(summary.total_visible, Amount::new(750));
    assert_eq!(summary.contributor_count, 3);
    assert!(summary.all_participated);
    assert!(summary.fair_contributions);
    assert!(summary.privacy_preserved);

    // the reporter saw the same summary exactly once
    let summaries = capture.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total_visible, Amount::new(750));

    // conservation on the ledger itself
    let (pool, asset_id) = pool_asset(&capture, "TRV");
    assert_eq!(
        ledger.balance(pool, asset_id).await.unwrap(),
        Amount::new(750)
    );

    // one proof per contributor, none mutated
    let proofs = capture.proofs.lock().unwrap();
    let names: Vec<_> = proofs.iter().map(|p| p.contributor.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob", "Charlie"]);
    assert!(proofs.iter().all(|p| p.verified));
}

#[tokio::test]
async fn scenario_failed_submission_aborts_without_summary() {
    let ledger = MemoryLedger::new(1);
    let capture = Capture::default();
    // mints and consumes are separate calls; contribution notes are the
    // only submissions, so Bob's is the second
    ledger.fail_nth_submit(2).await;

    let err = run_pool(&ledger, &capture, &fast_demo()).await.unwrap_err();
    match err {
        PoolError::ContributionFailed { contributor, .. } => assert_eq!(contributor, "Bob"),
        other => panic!("expected ContributionFailed, got {other:?}"),
    }

    // no summary emitted, error reported, run aborted before consumption
    assert!(capture.summaries.lock().unwrap().is_empty());
    assert_eq!(capture.errors.lock().unwrap().len(), 1);

    // the pool realized nothing: Alice's note is still pending, not
    // silently summed as if all three occurred
    let (pool, asset_id) = pool_asset(&capture, "TRV");
    assert_eq!(ledger.balance(pool, asset_id).await.unwrap(), Amount::ZERO);
    ledger.sync().await.unwrap();
    ledger.sync().await.unwrap();
    assert_eq!(ledger.pending_for(pool).await, 1);

    // only Alice's proof was recorded
    let proofs = capture.proofs.lock().unwrap();
    assert_eq!(proofs.len(), 1);
    assert_eq!(proofs[0].contributor, "Alice");
}

#[tokio::test]
async fn scenario_below_threshold_is_unfair_but_full_participation() {
    let ledger = MemoryLedger::new(1);
    let mut config = fast_demo();
    for spec in &mut config.contributors {
        spec.contribution = Amount::new(50); // 0.50 each vs 1.00 threshold
    }

    let summary = run_pool(&ledger, &NullReporter, &config).await.unwrap();
    assert!(summary.all_participated);
    assert!(!summary.fair_contributions);
    assert_eq!(summary.total_visible, Amount::new(150));
}

#[tokio::test]
async fn scenario_slow_settlement_retries_instead_of_failing() {
    // notes take several sync steps to settle; the consumer must keep
    // polling rather than treat the empty pool as fatal
    let ledger = MemoryLedger::new(4);
    let summary = run_pool(&ledger, &NullReporter, &fast_demo()).await.unwrap();
    assert_eq!(summary.total_visible, Amount::new(750));
}

#[tokio::test]
async fn no_event_exposes_an_individual_amount() {
    let ledger = MemoryLedger::new(1);
    let capture = Capture::default();
    run_pool(&ledger, &capture, &fast_demo()).await.unwrap();

    // formatted individual amounts never appear in step details; the
    // aggregate total is the only amount ever rendered
    let steps = capture.steps.lock().unwrap();
    let details: Vec<_> = steps.iter().filter_map(|s| s.3.as_deref()).collect();
    for hidden in ["3.00", "2.00", "2.50", "6.00", "4.00", "5.00"] {
        assert!(details.iter().all(|d| !d.contains(hidden)));
    }
    assert!(details.iter().any(|d| d.contains("7.50")));
}

#[tokio::test]
async fn two_runs_never_reuse_serials() {
    // the memory ledger rejects any serial reuse process-wide, so two
    // identical runs on one ledger passing proves fresh serials
    let ledger = MemoryLedger::new(1);
    let first = run_pool(&ledger, &NullReporter, &fast_demo()).await.unwrap();
    let second = run_pool(&ledger, &NullReporter, &fast_demo()).await.unwrap();
    assert_eq!(first.total_visible, Amount::new(750));
    assert_eq!(second.total_visible, Amount::new(750));
}

#[tokio::test]
async fn settlement_never_arriving_times_out() {
    // notes settle far beyond the wait budget
    let ledger = MemoryLedger::new(1_000_000);
    let err = run_pool(&ledger, &NullReporter, &fast_demo())
        .await
        .unwrap_err();
    assert!(matches!(err, PoolError::SettlementTimeout { .. }));
}

mod conservation {
    use super::*;
    use potluck_core::ContributorSpec;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        /// the pool total always equals the sum of consumed contributions
        #[test]
        fn pool_total_is_sum_of_contributions(
            amounts in proptest::collection::vec(1u64..10_000, 1..5)
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let summary = rt.block_on(async {
                let ledger = MemoryLedger::new(1);
                let mut config = fast_demo();
                config.contributors = amounts
                    .iter()
                    .enumerate()
                    .map(|(i, a)| ContributorSpec::new(format!("friend-{i}"), *a, *a))
                    .collect();
                run_pool(&ledger, &NullReporter, &config).await.unwrap()
            });

            let expected: u64 = amounts.iter().sum();
            prop_assert_eq!(summary.total_visible, Amount::new(expected));
            prop_assert_eq!(summary.contributor_count, amounts.len());
        }
    }
}
