//! workflow entry point
//!
//! drives the full run: provision accounts, fund contributors, issue
//! private contributions, settle, consume into the pool, verify the
//! aggregate. each phase emits step events to the injected reporter;
//! any failure emits an error event and aborts the remaining phases.

use potluck_ledger::{Account, AccountRole, Amount, LedgerClient};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::PoolConfig;
use crate::consume;
use crate::contribution;
use crate::directory::AccountDirectory;
use crate::error::{PoolError, Result};
use crate::funding;
use crate::report::{ProgressReporter, StepStatus};
use crate::settle;
use crate::verify::{self, VerificationSummary};

/// run the confidential contribution pool workflow
///
/// returns the verification summary; the reporter receives the same
/// summary through `on_fund_state`. fatal errors are reported through
/// `on_error` and a step error before being re-raised.
pub async fn run_pool<L: LedgerClient + ?Sized>(
    client: &L,
    reporter: &dyn ProgressReporter,
    config: &PoolConfig,
) -> Result<VerificationSummary> {
    match run_inner(client, reporter, config).await {
        Ok(summary) => Ok(summary),
        Err(e) => {
            reporter.on_error(&e.to_string());
            reporter.on_step(
                "failed",
                "Workflow aborted",
                StepStatus::Error,
                Some(&e.to_string()),
            );
            Err(e)
        }
    }
}

async fn run_inner<L: LedgerClient + ?Sized>(
    client: &L,
    reporter: &dyn ProgressReporter,
    config: &PoolConfig,
) -> Result<VerificationSummary> {
    // preconditions, before any ledger interaction
    config.validate()?;
    let expected = config.expected_contributors();
    let total_contributed = config
        .contributors
        .iter()
        .try_fold(Amount::ZERO, |acc, s| acc.checked_add(s.contribution))
        .ok_or_else(|| {
            PoolError::EnvironmentUnsupported("contribution total overflows".into())
        })?;

    reporter.on_step("ledger", "Connecting to ledger", StepStatus::Loading, None);
    let height = client.sync().await?;
    tracing::info!(height, "ledger reachable");
    reporter.on_step("ledger", "Ledger reachable", StepStatus::Completed, None);

    // provision accounts: pool, contributors, issuer
    reporter.on_step("accounts", "Creating accounts", StepStatus::Loading, None);
    let mut directory = AccountDirectory::new();
    let pool = directory
        .provision(client, reporter, AccountRole::Pool, &config.pool_name)
        .await?;
    let mut contributors = Vec::with_capacity(config.contributors.len());
    for (i, spec) in config.contributors.iter().enumerate() {
        let account = directory
            .provision(client, reporter, AccountRole::Contributor(i), &spec.name)
            .await?;
        contributors.push(account);
    }
    let (issuer, asset_id) = directory
        .provision_issuer(
            client,
            reporter,
            "Token Faucet",
            &config.token_code,
            config.token_decimals,
            config.max_supply,
        )
        .await?;
    reporter.on_step(
        "accounts",
        "Accounts created",
        StepStatus::Completed,
        Some(&format!("pool {}", pool.id.short())),
    );

    // fund contributors with their starting balances
    reporter.on_step(
        "funding",
        "Funding contributor accounts",
        StepStatus::Loading,
        None,
    );
    let funding_plan: Vec<(Account, Amount)> = contributors
        .iter()
        .zip(&config.contributors)
        .map(|(account, spec)| (account.clone(), spec.funding))
        .collect();
    funding::fund_contributors(client, &config.settle, issuer.id, asset_id, &funding_plan)
        .await?;
    reporter.on_step(
        "funding",
        "Contributor accounts funded",
        StepStatus::Completed,
        None,
    );

    // private contributions to the pool
    reporter.on_step(
        "contributions",
        "Making private contributions",
        StepStatus::Loading,
        None,
    );
    let mut rng = StdRng::from_entropy();
    let contribution_plan: Vec<(Account, Amount)> = funding_plan
        .iter()
        .zip(&config.contributors)
        .map(|((account, _), spec)| (account.clone(), spec.contribution))
        .collect();
    let proofs = contribution::issue_contributions(
        client,
        &mut rng,
        reporter,
        pool.id,
        asset_id,
        &contribution_plan,
    )
    .await?;
    reporter.on_step(
        "contributions",
        "Private contributions sent",
        StepStatus::Completed,
        Some("all contributions submitted"),
    );

    // the batch runs only after every intended contribution settled
    reporter.on_step(
        "consuming",
        "Processing private contributions",
        StepStatus::Loading,
        None,
    );
    let pool_id = pool.id;
    let outcome = loop {
        settle::wait_for(
            client,
            &config.settle,
            "contribution notes to settle",
            move || async move { Ok(client.consumable_notes(pool_id).await?.len() >= expected) },
        )
        .await?;
        match consume::consume_pending(client, pool_id, asset_id).await {
            Ok(outcome) => break outcome,
            // raced with settlement visibility; wait again, the waiter
            // bounds each attempt
            Err(PoolError::NoPendingContributions) => continue,
            Err(e) => return Err(e),
        }
    };
    reporter.on_step(
        "consuming",
        "Private contributions processed",
        StepStatus::Completed,
        Some(&format!("{} contributions received", outcome.consumed_count)),
    );

    // conservation: pool balance must reflect the consumed batch
    settle::wait_for(
        client,
        &config.settle,
        "pool balance to reflect consumption",
        move || async move {
            Ok(client.balance(pool_id, asset_id).await? >= total_contributed)
        },
    )
    .await?;

    // privacy-preserving aggregate verification
    reporter.on_step(
        "verification",
        "Verifying contributions",
        StepStatus::Loading,
        None,
    );
    let balance = client.balance(pool_id, asset_id).await?;
    let summary = verify::verify(balance, &proofs, expected, config.min_contribution)?;
    reporter.on_fund_state(&summary);
    reporter.on_step(
        "verification",
        "Verification complete",
        StepStatus::Completed,
        Some(&format!(
            "total {} from {} contributors",
            summary.total_visible.format(config.token_decimals),
            summary.contributor_count
        )),
    );

    reporter.on_step("complete", "Pool complete", StepStatus::Completed, None);
    Ok(summary)
}
