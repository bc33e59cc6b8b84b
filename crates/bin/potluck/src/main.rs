//! potluck demo runner
//!
//! drives the confidential contribution pool workflow against the
//! in-process ledger: provision accounts, fund contributors, submit
//! private contributions, consume them into the pool, verify the
//! aggregate. individual amounts never appear in the output.

use clap::Parser;
use potluck_core::{
    run_pool, ContributionProof, ContributorSpec, PoolConfig, ProgressReporter, SettleConfig,
    StepStatus, VerificationSummary,
};
use potluck_ledger::{Amount, MemoryLedger};

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Confidential multi-party contribution pool demo")]
struct Cli {
    /// number of contributors (overrides the three-friends preset)
    #[arg(long)]
    contributors: Option<usize>,

    /// funding per contributor in minor units (with --contributors)
    #[arg(long, default_value_t = 600)]
    funding: u64,

    /// contribution per contributor in minor units (with --contributors)
    #[arg(long, default_value_t = 300)]
    contribution: u64,

    /// fairness threshold per contributor in minor units
    #[arg(long, default_value_t = 100)]
    threshold: u64,

    /// sync steps before a submitted note settles
    #[arg(long, default_value_t = 2)]
    settle_delay: u64,

    /// print the verification summary as JSON
    #[arg(long)]
    json: bool,
}

/// terminal reporter; step details never contain individual amounts
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_step(&self, _step_id: &str, title: &str, status: StepStatus, details: Option<&str>) {
        let marker = match status {
            StepStatus::Pending => " ",
            StepStatus::Loading => "…",
            StepStatus::Completed => "✓",
            StepStatus::Error => "✗",
        };
        match details {
            Some(d) => println!("{marker} {title} ({d})"),
            None => println!("{marker} {title}"),
        }
    }

    fn on_account(&self, name: &str, account_id: &str) {
        println!("  account {name}: {}", short_id(account_id));
    }

    fn on_contribution_proof(&self, proof: &ContributionProof) {
        println!(
            "  {} contributed privately (tx {}, amount hidden)",
            proof.contributor,
            proof.tx_ref.short()
        );
    }

    fn on_fund_state(&self, summary: &VerificationSummary) {
        println!(
            "  total visible {} | contributors {} | all participated {} | fair {} | private {}",
            summary.total_visible.0,
            summary.contributor_count,
            summary.all_participated,
            summary.fair_contributions,
            summary.privacy_preserved
        );
    }

    fn on_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// leading hex of an account id, tolerating short ids
fn short_id(account_id: &str) -> &str {
    account_id.get(..16).unwrap_or(account_id)
}

fn build_config(cli: &Cli) -> PoolConfig {
    let mut config = PoolConfig::demo();
    config.min_contribution = Amount::new(cli.threshold);
    if let Some(n) = cli.contributors {
        config.contributors = (0..n)
            .map(|i| ContributorSpec::new(format!("friend-{}", i + 1), cli.funding, cli.contribution))
            .collect();
        config.max_supply = Amount::new(cli.funding.saturating_mul(n as u64).max(1));
    }
    config.settle = SettleConfig::fast();
    config
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potluck=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli);
    let ledger = MemoryLedger::new(cli.settle_delay);

    let summary = run_pool(&ledger, &ConsoleReporter, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
