//! progress reporting
//!
//! an observer injected once at workflow start; the core emits events
//! and never depends on how they are displayed. every method has a
//! no-op default. event values never contain an individual
//! contribution amount.

use crate::contribution::ContributionProof;
use crate::verify::VerificationSummary;

/// step lifecycle status
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    Pending,
    Loading,
    Completed,
    Error,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Loading => "loading",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        }
    }
}

/// sink for workflow progress events
pub trait ProgressReporter: Send + Sync {
    /// step transition (id, human title, status, optional details)
    fn on_step(&self, step_id: &str, title: &str, status: StepStatus, details: Option<&str>) {
        let _ = (step_id, title, status, details);
    }

    /// an account was provisioned
    fn on_account(&self, name: &str, account_id: &str) {
        let _ = (name, account_id);
    }

    /// a contribution was submitted and recorded
    fn on_contribution_proof(&self, proof: &ContributionProof) {
        let _ = proof;
    }

    /// final verification summary
    fn on_fund_state(&self, summary: &VerificationSummary) {
        let _ = summary;
    }

    /// fatal error, emitted before the workflow re-raises it
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// reporter that drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {}

/// reporter that forwards events to tracing
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn on_step(&self, step_id: &str, title: &str, status: StepStatus, details: Option<&str>) {
        match details {
            Some(d) => tracing::info!(step = step_id, status = status.as_str(), "{title}: {d}"),
            None => tracing::info!(step = step_id, status = status.as_str(), "{title}"),
        }
    }

    fn on_account(&self, name: &str, account_id: &str) {
        tracing::info!(account = account_id, "account ready: {name}");
    }

    fn on_contribution_proof(&self, proof: &ContributionProof) {
        tracing::info!(
            contributor = %proof.contributor,
            tx = %proof.tx_ref.short(),
            "private contribution recorded"
        );
    }

    fn on_fund_state(&self, summary: &VerificationSummary) {
        tracing::info!(
            total = summary.total_visible.0,
            contributors = summary.contributor_count,
            fair = summary.fair_contributions,
            "fund verified"
        );
    }

    fn on_error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
