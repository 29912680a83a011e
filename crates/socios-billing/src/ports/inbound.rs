//! Inbound ports (driving side - API).

use crate::domain::Period;
use crate::error::Result;
use async_trait::async_trait;

/// Port: the billing operations the scheduler and the administrative
/// surface invoke.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Monthly generation: creates one pending share per active member for
    /// the current civil period. Idempotent: re-running for the same
    /// period only fills gaps, never duplicates.
    async fn generate_monthly_shares(&self) -> Result<GenerationReport>;

    /// Daily re-pricing: re-evaluates amount and state for every
    /// outstanding share using today's civil day of month.
    async fn reprice_outstanding(&self) -> Result<RepricingReport>;

    /// Manual "refresh pending now" variant: re-prices only the current
    /// month's shares, and only while the civil day of month is at most
    /// 10. Outside that window it fails with a validation error and
    /// performs no reads or writes.
    async fn refresh_current_month(&self) -> Result<RepricingReport>;
}

/// Outcome summary of one monthly generation run.
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// Billing period the run covered.
    pub period: Period,
    /// Active members fetched from the directory.
    pub active_members: usize,
    /// Shares created by this run.
    pub created: usize,
    /// Members that already had a share for the period.
    pub already_covered: usize,
    /// Members successfully notified about their new share.
    pub notified: usize,
    /// Per-member notification failures (logged, never fatal).
    pub notification_failures: usize,
    /// Created shares whose member has no contact address.
    pub skipped_no_address: usize,
}

impl GenerationReport {
    /// Aggregate notification outcome, e.g. `"2 of 3 notified"`.
    pub fn notification_summary(&self) -> String {
        format!("{} of {} notified", self.notified, self.created)
    }
}

/// Outcome summary of one re-pricing run (scheduled or manual).
#[derive(Clone, Debug)]
pub struct RepricingReport {
    /// Civil day of month the pricing policy was evaluated at.
    pub day_of_month: u32,
    /// Outstanding shares fetched for examination.
    pub examined: usize,
    /// Shares whose amount or state actually changed.
    pub repriced: usize,
    /// Shares skipped because their member could not be resolved.
    pub skipped_unresolved: usize,
}
