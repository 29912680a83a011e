//! Concrete billing engine implementation.
//!
//! `BillingService` orchestrates the two scheduled operations (monthly
//! generation, daily re-pricing) and the manual refresh variant over its
//! injected collaborators. Within one invocation the ordering guarantee
//! is: reads (config, roster, existing shares) happen-before the bulk
//! write, and the bulk write happens-before any notification for the
//! records it created.

use crate::config::BillingConfig;
use crate::domain::{
    civil_date, effective_base, price, Period, Share, ShareDraft, ShareState,
};
use crate::error::{BillingError, Result};
use crate::ports::{
    BillingApi, Clock, ConfigStore, GenerationReport, MemberDirectory, Notifier, RepricingReport,
    ShareAmountUpdate, ShareRepository,
};
use crate::{CONFIG_KEY_BASE_AMOUNT, FIRST_TIER_LAST_DAY};
use async_trait::async_trait;
use chrono::Datelike;
use socios_types::{Member, MemberId, Money};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Share Lifecycle & Billing Engine.
///
/// All collaborators are injected, so the engine is a deterministic
/// function of `(now, config, roster, existing shares)`.
pub struct BillingService {
    config: BillingConfig,
    config_store: Arc<dyn ConfigStore>,
    directory: Arc<dyn MemberDirectory>,
    shares: Arc<dyn ShareRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl BillingService {
    /// Create a new billing engine over the given collaborators.
    pub fn new(
        config: BillingConfig,
        config_store: Arc<dyn ConfigStore>,
        directory: Arc<dyn MemberDirectory>,
        shares: Arc<dyn ShareRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        info!(
            "[billing] Initializing engine (fallback base: {}, offset: {})",
            config.fallback_base_amount, config.civil_offset
        );
        Self {
            config,
            config_store,
            directory,
            shares,
            notifier,
            clock,
        }
    }

    /// The engine configuration.
    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Reads the club-wide base amount, falling back to the configured
    /// default when the key is absent or unusable.
    ///
    /// A missing or garbled value is an operator mistake, not a reason to
    /// stop billing; it is logged and the fallback applies.
    async fn configured_base(&self) -> Result<Money> {
        match self.config_store.get(CONFIG_KEY_BASE_AMOUNT).await? {
            Some(raw) => match raw.parse::<Money>() {
                Ok(amount) if amount > Money::ZERO => Ok(amount),
                _ => {
                    warn!(
                        "[billing] Unusable base amount {:?} in config, using fallback {}",
                        raw, self.config.fallback_base_amount
                    );
                    Ok(self.config.fallback_base_amount)
                }
            },
            None => {
                warn!(
                    "[billing] No base amount configured, using fallback {}",
                    self.config.fallback_base_amount
                );
                Ok(self.config.fallback_base_amount)
            }
        }
    }

    /// Fan-out of share-created notices, one independently caught call
    /// per member. Returns `(notified, failed, skipped_no_address)`.
    async fn notify_created(
        &self,
        created: &[Share],
        members: &HashMap<MemberId, &Member>,
    ) -> (usize, usize, usize) {
        let mut notified = 0;
        let mut failed = 0;
        let mut skipped = 0;

        for share in created {
            let Some(member) = members.get(&share.member_id) else {
                // Drafts are built from the roster, so this cannot happen;
                // treat it like an unreachable address if it ever does.
                skipped += 1;
                continue;
            };
            if member.email.is_none() {
                skipped += 1;
                continue;
            }
            match self.notifier.share_created(member, share).await {
                Ok(()) => notified += 1,
                Err(e) => {
                    warn!(
                        "[billing] Notification failed for {} ({}): {}",
                        member.full_name, share.period, e
                    );
                    failed += 1;
                }
            }
        }
        (notified, failed, skipped)
    }

    /// Shared re-pricing path for the daily job and the manual variant.
    async fn reprice(&self, only_current_period: bool) -> Result<RepricingReport> {
        let base = self.configured_base().await?;
        let today = civil_date(self.clock.now_utc(), self.config.civil_offset);
        let day = today.day();
        let current_period = Period::containing(today);

        let mut outstanding = self
            .shares
            .find_by_states(&[ShareState::Pending, ShareState::Overdue])
            .await?;
        if only_current_period {
            outstanding.retain(|s| s.period == current_period);
        }
        let examined = outstanding.len();

        let mut updates = Vec::new();
        let mut skipped_unresolved = 0;
        for share in &outstanding {
            let member = match self.directory.get_by_id(share.member_id).await? {
                Some(member) => member,
                None => {
                    warn!(
                        "[billing] Share {} references unknown member {}, skipping",
                        share.id, share.member_id
                    );
                    skipped_unresolved += 1;
                    continue;
                }
            };
            let priced = price(effective_base(base, &member), day);
            if priced.amount != share.amount || priced.state != share.state {
                updates.push(ShareAmountUpdate {
                    id: share.id,
                    amount: priced.amount,
                    state: priced.state,
                });
            }
        }

        let repriced = if updates.is_empty() {
            debug!("[billing] Re-pricing: nothing to update (day {})", day);
            0
        } else {
            self.shares.bulk_update(updates).await?
        };

        info!(
            "[billing] Re-pricing done: day={} examined={} repriced={} skipped={}",
            day, examined, repriced, skipped_unresolved
        );
        Ok(RepricingReport {
            day_of_month: day,
            examined,
            repriced,
            skipped_unresolved,
        })
    }
}

#[async_trait]
impl BillingApi for BillingService {
    async fn generate_monthly_shares(&self) -> Result<GenerationReport> {
        let base = self.configured_base().await?;
        let today = civil_date(self.clock.now_utc(), self.config.civil_offset);
        let period = Period::containing(today);
        info!("[billing] Monthly generation for period {}", period);

        let members = self.directory.list_active_members().await?;
        let member_ids: Vec<MemberId> = members.iter().map(|m| m.id).collect();

        let existing = self.shares.find_by_period(period, &member_ids).await?;
        let covered: HashSet<MemberId> = existing.iter().map(|s| s.member_id).collect();

        // Day-1 pricing: the undiscounted, non-escalated tier, with the
        // member's discount rule applied fresh from configuration.
        let drafts: Vec<ShareDraft> = members
            .iter()
            .filter(|m| !covered.contains(&m.id))
            .map(|m| ShareDraft {
                member_id: m.id,
                period,
                amount: price(effective_base(base, m), 1).amount,
            })
            .collect();

        let created = if drafts.is_empty() {
            debug!("[billing] All {} active members already covered", members.len());
            Vec::new()
        } else {
            self.shares.bulk_insert(drafts).await?
        };

        let by_id: HashMap<MemberId, &Member> = members.iter().map(|m| (m.id, m)).collect();
        let (notified, notification_failures, skipped_no_address) =
            self.notify_created(&created, &by_id).await;

        let report = GenerationReport {
            period,
            active_members: members.len(),
            created: created.len(),
            already_covered: covered.len(),
            notified,
            notification_failures,
            skipped_no_address,
        };
        info!(
            "[billing] Generation done: period={} created={} covered={} ({})",
            report.period,
            report.created,
            report.already_covered,
            report.notification_summary()
        );
        Ok(report)
    }

    async fn reprice_outstanding(&self) -> Result<RepricingReport> {
        self.reprice(false).await
    }

    async fn refresh_current_month(&self) -> Result<RepricingReport> {
        // Validation before any read or write: outside the first tier
        // window the manual refresh is rejected outright.
        let day = crate::domain::civil_day_of_month(self.clock.now_utc(), self.config.civil_offset);
        if day > FIRST_TIER_LAST_DAY {
            return Err(BillingError::RefreshWindowClosed { day });
        }
        self.reprice(true).await
    }
}
