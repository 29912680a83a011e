//! Log-backed notifier.

use crate::domain::{price, Share};
use crate::error::Result;
use crate::ports::Notifier;
use crate::{FIRST_TIER_LAST_DAY, SECOND_TIER_LAST_DAY};
use async_trait::async_trait;
use socios_types::Member;
use tracing::info;

/// Notifier that renders the share-created message to the log.
///
/// Mail delivery belongs to an external service; this adapter produces
/// the same per-member summary (member, period, amount, tier schedule)
/// as a structured log line instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl LoggingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn share_created(&self, member: &Member, share: &Share) -> Result<()> {
        // The share was just generated, so its amount is the member's
        // day-1 base; the escalated tiers derive from it.
        let second_tier = price(share.amount, FIRST_TIER_LAST_DAY + 1).amount;
        let third_tier = price(share.amount, SECOND_TIER_LAST_DAY + 1).amount;

        info!(
            member = %member.full_name,
            email = member.email.as_deref().unwrap_or("-"),
            period = %share.period,
            amount = %share.amount,
            after_day_10 = %second_tier,
            after_day_20 = %third_tier,
            "[billing] share created notice"
        );
        Ok(())
    }
}
