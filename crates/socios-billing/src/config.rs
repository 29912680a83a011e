//! Configuration types for the billing engine.

use crate::error::{BillingError, Result};
use chrono::FixedOffset;
use socios_types::Money;
use std::time::Duration;

/// Runtime configuration for the billing engine and its scheduler.
#[derive(Clone, Debug)]
pub struct BillingConfig {
    /// The club's civil timezone as a fixed UTC offset. Every day-of-month
    /// and period boundary is computed in this offset, not in UTC.
    pub civil_offset: FixedOffset,

    /// Base amount used when the config store has no parseable value.
    pub fallback_base_amount: Money,

    /// Minutes after civil midnight of the 1st at which monthly
    /// generation fires.
    pub generation_minute_offset: u32,

    /// Minutes after civil midnight at which daily re-pricing fires.
    pub repricing_minute_offset: u32,

    /// Upper bound on a single job invocation. An invocation that exceeds
    /// it is abandoned until its next natural tick; the bulk write remains
    /// the unit of atomicity.
    pub job_timeout: Duration,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            // UTC-3, the club's home timezone (no DST).
            civil_offset: FixedOffset::west_opt(3 * 3600).unwrap(),
            fallback_base_amount: Money::new(crate::DEFAULT_BASE_AMOUNT),
            generation_minute_offset: 0,
            repricing_minute_offset: 5,
            job_timeout: Duration::from_secs(5 * 60),
        }
    }
}

impl BillingConfig {
    /// Validate configuration before wiring it into the engine.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the fallback base amount is zero or negative
    /// - a schedule offset does not fall within a single day
    /// - the job timeout is zero
    pub fn validate(&self) -> Result<()> {
        if self.fallback_base_amount <= Money::ZERO {
            return Err(BillingError::InvalidConfig(format!(
                "fallback base amount must be positive, got {}",
                self.fallback_base_amount
            )));
        }
        if self.generation_minute_offset >= 24 * 60 || self.repricing_minute_offset >= 24 * 60 {
            return Err(BillingError::InvalidConfig(
                "schedule minute offsets must fall within one day".to_string(),
            ));
        }
        if self.job_timeout.is_zero() {
            return Err(BillingError::InvalidConfig(
                "job timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
