//! Runtime configuration loaded from the environment.
//!
//! Every knob has a sane default; overrides come from `SOCIOS_*`
//! environment variables.

use anyhow::{Context, Result};
use chrono::FixedOffset;
use socios_billing::BillingConfig;
use socios_types::Money;
use std::time::Duration;

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Club timezone as whole hours relative to UTC (e.g. `-3`).
    pub tz_offset_hours: i32,
    /// Base share amount seeded into the config store.
    pub base_amount: i64,
    /// Minutes after civil midnight for the daily re-pricing job.
    pub repricing_minute_offset: u32,
    /// Per-invocation job timeout in seconds.
    pub job_timeout_secs: u64,
    /// Seed a small demo roster on startup.
    pub seed_demo: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tz_offset_hours: -3,
            base_amount: socios_billing::DEFAULT_BASE_AMOUNT,
            repricing_minute_offset: 5,
            job_timeout_secs: 5 * 60,
            seed_demo: false,
        }
    }
}

impl RuntimeConfig {
    /// Loads the configuration, applying `SOCIOS_*` overrides on top of
    /// the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            tz_offset_hours: env_or("SOCIOS_TZ_OFFSET_HOURS", defaults.tz_offset_hours)?,
            base_amount: env_or("SOCIOS_BASE_AMOUNT", defaults.base_amount)?,
            repricing_minute_offset: env_or(
                "SOCIOS_REPRICING_MINUTE_OFFSET",
                defaults.repricing_minute_offset,
            )?,
            job_timeout_secs: env_or("SOCIOS_JOB_TIMEOUT_SECS", defaults.job_timeout_secs)?,
            seed_demo: std::env::var("SOCIOS_SEED_DEMO").map(|v| v == "1").unwrap_or(false),
        })
    }

    /// Builds and validates the engine configuration.
    pub fn billing_config(&self) -> Result<BillingConfig> {
        let civil_offset = FixedOffset::east_opt(self.tz_offset_hours * 3600)
            .with_context(|| format!("invalid timezone offset {}h", self.tz_offset_hours))?;
        let config = BillingConfig {
            civil_offset,
            fallback_base_amount: Money::new(self.base_amount),
            repricing_minute_offset: self.repricing_minute_offset,
            job_timeout: Duration::from_secs(self.job_timeout_secs),
            ..BillingConfig::default()
        };
        config.validate().context("billing configuration")?;
        Ok(config)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("parsing {key}={raw:?}")),
        Err(_) => Ok(default),
    }
}
