//! Civil-time job scheduler.
//!
//! Fires the two engine operations on fixed schedules evaluated in the
//! club's civil timezone:
//!
//! - monthly generation at the start of the 1st day of every month;
//! - daily re-pricing shortly after civil midnight.
//!
//! Each job runs in its own spawned task; a loop iteration sleeps until
//! the next tick and then awaits the invocation to completion, so
//! invocations of the same job never overlap. A failed or timed-out
//! invocation is logged and the job simply waits for its next natural
//! tick. The repository's idempotency, not scheduler mutual exclusion,
//! is the cross-invocation safety net.

use crate::config::BillingConfig;
use crate::ports::{BillingApi, Clock};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Drives the billing engine on its two civil-time schedules.
pub struct BillingScheduler {
    engine: Arc<dyn BillingApi>,
    clock: Arc<dyn Clock>,
    config: BillingConfig,
}

/// Join handles for the two running job tasks.
pub struct SchedulerHandle {
    generation: JoinHandle<()>,
    repricing: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Waits for both job tasks to exit (after a shutdown signal).
    pub async fn join(self) {
        let _ = self.generation.await;
        let _ = self.repricing.await;
    }
}

impl BillingScheduler {
    /// Create a scheduler over an engine and a clock.
    pub fn new(engine: Arc<dyn BillingApi>, clock: Arc<dyn Clock>, config: BillingConfig) -> Self {
        Self {
            engine,
            clock,
            config,
        }
    }

    /// Spawns both job tasks. They exit when `shutdown` flips to true.
    pub fn start(self, shutdown: watch::Receiver<bool>) -> SchedulerHandle {
        info!(
            "[scheduler] Starting jobs (offset {}, generation +{}m, re-pricing +{}m)",
            self.config.civil_offset,
            self.config.generation_minute_offset,
            self.config.repricing_minute_offset
        );

        let generation = tokio::spawn(Self::generation_loop(
            Arc::clone(&self.engine),
            Arc::clone(&self.clock),
            self.config.clone(),
            shutdown.clone(),
        ));
        let repricing = tokio::spawn(Self::repricing_loop(
            self.engine,
            self.clock,
            self.config,
            shutdown,
        ));
        SchedulerHandle {
            generation,
            repricing,
        }
    }

    async fn generation_loop(
        engine: Arc<dyn BillingApi>,
        clock: Arc<dyn Clock>,
        config: BillingConfig,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let now = clock.now_utc();
            let next = next_monthly_run(now, config.civil_offset, config.generation_minute_offset);
            let wait = duration_until(now, next);
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[scheduler] Generation job stopping");
                        break;
                    }
                }
                _ = tokio::time::sleep(wait) => {
                    match tokio::time::timeout(config.job_timeout, engine.generate_monthly_shares()).await {
                        Ok(Ok(report)) => info!(
                            "[scheduler] Monthly generation tick: period={} created={} ({})",
                            report.period, report.created, report.notification_summary()
                        ),
                        Ok(Err(e)) => error!("[scheduler] Monthly generation failed: {e}"),
                        Err(_) => error!(
                            "[scheduler] Monthly generation exceeded {:?}, abandoned until next tick",
                            config.job_timeout
                        ),
                    }
                }
            }
        }
    }

    async fn repricing_loop(
        engine: Arc<dyn BillingApi>,
        clock: Arc<dyn Clock>,
        config: BillingConfig,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            let now = clock.now_utc();
            let next = next_daily_run(now, config.civil_offset, config.repricing_minute_offset);
            let wait = duration_until(now, next);
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("[scheduler] Re-pricing job stopping");
                        break;
                    }
                }
                _ = tokio::time::sleep(wait) => {
                    match tokio::time::timeout(config.job_timeout, engine.reprice_outstanding()).await {
                        Ok(Ok(report)) => info!(
                            "[scheduler] Daily re-pricing tick: day={} repriced={}",
                            report.day_of_month, report.repriced
                        ),
                        Ok(Err(e)) => error!("[scheduler] Daily re-pricing failed: {e}"),
                        Err(_) => error!(
                            "[scheduler] Daily re-pricing exceeded {:?}, abandoned until next tick",
                            config.job_timeout
                        ),
                    }
                }
            }
        }
    }
}

/// The next civil-midnight-plus-offset instant strictly after `now`.
///
/// `minute_offset` must fall within one civil day (validated by
/// [`crate::BillingConfig::validate`]).
pub fn next_daily_run(now: DateTime<Utc>, offset: FixedOffset, minute_offset: u32) -> DateTime<Utc> {
    let local_now = now.with_timezone(&offset);
    let today = local_now.date_naive();
    let candidate = civil_instant(today, minute_offset, offset);
    if candidate > now {
        candidate
    } else {
        civil_instant(today.succ_opt().unwrap(), minute_offset, offset)
    }
}

/// The next first-of-month-plus-offset instant strictly after `now`.
pub fn next_monthly_run(
    now: DateTime<Utc>,
    offset: FixedOffset,
    minute_offset: u32,
) -> DateTime<Utc> {
    let local_now = now.with_timezone(&offset);
    let first = local_now.date_naive().with_day(1).unwrap();
    let candidate = civil_instant(first, minute_offset, offset);
    if candidate > now {
        candidate
    } else {
        civil_instant(first_of_next_month(first), minute_offset, offset)
    }
}

fn first_of_next_month(first: NaiveDate) -> NaiveDate {
    if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1).unwrap()
    }
}

fn civil_instant(date: NaiveDate, minute_offset: u32, offset: FixedOffset) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(minute_offset / 60, minute_offset % 60, 0).unwrap();
    offset
        .from_local_datetime(&date.and_time(time))
        .unwrap()
        .with_timezone(&Utc)
}

fn duration_until(now: DateTime<Utc>, next: DateTime<Utc>) -> Duration {
    (next - now).to_std().unwrap_or(Duration::ZERO)
}
