//! Shared test fixtures: a settable clock, a recording notifier, and
//! roster helpers.
//!
//! Public (not `#[cfg(test)]`) so the unified test crate can drive the
//! engine with the same fakes the unit tests use.

use crate::domain::Share;
use crate::error::{BillingError, Result};
use crate::ports::{Clock, Notifier};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use socios_types::{Member, MemberId, ShareId};
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Shorthand for a UTC instant in tests.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// An active member with a derived example email address.
pub fn member_named(name: &str, has_sibling_discount: bool) -> Member {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    Member {
        id: MemberId::new(),
        full_name: name.to_string(),
        active: true,
        has_sibling_discount,
        email: Some(email),
    }
}

/// Settable clock for deterministic time.
pub struct ManualClock {
    epoch_secs: AtomicI64,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            epoch_secs: AtomicI64::new(initial.timestamp()),
        }
    }

    /// Moves the clock to a new instant.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.epoch_secs.store(instant.timestamp(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        let secs = self.epoch_secs.load(Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).unwrap()
    }
}

/// Notifier that records every delivery and can be told to fail for
/// specific addresses.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(MemberId, ShareId)>>,
    fail_emails: HashSet<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery to `email` fail.
    pub fn with_failure_for(mut self, email: &str) -> Self {
        self.fail_emails.insert(email.to_string());
        self
    }

    /// Number of successful deliveries so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Member ids that were successfully notified.
    pub fn notified_members(&self) -> Vec<MemberId> {
        self.sent.lock().unwrap().iter().map(|(m, _)| *m).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn share_created(&self, member: &Member, share: &Share) -> Result<()> {
        if let Some(email) = &member.email {
            if self.fail_emails.contains(email) {
                return Err(BillingError::Notify(format!("mailbox {email} unavailable")));
            }
        }
        self.sent.lock().unwrap().push((member.id, share.id));
        Ok(())
    }
}
