//! Outbound ports (driven side - SPI).
//!
//! The external systems behind these traits (the key/value config store,
//! the member directory, the document store holding shares, and the mail
//! service) are collaborators, not parts of this engine. Each trait is
//! the minimal contract the engine consumes.

use crate::domain::{Period, Share, ShareDraft, ShareState};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use socios_types::{Member, MemberId, Money, ShareId};

/// Port: read club-wide configuration values.
///
/// `set` exists for the administrative surface; the engine itself only
/// ever reads.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a configuration value; `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a configuration value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Port: resolve the billable roster.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// All members currently in the active state.
    async fn list_active_members(&self) -> Result<Vec<Member>>;

    /// Point lookup; `None` when the member does not exist.
    async fn get_by_id(&self, id: MemberId) -> Result<Option<Member>>;
}

/// A keyed amount/state change for one share, applied by `bulk_update`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareAmountUpdate {
    /// Share to update.
    pub id: ShareId,
    /// New amount.
    pub amount: Money,
    /// New lifecycle state.
    pub state: ShareState,
}

/// Port: persistence over share records.
///
/// Both bulk calls are single atomic operations. The engine's jobs rely
/// on that as their unit of atomicity, and on the repository's unique
/// `(member, period)` constraint as the idempotency safety net.
#[async_trait]
pub trait ShareRepository: Send + Sync {
    /// Shares covering `period` for any of the given members.
    async fn find_by_period(&self, period: Period, member_ids: &[MemberId]) -> Result<Vec<Share>>;

    /// Shares in any of the given states. Paid shares are excluded by the
    /// query when the caller does not ask for them, not post-filtered.
    async fn find_by_states(&self, states: &[ShareState]) -> Result<Vec<Share>>;

    /// Atomically inserts the drafts, assigning ids. A draft whose
    /// `(member, period)` key is already covered is skipped, mirroring
    /// insert-if-absent document-store semantics. Returns the shares that
    /// were actually created.
    async fn bulk_insert(&self, drafts: Vec<ShareDraft>) -> Result<Vec<Share>>;

    /// Atomically applies the keyed updates. Returns the number of shares
    /// changed; updates targeting paid or unknown shares are ignored.
    async fn bulk_update(&self, updates: Vec<ShareAmountUpdate>) -> Result<usize>;
}

/// Port: member-facing notification about a newly generated share.
///
/// Called once per member; each call is independently fallible so one
/// bounced address cannot poison the batch.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce a freshly created share to its member.
    async fn share_created(&self, member: &Member, share: &Share) -> Result<()>;
}

/// Port: wall-clock access.
///
/// Abstracted so every engine path is a deterministic function of an
/// injected "now".
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Default system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
