//! # Core Domain Entities
//!
//! Identifier newtypes and the member record consumed across the
//! back-office crates.
//!
//! ## Clusters
//!
//! - **Identity**: `MemberId`, `ShareId`, `UserId`
//! - **People**: `Member`
//! - **Payments**: `PaymentMethod`

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a club member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub Uuid);

impl MemberId {
    /// Generates a fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        MemberId(Uuid::new_v4())
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a monthly share record.
///
/// Repository-assigned: drafts carry no id until persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareId(pub Uuid);

impl ShareId {
    /// Generates a fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        ShareId(Uuid::new_v4())
    }
}

impl std::fmt::Display for ShareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a back-office user (the acting administrator on
/// manually recorded updates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generates a fresh random id.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        UserId(Uuid::new_v4())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// How a share was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the club office.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Card payment.
    Card,
}

/// A club member as seen by the billing engine.
///
/// The member directory owns the full roster record; billing only needs
/// the fields that drive share generation and notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Member identifier.
    pub id: MemberId,
    /// Display name, used in notification summaries.
    pub full_name: String,
    /// Whether the member is currently active (billable).
    pub active: bool,
    /// Sibling-discount flag: active siblings share a reduced base fee.
    pub has_sibling_discount: bool,
    /// Contact address for share notifications, when the member has one.
    pub email: Option<String>,
}

impl Member {
    /// Returns true if the member should receive a share for new periods.
    pub fn is_billable(&self) -> bool {
        self.active
    }
}
