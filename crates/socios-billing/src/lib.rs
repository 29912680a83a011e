//! # Socios - Share Lifecycle & Billing Engine
//!
//! **Bounded Context:** Member Billing
//!
//! ## Purpose
//!
//! Generates one monthly fee ("share") per active club member, escalates
//! its amount through day-of-month tiers, and walks each share through the
//! `Pending → Overdue → Paid` state machine exactly once per billing
//! period, even when the unattended jobs fire repeatedly or overlap.
//!
//! ## Key Design Principles
//!
//! 1. **Idempotent Generation**: re-running a period's generation creates
//!    shares only for members still missing one; never a duplicate.
//! 2. **Pure Pricing**: the tier function is a side-effect-free map from
//!    `(base amount, day of month)` to `(amount, state)`.
//! 3. **Explicit Collaborators**: config store, member directory, share
//!    repository and notifier are injected ports, swappable in tests.
//! 4. **Civil Time**: every day-of-month and period boundary is computed
//!    in the club's timezone, never in UTC.
//! 5. **Isolated Fan-out**: notification failures are caught per member
//!    and never roll back or retry the share write.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - In-memory config store / directory / repository  │
//! │  - Logging notifier                                 │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: BillingApi                              │
//! │  - Outbound: ConfigStore, MemberDirectory,          │
//! │              ShareRepository, Notifier, Clock       │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Pricing tiers and sibling discount               │
//! │  - Billing periods (first-of-month normalization)   │
//! │  - Share state machine                              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Uniqueness**: exactly one share per `(member, period)` pair
//! 2. **Paid Closure**: `Paid` ⇔ payment method and date both present
//! 3. **Monotonic Escalation**: an unpaid share's amount never decreases
//! 4. **Paid is Terminal**: re-pricing never touches a paid share
//! 5. **Period Normalization**: `period` is always the civil first-of-month
//!
//! ## Module Structure
//!
//! - [`domain`]: pure pricing, period math and the share entity
//! - [`ports`]: hexagonal interfaces (inbound/outbound)
//! - [`adapters`]: in-memory and logging port implementations
//! - [`scheduler`]: civil-time job scheduling
//! - [`service`]: the concrete billing engine

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod scheduler;
pub mod service;
pub mod test_utils;

mod config;
mod error;

pub use config::BillingConfig;
pub use error::{BillingError, Result};

// Re-export commonly used types
pub use domain::{price, sibling_base, Period, PricedShare, Share, ShareDraft, ShareState};
pub use ports::{
    BillingApi, Clock, ConfigStore, GenerationReport, MemberDirectory, Notifier, RepricingReport,
    ShareAmountUpdate, ShareRepository, SystemClock,
};
pub use scheduler::BillingScheduler;
pub use service::BillingService;

/// Config-store key holding the club-wide base share amount.
pub const CONFIG_KEY_BASE_AMOUNT: &str = "share.base_amount";

/// Fallback base amount when the config store has no usable value.
pub const DEFAULT_BASE_AMOUNT: i64 = 30_000;

/// Sibling discount, in percent off the configured base.
pub const SIBLING_DISCOUNT_PERCENT: u32 = 10;

/// Last day of the month still billed at the base amount.
pub const FIRST_TIER_LAST_DAY: u32 = 10;

/// Last day of the month billed at the first surcharge.
pub const SECOND_TIER_LAST_DAY: u32 = 20;

/// Surcharge for days 11..=20, in percent over the base.
pub const SECOND_TIER_SURCHARGE_PERCENT: u32 = 10;

/// Surcharge for day 21 onward, in percent over the base.
pub const THIRD_TIER_SURCHARGE_PERCENT: u32 = 20;
