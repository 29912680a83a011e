//! The share entity and its lifecycle state machine.
//!
//! State machine:
//!
//! ```text
//! [PENDING] ──day > 10──→ [OVERDUE]
//!     │                       │
//!     └────record payment─────┴──→ [PAID]  (terminal)
//! ```
//!
//! INVARIANT-1: one share per `(member, period)` (enforced by the repository).
//! INVARIANT-2: `Paid` ⇔ payment method and payment date both set.
//! INVARIANT-3: the amount of an unpaid share only ever increases.

use super::period::Period;
use super::pricing::PricedShare;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use socios_types::{MemberId, Money, PaymentMethod, ShareId, UserId};

/// Lifecycle state of a share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareState {
    /// Billed at the base amount, within the first tier window.
    #[default]
    Pending,
    /// Past the first tier window and carrying a surcharge.
    Overdue,
    /// Settled. Terminal: the engine never touches a paid share again.
    Paid,
}

impl ShareState {
    /// Returns true for states the re-pricing job still operates on.
    pub fn is_outstanding(self) -> bool {
        matches!(self, ShareState::Pending | ShareState::Overdue)
    }
}

/// A member's fee obligation for one calendar month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    /// Repository-assigned identifier.
    pub id: ShareId,
    /// The member this share bills. Not owned by the share.
    pub member_id: MemberId,
    /// Billing month, normalized to its first civil day.
    pub period: Period,
    /// Current amount due (or the amount that was paid).
    pub amount: Money,
    /// Lifecycle state.
    pub state: ShareState,
    /// Set only when a payment is recorded.
    pub payment_method: Option<PaymentMethod>,
    /// Set only when a payment is recorded.
    pub payment_date: Option<NaiveDate>,
    /// Acting back-office user; `None` for engine-generated updates.
    pub updated_by: Option<UserId>,
}

impl Share {
    /// Materializes a draft into a pending share under a fresh id.
    pub fn from_draft(draft: ShareDraft) -> Self {
        Share {
            id: ShareId::new(),
            member_id: draft.member_id,
            period: draft.period,
            amount: draft.amount,
            state: ShareState::Pending,
            payment_method: None,
            payment_date: None,
            updated_by: None,
        }
    }

    /// Returns true once the share is settled.
    pub fn is_paid(&self) -> bool {
        self.state == ShareState::Paid
    }

    /// Returns true while the share is still subject to re-pricing.
    pub fn is_outstanding(&self) -> bool {
        self.state.is_outstanding()
    }

    /// Applies a pricing result to an outstanding share.
    ///
    /// # Errors
    /// Rejects application to a paid share: `Paid` is terminal.
    pub fn reprice(&mut self, priced: &PricedShare, by: Option<UserId>) -> Result<(), &'static str> {
        if self.is_paid() {
            return Err("cannot reprice a paid share");
        }
        self.amount = priced.amount;
        self.state = priced.state;
        self.updated_by = by;
        Ok(())
    }

    /// Records a payment, closing the share out.
    ///
    /// Sets the state and both payment fields together so the
    /// `Paid ⇔ payment fields present` invariant has a single writer.
    ///
    /// # Errors
    /// Rejects a second payment on an already-paid share.
    pub fn record_payment(
        &mut self,
        method: PaymentMethod,
        date: NaiveDate,
        by: Option<UserId>,
    ) -> Result<(), &'static str> {
        if self.is_paid() {
            return Err("share is already paid");
        }
        self.state = ShareState::Paid;
        self.payment_method = Some(method);
        self.payment_date = Some(date);
        self.updated_by = by;
        Ok(())
    }
}

/// An insert-shaped share without an id; the repository assigns one on
/// `bulk_insert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareDraft {
    /// Member to bill.
    pub member_id: MemberId,
    /// Billing month.
    pub period: Period,
    /// Opening amount (day-1 pricing with the discount rule applied).
    pub amount: Money,
}
