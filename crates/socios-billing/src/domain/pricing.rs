//! Tiered pricing policy (core domain logic).
//!
//! Maps `(base amount, day of month)` to `(amount, state)`:
//!
//! | Day of month | Amount       | State   |
//! |--------------|--------------|---------|
//! | 1..=10       | base         | Pending |
//! | 11..=20      | base × 1.10  | Overdue |
//! | 21..        | base × 1.20  | Overdue |
//!
//! Amounts round to the nearest whole currency unit. The sibling discount
//! is applied to the configured base *before* tiering and is recomputed
//! from the current configuration on every run; it is never cached on
//! the share.

use super::share::ShareState;
use crate::{
    FIRST_TIER_LAST_DAY, SECOND_TIER_LAST_DAY, SECOND_TIER_SURCHARGE_PERCENT,
    SIBLING_DISCOUNT_PERCENT, THIRD_TIER_SURCHARGE_PERCENT,
};
use socios_types::{Member, Money};

/// The outcome of pricing one share on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedShare {
    /// Escalated amount for the day.
    pub amount: Money,
    /// Lifecycle state implied by the day's tier.
    pub state: ShareState,
}

/// Prices a share from its (possibly discounted) base amount and the
/// civil day of month.
///
/// Deterministic and side-effect-free; `day_of_month` is 1-based.
pub fn price(base: Money, day_of_month: u32) -> PricedShare {
    if day_of_month <= FIRST_TIER_LAST_DAY {
        PricedShare {
            amount: base,
            state: ShareState::Pending,
        }
    } else if day_of_month <= SECOND_TIER_LAST_DAY {
        PricedShare {
            amount: base.percent(100 + SECOND_TIER_SURCHARGE_PERCENT),
            state: ShareState::Overdue,
        }
    } else {
        PricedShare {
            amount: base.percent(100 + THIRD_TIER_SURCHARGE_PERCENT),
            state: ShareState::Overdue,
        }
    }
}

/// Reduced base amount for members flagged with the sibling discount.
pub fn sibling_base(configured: Money) -> Money {
    configured.percent(100 - SIBLING_DISCOUNT_PERCENT)
}

/// Base amount a specific member is billed from, with the discount rule
/// applied.
pub fn effective_base(configured: Money, member: &Member) -> Money {
    if member.has_sibling_discount {
        sibling_base(configured)
    } else {
        configured
    }
}
