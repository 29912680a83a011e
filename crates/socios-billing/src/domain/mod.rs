//! Pure domain logic: pricing tiers, billing periods, the share entity.
//!
//! Nothing in this module performs I/O or reads the wall clock; every
//! function is a deterministic map over its arguments.

mod period;
mod pricing;
mod share;

pub use period::{civil_date, civil_day_of_month, Period};
pub use pricing::{effective_base, price, sibling_base, PricedShare};
pub use share::{Share, ShareDraft, ShareState};
