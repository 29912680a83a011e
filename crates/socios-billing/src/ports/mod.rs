//! Hexagonal architecture ports.
//!
//! - [`inbound`]: the driving API the scheduler (and the admin surface)
//!   invoke on the engine.
//! - [`outbound`]: the driven collaborators the engine depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::{BillingApi, GenerationReport, RepricingReport};
pub use outbound::{
    Clock, ConfigStore, MemberDirectory, Notifier, ShareAmountUpdate, ShareRepository, SystemClock,
};
