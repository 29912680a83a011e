//! Error types for the billing engine.

use thiserror::Error;

/// Result type alias for billing operations.
pub type Result<T> = std::result::Result<T, BillingError>;

/// Errors that can occur while generating or re-pricing shares.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Config store communication error.
    ///
    /// A *missing* base amount is not an error; the engine falls back to
    /// its configured default. This variant covers store failures only.
    #[error("Config store error: {0}")]
    Config(String),

    /// Member directory communication error.
    #[error("Member directory error: {0}")]
    Directory(String),

    /// Share repository communication error. Bulk operations are atomic,
    /// so a failed call leaves no partial writes behind.
    #[error("Share repository error: {0}")]
    Repository(String),

    /// Notification delivery error for a single member.
    ///
    /// Never escapes a generation run as a hard failure; it is caught per
    /// recipient and surfaced only in the aggregate report.
    #[error("Notification error: {0}")]
    Notify(String),

    /// The manual refresh was invoked outside its permitted window
    /// (day of month must be at most 10).
    #[error("Refresh window closed: day {day} is past day 10")]
    RefreshWindowClosed {
        /// Civil day of month at the time of the call.
        day: u32,
    },

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BillingError {
    /// Check if the error is a caller-input validation rejection rather
    /// than an operational failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::RefreshWindowClosed { .. })
    }
}
