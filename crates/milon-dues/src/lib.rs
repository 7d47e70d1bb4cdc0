use thiserror::Error as ThisError;

pub mod datetime;
pub mod duplicate;
pub mod notifications;
pub mod reminders;
pub mod standing;
pub mod stats;
pub mod status;

pub use duplicate::has_payment_for_period;
pub use notifications::{generate_notifications, purge_read_notifications};
pub use standing::{member_standing, roster_standings, MemberStanding};
pub use status::{classify, MembershipStatus};

/// The storage layer could not be read or written. Recoverable:
/// callers degrade to empty results instead of crashing.
#[derive(Debug, ThisError)]
#[error("storage unavailable: {0}")]
pub struct StoreUnavailable(#[from] anyhow::Error);
