mod members;
pub use members::Members;

mod plans;
pub use plans::Plans;

mod payments;
pub use payments::Payments;

mod notifications;
pub use notifications::Notifications;

mod reports;
pub use reports::Report;

mod reminders;
pub use reminders::Reminders;
