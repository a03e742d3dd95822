pub mod config;
pub mod dates;
pub mod evaluator;
pub mod invite;
pub mod loader;
pub mod notifier;
pub mod record;

pub use config::{Config, ConfigError, DateColumns};
pub use evaluator::{ReminderMatch, due_reminders};
pub use invite::CalendarInvite;
pub use loader::{LoadError, load_records};
pub use notifier::{Mailer, RunSummary, SendError, SmtpMailer};
pub use record::ScheduleRecord;
