pub mod error;
pub mod fetch;
pub mod filter;
pub mod notify;
pub mod parse;
pub mod query;
pub mod scheduler;
pub mod types;
pub mod version;

pub use error::PollerError;
pub use fetch::{country_path, AvailabilityFetcher};
pub use filter::filter_stores;
pub use notify::{notification_for, summarize, InventorySummary, Notification, NotificationSink};
pub use parse::parse_fulfillment;
pub use query::parts_query;
pub use scheduler::{CycleDriver, FetchDriver, PollScheduler};
pub use types::{Availability, PartAvailability, PollResult, PollState, Store, VersionState};
pub use version::{compare_versions, VersionChecker};
