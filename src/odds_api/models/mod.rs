pub mod envelope;
pub mod report;
pub mod sport;

pub use envelope::{Envelope, QuotaHeaders, QuotaInfo};
pub use report::{LocalizedEvent, SportSummary, TimeWindowEcho, WindowReport};
pub use sport::{Event, Sport, parse_sports};
