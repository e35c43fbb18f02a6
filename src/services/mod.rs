pub mod health_analyzer;
pub mod readiness_monitor;
pub mod response_decoder;

pub use health_analyzer::{analyze, HealthRating, HealthReport};
pub use readiness_monitor::{PollPolicy, ReadinessMonitor, ReadinessOutcome};
pub use response_decoder::{decode_answer, extract_json_payload, DecodedAnswer};
