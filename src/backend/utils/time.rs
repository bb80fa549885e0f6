use crate::models::common::TimestampNs;
use chrono::{DateTime, Utc};

/// Returns the current Internet Computer time as nanoseconds since epoch.
pub fn get_current_time_ns() -> TimestampNs {
    ic_cdk::api::time()
}

fn to_datetime(ts: TimestampNs) -> DateTime<Utc> {
    let secs = (ts / 1_000_000_000) as i64;
    let nanos = (ts % 1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nanos).unwrap_or_default()
}

/// `2024-01-02 03:04:05`, used for claim stamps.
pub fn format_claim_time(ts: TimestampNs) -> String {
    to_datetime(ts).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `January 02, 2024 03:04 AM`, used for the response footer.
pub fn format_response_time(ts: TimestampNs) -> String {
    to_datetime(ts).format("%B %d, %Y %I:%M %p").to_string()
}
