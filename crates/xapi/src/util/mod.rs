//! Utility modules.

pub mod datetime;
pub mod duration;

pub use datetime::{format_query_time, format_timestamp, parse_http_date, parse_timestamp};
pub use duration::{format_duration, parse_duration, IsoDuration};
