// Console log timestamp handling. The server log and both store files share
// a single whole-second format.

use chrono::{Local, NaiveDateTime, Timelike};

pub const LOG_TIME_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

pub fn parse_log_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOG_TIME_FORMAT).ok()
}

pub fn format_log_time(value: &NaiveDateTime) -> String {
    value.format(LOG_TIME_FORMAT).to_string()
}

/// Current local wall-clock time, truncated to the log's second granularity.
pub fn current_log_time() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub mod serde_log_time {
    use chrono::NaiveDateTime;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{format_log_time, parse_log_time, LOG_TIME_FORMAT};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_log_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_log_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp, expected {LOG_TIME_FORMAT}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_round_trip() {
        let parsed = parse_log_time("01/01/2024 10:00:00").expect("parse");
        assert_eq!(format_log_time(&parsed), "01/01/2024 10:00:00");
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert!(parse_log_time("2024-01-01 10:00:00").is_none());
        assert!(parse_log_time("01/01/2024").is_none());
        assert!(parse_log_time("").is_none());
    }

    #[test]
    fn current_log_time_has_no_subsecond_part() {
        assert_eq!(current_log_time().nanosecond(), 0);
    }
}
