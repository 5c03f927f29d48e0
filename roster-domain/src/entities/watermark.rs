// Scan watermark entity

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::value_objects::{current_log_time, serde_log_time};

/// Timestamp boundary below which all log content has been folded into the
/// roster. Overwritten after every completed scan and on shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watermark {
    #[serde(with = "serde_log_time")]
    pub last_check_time: NaiveDateTime,
}

impl Watermark {
    pub fn new(last_check_time: NaiveDateTime) -> Self {
        Self { last_check_time }
    }

    pub fn now() -> Self {
        Self::new(current_log_time())
    }
}
