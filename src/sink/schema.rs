use clap::ValueEnum;
use serde::Deserialize;

use super::LogRecord;
use crate::consts::{DURATION_ERROR_SENTINEL, TIMESTAMP_FORMAT};

const EXTENDED_HEADERS: &[&str] = &[
    "Timestamp",
    "Year",
    "Month",
    "Weekday",
    "Origin",
    "Destination",
    "Duration (min)",
    "ErrorLog",
];

const MINIMAL_HEADERS: &[&str] = &[
    "Timestamp",
    "Weekday",
    "Origin",
    "Destination",
    "Duration (min)",
];

/// Column layout of the log file. Fixed for the lifetime of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Schema {
    /// Timestamp, calendar fields, route, duration and error text (default)
    #[default]
    Extended,
    /// Timestamp, weekday, route and duration
    Minimal,
}

impl Schema {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Schema::Extended => "extended",
            Schema::Minimal => "minimal",
        }
    }

    pub(crate) fn headers(self) -> &'static [&'static str] {
        match self {
            Schema::Extended => EXTENDED_HEADERS,
            Schema::Minimal => MINIMAL_HEADERS,
        }
    }

    /// Cells for one record, in header order.
    pub(crate) fn row(self, record: &LogRecord) -> Vec<String> {
        let ts = record.timestamp;
        let timestamp = ts.format(TIMESTAMP_FORMAT).to_string();
        let weekday = ts.format("%A").to_string();
        let duration = match record.duration_minutes {
            Some(minutes) => minutes.to_string(),
            None => DURATION_ERROR_SENTINEL.to_string(),
        };

        match self {
            Schema::Extended => vec![
                timestamp,
                ts.format("%Y").to_string(),
                ts.format("%B").to_string(),
                weekday,
                record.origin.clone(),
                record.destination.clone(),
                duration,
                record.error.clone().unwrap_or_default(),
            ],
            Schema::Minimal => vec![
                timestamp,
                weekday,
                record.origin.clone(),
                record.destination.clone(),
                duration,
            ],
        }
    }
}
