//! Log appending
//!
//! A [`RecordSink`] stores one [`LogRecord`] per run. The CSV file sink is the
//! production implementation; tests use an in-memory sink.

pub(crate) mod csv_file;
pub(crate) mod schema;

pub(crate) use csv_file::CsvFileSink;
pub(crate) use schema::Schema;

use chrono::NaiveDateTime;

use crate::directions::Query;
use crate::error::{FetchError, LogError};

/// One measurement attempt, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LogRecord {
    pub(crate) timestamp: NaiveDateTime,
    pub(crate) origin: String,
    pub(crate) destination: String,
    /// `None` when the fetch failed
    pub(crate) duration_minutes: Option<u64>,
    pub(crate) error: Option<String>,
}

impl LogRecord {
    pub(crate) fn from_outcome(
        timestamp: NaiveDateTime,
        query: &Query,
        outcome: &Result<u64, FetchError>,
    ) -> Self {
        let (duration_minutes, error) = match outcome {
            Ok(minutes) => (Some(*minutes), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            timestamp,
            origin: query.origin.clone(),
            destination: query.destination.clone(),
            duration_minutes,
            error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppendOutcome {
    /// The target did not exist; header and row were written
    Created,
    Appended,
}

pub(crate) trait RecordSink {
    /// Human-readable target, used in console messages
    fn location(&self) -> String;

    fn append(&mut self, record: &LogRecord) -> Result<AppendOutcome, LogError>;
}

/// Append one record, reporting the result on stdout. Returns whether the
/// record was saved; a failed save drops the record.
pub(crate) fn append_log(sink: &mut dyn RecordSink, record: &LogRecord) -> bool {
    let location = sink.location();
    match sink.append(record) {
        Ok(outcome) => {
            if outcome == AppendOutcome::Created {
                println!("Created new log file: '{location}' with headers.");
            }
            println!("Successfully logged data to '{location}'.");
            true
        }
        Err(e) => {
            println!("Error saving log file '{location}': {e}");
            false
        }
    }
}
