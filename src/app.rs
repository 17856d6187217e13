use chrono::NaiveDateTime;

use crate::config::Settings;
use crate::directions::{DurationProvider, fetch_duration};
use crate::error::FetchError;
use crate::sink::{LogRecord, RecordSink, append_log};

/// What a single measurement run did.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub(crate) outcome: Result<u64, FetchError>,
    pub(crate) logged: bool,
}

/// Fetch one duration and append it to the sink. `now` is captured by the
/// caller before the request goes out.
pub(crate) fn run(
    settings: &Settings,
    provider: &dyn DurationProvider,
    sink: &mut dyn RecordSink,
    now: NaiveDateTime,
) -> RunReport {
    let query = &settings.query;
    println!(
        "Attempting to get driving duration from '{}' to '{}'...",
        query.origin, query.destination
    );

    let outcome = fetch_duration(&settings.api_key, provider, query);

    let logged = if outcome.is_ok() || settings.log_failures {
        let record = LogRecord::from_outcome(now, query, &outcome);
        append_log(sink, &record)
    } else {
        tracing::debug!("failed attempt not logged, log_failures is off");
        false
    };

    match &outcome {
        Ok(minutes) => println!("The estimated driving duration is: {minutes} minutes."),
        Err(_) => println!("Failed to retrieve driving duration. See logs for details."),
    }

    RunReport { outcome, logged }
}
