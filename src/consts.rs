/// Reserved credential value meaning "no API key configured yet"
pub(crate) const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Log file written to the working directory when nothing else is configured
pub(crate) const DEFAULT_LOG_FILENAME: &str = "gmap_log.csv";

/// Timestamp column format: "2025-01-15 08:30:00"
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Written to the duration column when the fetch failed
pub(crate) const DURATION_ERROR_SENTINEL: &str = "ERROR";

pub(crate) const DEFAULT_ORIGIN: &str = "Times Square, New York, NY";
pub(crate) const DEFAULT_DESTINATION: &str = "Empire State Building, New York, NY";
