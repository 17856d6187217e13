use std::path::PathBuf;

use thiserror::Error;

use crate::consts::PLACEHOLDER_API_KEY;

/// Start-up failures: raised before any measurement is taken.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("Invalid timezone: {input}")]
    InvalidTimezone { input: String },

    #[error("Failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Why a duration could not be obtained. Returned as a value, never panics
/// or aborts the run.
#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error(
        "Error: Please replace '{}' with your actual Google Maps API key (set api_key in the config file).",
        PLACEHOLDER_API_KEY
    )]
    Configuration,

    #[error("No route found between '{origin}' and '{destination}'.")]
    NoRoute { origin: String, destination: String },

    #[error("Google Maps API Error: {status}{}", message_suffix(.message))]
    Provider {
        status: String,
        message: Option<String>,
    },

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

fn message_suffix(message: &Option<String>) -> String {
    match message.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => format!(" ({m})"),
        _ => String::new(),
    }
}

/// Persistence failures while appending to the log file.
#[derive(Debug, Error)]
pub(crate) enum LogError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("existing header [{found}] does not match the {schema} schema [{expected}]")]
    HeaderMismatch {
        schema: &'static str,
        expected: String,
        found: String,
    },
}
