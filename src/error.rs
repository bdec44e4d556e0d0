use thiserror::Error;

/// A snapshot payload (initial or live) could not be decoded.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot payload is empty")]
    Empty,
    #[error("snapshot payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the live telemetry connection. All of them end the
/// connection and lead to a scheduled reconnect.
#[derive(Error, Debug)]
pub enum LiveError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("endpoint answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("stream ended")]
    Closed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ClockError {
    #[error("invalid time of day {0:?} (expected HH:MM)")]
    Invalid(String),
}
