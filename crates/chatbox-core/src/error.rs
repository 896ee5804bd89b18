use thiserror::Error;

/// Failures of a single `/chat` round trip.
///
/// Every variant ends up on the same "request failed" path in the widget;
/// the split only exists so callers and logs can tell them apart.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(reqwest::StatusCode),

    #[error("invalid JSON in response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
