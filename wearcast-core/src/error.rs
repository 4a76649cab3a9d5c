use thiserror::Error;

/// Failures at the forecast boundary (wire format or transport).
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("forecast response contained no current conditions")]
    MissingCurrent,

    #[error("invalid forecast timestamp '{0}'")]
    Timestamp(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferenceError {
    #[error("preferences cannot be both runs cold and runs hot")]
    ConflictingBias,

    #[error("unknown temperature bias '{0}' (expected neutral, runs-cold or runs-hot)")]
    UnknownBias(String),
}

/// Failures talking to the place-name service.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to parse geocoding JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("geocoding result has an invalid coordinate '{0}'")]
    Coordinate(String),
}
