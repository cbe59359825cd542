//! Errors raised by the input layer around the detector.
//!
//! Detection itself is infallible; these cover malformed documents and
//! thresholds rejected before a run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MissionError {
    /// JSON could not be parsed or a required field is missing
    #[error("malformed mission data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("safe distance must be a positive finite number, got {0}")]
    InvalidSafeDistance(f64),

    #[error("time window must be a positive finite number, got {0}")]
    InvalidTimeWindow(f64),

    #[error("mission has an empty drone_id")]
    EmptyDroneId,

    #[error("drone_id '{0}' appears more than once")]
    DuplicateDroneId(String),
}

impl MissionError {
    /// Name of the offending input field, for API error payloads.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            MissionError::Malformed(_) => None,
            MissionError::InvalidSafeDistance(_) => Some("safe_distance"),
            MissionError::InvalidTimeWindow(_) => Some("time_window"),
            MissionError::EmptyDroneId | MissionError::DuplicateDroneId(_) => Some("drone_id"),
        }
    }
}
