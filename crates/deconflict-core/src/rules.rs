//! Separation thresholds for the deconfliction check.

use serde::{Deserialize, Serialize};

use crate::error::MissionError;

/// Default minimum spatial separation (same unit as waypoint coordinates)
pub const DEFAULT_SAFE_DISTANCE: f64 = 5.0;
/// Default temporal coincidence window (same unit as waypoint times)
pub const DEFAULT_TIME_WINDOW: f64 = 1.0;

/// Thresholds a waypoint pair must both fall under to count as a conflict.
///
/// Both comparisons are strict: a pair exactly at `safe_distance` or
/// exactly `time_window` apart is not a conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparationRules {
    /// Minimum separation; closer pairs are too close
    #[serde(default = "default_safe_distance")]
    pub safe_distance: f64,
    /// Pairs whose times differ by less than this are simultaneous
    #[serde(default = "default_time_window")]
    pub time_window: f64,
}

fn default_safe_distance() -> f64 {
    DEFAULT_SAFE_DISTANCE
}

fn default_time_window() -> f64 {
    DEFAULT_TIME_WINDOW
}

impl Default for SeparationRules {
    fn default() -> Self {
        Self::new(DEFAULT_SAFE_DISTANCE, DEFAULT_TIME_WINDOW)
    }
}

impl SeparationRules {
    pub fn new(safe_distance: f64, time_window: f64) -> Self {
        Self {
            safe_distance,
            time_window,
        }
    }

    /// Require both thresholds to be finite and strictly positive.
    ///
    /// The detector never calls this; it accepts any value and simply
    /// finds nothing when a threshold is zero or negative.
    pub fn validate(&self) -> Result<(), MissionError> {
        if !(self.safe_distance.is_finite() && self.safe_distance > 0.0) {
            return Err(MissionError::InvalidSafeDistance(self.safe_distance));
        }
        if !(self.time_window.is_finite() && self.time_window > 0.0) {
            return Err(MissionError::InvalidTimeWindow(self.time_window));
        }
        Ok(())
    }

    /// Strict-inequality test on a precomputed distance and time gap.
    pub fn violated_by(&self, distance: f64, time_diff: f64) -> bool {
        distance < self.safe_distance && time_diff < self.time_window
    }
}
