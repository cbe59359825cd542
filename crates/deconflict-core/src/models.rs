//! Core data models for mission deconfliction.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::MissionError;
use crate::rules::SeparationRules;

/// A timestamped point on a planned trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Seconds since mission start
    pub time: f64,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, z: f64, time: f64) -> Self {
        Self { x, y, z, time }
    }

    /// Position as an `[x, y, z]` triple.
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.time.is_finite()
    }
}

/// A drone's identifier plus its ordered waypoint sequence.
///
/// Waypoint order only matters for display; detection treats the
/// sequence as a set of samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub drone_id: String,
    pub waypoints: Vec<Waypoint>,
}

impl Mission {
    pub fn new(drone_id: impl Into<String>, waypoints: Vec<Waypoint>) -> Self {
        Self {
            drone_id: drone_id.into(),
            waypoints,
        }
    }

    /// Append a waypoint.
    pub fn with_waypoint(mut self, x: f64, y: f64, z: f64, time: f64) -> Self {
        self.waypoints.push(Waypoint::new(x, y, z, time));
        self
    }

    /// First waypoint whose time is exactly `time`.
    pub fn waypoint_at(&self, time: f64) -> Option<&Waypoint> {
        self.waypoints.iter().find(|wp| wp.time == time)
    }
}

/// A primary mission checked against a set of other missions.
///
/// This is the JSON document accepted by the CLI and the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub primary: Mission,
    #[serde(default)]
    pub others: Vec<Mission>,
    #[serde(default)]
    pub rules: Option<SeparationRules>,
}

impl Scenario {
    pub fn new(primary: Mission, others: Vec<Mission>) -> Self {
        Self {
            primary,
            others,
            rules: None,
        }
    }

    /// Parse a scenario document.
    pub fn from_json_str(json: &str) -> Result<Self, MissionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rules carried by the document, or the defaults.
    pub fn rules_or_default(&self) -> SeparationRules {
        self.rules.clone().unwrap_or_default()
    }

    /// Check identifiers: every drone id non-empty and unique across the run.
    pub fn validate_ids(&self) -> Result<(), MissionError> {
        let mut seen = HashSet::new();
        for mission in std::iter::once(&self.primary).chain(self.others.iter()) {
            if mission.drone_id.trim().is_empty() {
                return Err(MissionError::EmptyDroneId);
            }
            if !seen.insert(mission.drone_id.as_str()) {
                return Err(MissionError::DuplicateDroneId(mission.drone_id.clone()));
            }
        }
        Ok(())
    }

    /// Full check used by the outer surfaces before detection.
    pub fn validate(&self) -> Result<(), MissionError> {
        self.validate_ids()?;
        if let Some(rules) = &self.rules {
            rules.validate()?;
        }
        Ok(())
    }
}
