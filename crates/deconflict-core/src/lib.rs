//! Spatio-temporal deconfliction of drone missions.
//!
//! A primary mission is compared waypoint by waypoint against a set of
//! other missions; every pair that is both closer than the safe distance
//! and closer than the time window is reported as a [`Conflict`].

pub mod conflict;
pub mod error;
pub mod models;
pub mod plot;
pub mod report;
pub mod rules;
pub mod spatial;

pub use conflict::{
    detect_conflicts, detect_conflicts_with_rules, pairs_examined, Conflict, ConflictDetector,
    DetectionStrategy,
};
pub use error::MissionError;
pub use models::{Mission, Scenario, Waypoint};
pub use plot::MissionPlot;
pub use report::{ConflictReport, MissionStatus};
pub use rules::SeparationRules;
pub use spatial::distance;
