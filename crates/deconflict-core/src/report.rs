//! Summary of a single detection run, for console and API output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::conflict::{pairs_examined, Conflict, ConflictDetector, DetectionStrategy};
use crate::models::Mission;
use crate::rules::SeparationRules;

/// Overall verdict for the primary mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    /// No waypoint pair violated separation
    Clear,
    /// At least one conflict was found
    Conflicted,
}

/// Per-drone tally of conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroneTally<'a> {
    pub drone_id: &'a str,
    pub conflicts: usize,
}

/// Result of checking one primary mission against its neighbours.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport<'a> {
    pub primary_id: &'a str,
    pub status: MissionStatus,
    pub rules: SeparationRules,
    pub strategy: DetectionStrategy,
    pub pairs_examined: usize,
    pub conflicts: Vec<Conflict<'a>>,
    pub by_drone: Vec<DroneTally<'a>>,
    pub generated_at: DateTime<Utc>,
}

impl<'a> ConflictReport<'a> {
    /// Run `detector` and wrap its output.
    pub fn run(detector: &ConflictDetector, primary: &'a Mission, others: &'a [Mission]) -> Self {
        let conflicts = detector.detect(primary, others);
        let status = if conflicts.is_empty() {
            MissionStatus::Clear
        } else {
            MissionStatus::Conflicted
        };
        let by_drone = tally(&conflicts);

        Self {
            primary_id: &primary.drone_id,
            status,
            rules: detector.rules.clone(),
            strategy: detector.strategy,
            pairs_examined: pairs_examined(primary, others),
            conflicts,
            by_drone,
            generated_at: Utc::now(),
        }
    }

    pub fn is_clear(&self) -> bool {
        self.status == MissionStatus::Clear
    }

    /// The one-line verdict printed by the command-line tool.
    pub fn summary_line(&self) -> String {
        if self.conflicts.is_empty() {
            return "No conflicts. Mission is CLEAR.".to_string();
        }
        let entries: Vec<String> = self.conflicts.iter().map(|c| c.to_string()).collect();
        format!("Conflicts detected: [{}]", entries.join(", "))
    }
}

impl fmt::Display for ConflictReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_line())
    }
}

/// Count conflicts per drone, in order of first appearance.
fn tally<'a>(conflicts: &[Conflict<'a>]) -> Vec<DroneTally<'a>> {
    let mut tallies: Vec<DroneTally<'a>> = Vec::new();
    for conflict in conflicts {
        match tallies.iter_mut().find(|t| t.drone_id == conflict.drone_id) {
            Some(entry) => entry.conflicts += 1,
            None => tallies.push(DroneTally {
                drone_id: conflict.drone_id,
                conflicts: 1,
            }),
        }
    }
    tallies
}
