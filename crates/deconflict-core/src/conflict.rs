//! Conflict detection module.
//!
//! Compares every waypoint of a primary mission against every waypoint
//! of each other mission and reports the pairs that are too close in
//! both space and time. The exhaustive scan is the reference behaviour;
//! the grid and parallel strategies return exactly the same list.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{Mission, Waypoint};
use crate::rules::SeparationRules;
use crate::spatial::{distance, time_gap};

/// Grid cells are made slightly wider than the thresholds so that
/// rounding in the cell computation can never push a matching pair two
/// cells apart.
const GRID_CELL_MARGIN: f64 = 1.0 + 1e-6;
/// Largest cell index the grid accepts; beyond it rounding error could
/// exceed the margin above, so those waypoints are scanned exhaustively.
const MAX_GRID_CELL_INDEX: f64 = 1e9;
/// Smallest threshold the grid accepts. Below it the squared axis
/// differences in [`distance`] can underflow to zero, so pairs in far
/// apart cells may still compare as conflicting.
const MIN_GRID_THRESHOLD: f64 = 1e-150;

/// A primary waypoint time at which another drone came too close.
///
/// Borrows the other mission's identifier. One entry is produced per
/// matching waypoint pair, so the same drone and time may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Conflict<'a> {
    pub drone_id: &'a str,
    pub time: f64,
}

impl<'a> Conflict<'a> {
    pub fn new(drone_id: &'a str, time: f64) -> Self {
        Self { drone_id, time }
    }
}

impl fmt::Display for Conflict<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "('{}', {:?})", self.drone_id, self.time)
    }
}

/// How the detector walks the waypoint pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectionStrategy {
    /// Triple nested loop over missions and waypoints
    #[default]
    BruteForce,
    /// Time-bucketed spatial grid per other mission
    Grid,
    /// Brute force with other missions spread over the rayon pool
    Parallel,
}

impl DetectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStrategy::BruteForce => "brute-force",
            DetectionStrategy::Grid => "grid",
            DetectionStrategy::Parallel => "parallel",
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brute-force" | "brute_force" | "bruteforce" => Ok(DetectionStrategy::BruteForce),
            "grid" => Ok(DetectionStrategy::Grid),
            "parallel" => Ok(DetectionStrategy::Parallel),
            other => Err(format!("unknown detection strategy '{other}'")),
        }
    }
}

/// Find every conflict between `primary` and `others`.
///
/// A pair conflicts when its distance is strictly below `safe_distance`
/// and its time gap strictly below `time_window`. Output order follows
/// `others`, then primary waypoints, then the other mission's waypoints.
/// The reference thresholds are 5.0 and 1.0, see [`SeparationRules::default`].
pub fn detect_conflicts<'a>(
    primary: &Mission,
    others: &'a [Mission],
    safe_distance: f64,
    time_window: f64,
) -> Vec<Conflict<'a>> {
    detect_conflicts_with_rules(primary, others, &SeparationRules::new(safe_distance, time_window))
}

/// Exhaustive detection using configured rules.
pub fn detect_conflicts_with_rules<'a>(
    primary: &Mission,
    others: &'a [Mission],
    rules: &SeparationRules,
) -> Vec<Conflict<'a>> {
    let mut conflicts = Vec::new();
    for other in others {
        scan_mission(primary, other, rules, &mut conflicts);
    }
    conflicts
}

/// Number of waypoint pairs a detection run examines.
pub fn pairs_examined(primary: &Mission, others: &[Mission]) -> usize {
    let other_waypoints: usize = others.iter().map(|m| m.waypoints.len()).sum();
    primary.waypoints.len() * other_waypoints
}

/// Conflict detection engine with configurable rules and strategy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConflictDetector {
    pub rules: SeparationRules,
    pub strategy: DetectionStrategy,
}

impl ConflictDetector {
    pub fn new(rules: SeparationRules, strategy: DetectionStrategy) -> Self {
        Self { rules, strategy }
    }

    /// Same detector with a different strategy.
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Same detector with different rules.
    pub fn with_rules(mut self, rules: SeparationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Run detection for one primary mission.
    pub fn detect<'a>(&self, primary: &Mission, others: &'a [Mission]) -> Vec<Conflict<'a>> {
        let conflicts = match self.strategy {
            DetectionStrategy::BruteForce => {
                detect_conflicts_with_rules(primary, others, &self.rules)
            }
            DetectionStrategy::Grid => detect_indexed(primary, others, &self.rules),
            DetectionStrategy::Parallel => detect_parallel(primary, others, &self.rules),
        };

        tracing::debug!(
            primary = %primary.drone_id,
            others = others.len(),
            strategy = %self.strategy,
            conflicts = conflicts.len(),
            "conflict scan complete"
        );

        conflicts
    }
}

fn pair_conflicts(wp_primary: &Waypoint, wp_other: &Waypoint, rules: &SeparationRules) -> bool {
    rules.violated_by(distance(wp_primary, wp_other), time_gap(wp_primary, wp_other))
}

fn scan_mission<'a>(
    primary: &Mission,
    other: &'a Mission,
    rules: &SeparationRules,
    out: &mut Vec<Conflict<'a>>,
) {
    for wp_primary in &primary.waypoints {
        scan_waypoint(wp_primary, other, rules, out);
    }
}

fn scan_waypoint<'a>(
    wp_primary: &Waypoint,
    other: &'a Mission,
    rules: &SeparationRules,
    out: &mut Vec<Conflict<'a>>,
) {
    for wp_other in &other.waypoints {
        if pair_conflicts(wp_primary, wp_other, rules) {
            out.push(Conflict::new(&other.drone_id, wp_primary.time));
        }
    }
}

fn detect_parallel<'a>(
    primary: &Mission,
    others: &'a [Mission],
    rules: &SeparationRules,
) -> Vec<Conflict<'a>> {
    // Indexed collect keeps the per-mission results in input order.
    let per_mission: Vec<Vec<Conflict<'a>>> = others
        .par_iter()
        .map(|other| {
            let mut found = Vec::new();
            scan_mission(primary, other, rules, &mut found);
            found
        })
        .collect();

    per_mission.into_iter().flatten().collect()
}

fn detect_indexed<'a>(
    primary: &Mission,
    others: &'a [Mission],
    rules: &SeparationRules,
) -> Vec<Conflict<'a>> {
    // Distances and time gaps are never negative, so nothing can be
    // strictly below a non-positive (or NaN) threshold.
    if !(rules.safe_distance > 0.0 && rules.time_window > 0.0) {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    let mut candidates = Vec::new();

    for other in others {
        let Some(grid) = WaypointGrid::build(other, rules) else {
            scan_mission(primary, other, rules, &mut conflicts);
            continue;
        };

        for wp_primary in &primary.waypoints {
            // A non-finite field makes the distance or the time gap
            // NaN/infinite, which never compares below a finite threshold.
            if !wp_primary.is_finite() {
                continue;
            }
            let Some(cell) = grid.cell_of(wp_primary) else {
                scan_waypoint(wp_primary, other, rules, &mut conflicts);
                continue;
            };

            grid.neighbours(cell, &mut candidates);
            for &idx in &candidates {
                if pair_conflicts(wp_primary, &other.waypoints[idx], rules) {
                    conflicts.push(Conflict::new(&other.drone_id, wp_primary.time));
                }
            }
        }
    }

    conflicts
}

type CellKey = [i64; 4];

/// Waypoint indices of one mission bucketed by (x, y, z, time) cell.
struct WaypointGrid {
    cell_space: f64,
    cell_time: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl WaypointGrid {
    /// Returns `None` when the thresholds or coordinates are outside the
    /// range the grid can bucket exactly.
    fn build(mission: &Mission, rules: &SeparationRules) -> Option<Self> {
        if rules.safe_distance < MIN_GRID_THRESHOLD || rules.time_window < MIN_GRID_THRESHOLD {
            return None;
        }

        let cell_space = rules.safe_distance * GRID_CELL_MARGIN;
        let cell_time = rules.time_window * GRID_CELL_MARGIN;
        if !(cell_space.is_finite() && cell_time.is_finite()) {
            return None;
        }

        let mut grid = Self {
            cell_space,
            cell_time,
            cells: HashMap::new(),
        };

        for (idx, wp) in mission.waypoints.iter().enumerate() {
            if !wp.is_finite() {
                continue;
            }
            let cell = grid.cell_of(wp)?;
            grid.cells.entry(cell).or_default().push(idx);
        }

        Some(grid)
    }

    fn cell_of(&self, wp: &Waypoint) -> Option<CellKey> {
        let scaled = [
            wp.x / self.cell_space,
            wp.y / self.cell_space,
            wp.z / self.cell_space,
            wp.time / self.cell_time,
        ];

        let mut key = [0i64; 4];
        for (slot, value) in key.iter_mut().zip(scaled) {
            let cell = value.floor();
            if !(cell.abs() <= MAX_GRID_CELL_INDEX) {
                return None;
            }
            *slot = cell as i64;
        }
        Some(key)
    }

    /// Collect indices from the 3^4 cells around `cell`, in ascending
    /// order so that matches come out in waypoint order.
    fn neighbours(&self, cell: CellKey, out: &mut Vec<usize>) {
        out.clear();
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    for dt in -1..=1 {
                        let key = [cell[0] + dx, cell[1] + dy, cell[2] + dz, cell[3] + dt];
                        if let Some(indices) = self.cells.get(&key) {
                            out.extend_from_slice(indices);
                        }
                    }
                }
            }
        }
        out.sort_unstable();
    }
}
