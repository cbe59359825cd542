//! Plot description for the mission visualizer.
//!
//! Rendering happens outside this crate. This module only lays out what
//! to draw: one polyline per mission and a marker for each conflict that
//! can be located on the primary trajectory.

use serde::Serialize;

use crate::conflict::Conflict;
use crate::models::Mission;

pub const PLOT_TITLE: &str = "UAV Mission Trajectories";

const PRIMARY_COLOR: &str = "blue";
const PRIMARY_LINE_WIDTH: f64 = 2.0;
const TRACK_LINE_WIDTH: f64 = 1.5;
/// Colours cycled over the other missions, by index
const TRACK_COLORS: [&str; 4] = ["red", "green", "orange", "purple"];
const CONFLICT_COLOR: &str = "red";
const CONFLICT_MARKER: &str = "x";
const CONFLICT_MARKER_SIZE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One mission drawn as a connected path.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub drone_id: String,
    pub label: String,
    pub color: &'static str,
    pub line_style: LineStyle,
    pub line_width: f64,
    /// Waypoint positions in mission order
    pub points: Vec<[f64; 3]>,
}

/// Highlight placed on the primary waypoint of a conflict.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictMarker {
    pub drone_id: String,
    pub time: f64,
    pub position: [f64; 3],
    pub label: String,
    pub color: &'static str,
    pub marker: &'static str,
    pub size: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AxisLabels {
    pub x: &'static str,
    pub y: &'static str,
    pub z: &'static str,
}

impl Default for AxisLabels {
    fn default() -> Self {
        Self {
            x: "X (m)",
            y: "Y (m)",
            z: "Z (m)",
        }
    }
}

/// Everything needed to draw missions and conflicts in 3-D.
#[derive(Debug, Clone, Serialize)]
pub struct MissionPlot {
    pub title: &'static str,
    pub axes: AxisLabels,
    pub tracks: Vec<Track>,
    pub markers: Vec<ConflictMarker>,
    /// Conflicts whose time matched no primary waypoint
    pub skipped_conflicts: usize,
}

impl MissionPlot {
    /// Lay out the primary mission, the other missions and the markers.
    ///
    /// A conflict is placed at the first primary waypoint whose time is
    /// exactly equal to the conflict time. Conflict times are copied from
    /// primary waypoints, so exact comparison is what keeps them paired;
    /// a conflict with no such waypoint is skipped.
    pub fn build(primary: &Mission, others: &[Mission], conflicts: &[Conflict<'_>]) -> Self {
        let mut tracks = Vec::with_capacity(others.len() + 1);
        tracks.push(Track {
            drone_id: primary.drone_id.clone(),
            label: format!("Primary: {}", primary.drone_id),
            color: PRIMARY_COLOR,
            line_style: LineStyle::Solid,
            line_width: PRIMARY_LINE_WIDTH,
            points: primary.waypoints.iter().map(|wp| wp.position()).collect(),
        });

        for (i, mission) in others.iter().enumerate() {
            tracks.push(Track {
                drone_id: mission.drone_id.clone(),
                label: format!("Drone: {}", mission.drone_id),
                color: TRACK_COLORS[i % TRACK_COLORS.len()],
                line_style: LineStyle::Dashed,
                line_width: TRACK_LINE_WIDTH,
                points: mission.waypoints.iter().map(|wp| wp.position()).collect(),
            });
        }

        let mut markers = Vec::with_capacity(conflicts.len());
        let mut skipped_conflicts = 0;
        for conflict in conflicts {
            let Some(wp) = primary.waypoint_at(conflict.time) else {
                tracing::debug!(
                    drone_id = conflict.drone_id,
                    time = conflict.time,
                    "no primary waypoint at conflict time, marker skipped"
                );
                skipped_conflicts += 1;
                continue;
            };
            markers.push(ConflictMarker {
                drone_id: conflict.drone_id.to_string(),
                time: conflict.time,
                position: wp.position(),
                label: format!("Conflict at t={:?}s", conflict.time),
                color: CONFLICT_COLOR,
                marker: CONFLICT_MARKER,
                size: CONFLICT_MARKER_SIZE,
            });
        }

        Self {
            title: PLOT_TITLE,
            axes: AxisLabels::default(),
            tracks,
            markers,
            skipped_conflicts,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::detect_conflicts;

    fn others(count: usize) -> Vec<Mission> {
        (0..count)
            .map(|i| {
                Mission::new(format!("Drone{i}"), Vec::new()).with_waypoint(i as f64, 0.0, 0.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn tracks_follow_reference_styling() {
        let primary = Mission::new("DroneA", Vec::new())
            .with_waypoint(0.0, 0.0, 0.0, 0.0)
            .with_waypoint(10.0, 10.0, 5.0, 5.0);
        let plot = MissionPlot::build(&primary, &others(5), &[]);

        assert_eq!(plot.title, "UAV Mission Trajectories");
        assert_eq!(plot.tracks.len(), 6);
        assert_eq!(plot.tracks[0].label, "Primary: DroneA");
        assert_eq!(plot.tracks[0].color, "blue");
        assert_eq!(plot.tracks[0].line_style, LineStyle::Solid);
        assert_eq!(plot.tracks[0].points, vec![[0.0, 0.0, 0.0], [10.0, 10.0, 5.0]]);

        let colors: Vec<&str> = plot.tracks[1..].iter().map(|t| t.color).collect();
        assert_eq!(colors, vec!["red", "green", "orange", "purple", "red"]);
        assert!(plot.tracks[1..].iter().all(|t| t.line_style == LineStyle::Dashed));
        assert_eq!(plot.tracks[1].label, "Drone: Drone0");
    }

    #[test]
    fn marker_uses_first_primary_waypoint_with_exact_time() {
        let primary = Mission::new("DroneA", Vec::new())
            .with_waypoint(1.0, 1.0, 1.0, 5.0)
            .with_waypoint(2.0, 2.0, 2.0, 5.0);
        let conflicts = [Conflict::new("DroneB", 5.0)];

        let plot = MissionPlot::build(&primary, &[], &conflicts);
        assert_eq!(plot.markers.len(), 1);
        assert_eq!(plot.markers[0].position, [1.0, 1.0, 1.0]);
        assert_eq!(plot.markers[0].label, "Conflict at t=5.0s");
        assert_eq!(plot.markers[0].marker, "x");
    }

    #[test]
    fn marker_label_formats_time_like_console_verdict() {
        let primary = Mission::new("DroneA", Vec::new())
            .with_waypoint(0.0, 0.0, 0.0, 4.0)
            .with_waypoint(1.0, 0.0, 0.0, 2.5);
        let conflicts = [
            Conflict::new("DroneB", 4.0),
            Conflict::new("DroneB", 2.5),
        ];

        let plot = MissionPlot::build(&primary, &[], &conflicts);
        let labels: Vec<&str> = plot.markers.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Conflict at t=4.0s", "Conflict at t=2.5s"]);
        assert_eq!(conflicts[0].to_string(), "('DroneB', 4.0)");
        assert_eq!(conflicts[1].to_string(), "('DroneB', 2.5)");
    }

    #[test]
    fn unmatched_conflict_time_is_skipped() {
        let primary = Mission::new("DroneA", Vec::new()).with_waypoint(0.0, 0.0, 0.0, 5.0);
        let conflicts = [
            Conflict::new("DroneB", 5.000_001),
            Conflict::new("DroneC", 5.0),
        ];

        let plot = MissionPlot::build(&primary, &[], &conflicts);
        assert_eq!(plot.markers.len(), 1);
        assert_eq!(plot.markers[0].drone_id, "DroneC");
        assert_eq!(plot.skipped_conflicts, 1);
    }

    #[test]
    fn detected_conflicts_always_find_their_waypoint() {
        let primary = Mission::new("DroneA", Vec::new())
            .with_waypoint(0.0, 0.0, 0.0, 0.1)
            .with_waypoint(3.0, 0.0, 0.0, 0.7);
        let others = vec![Mission::new("DroneB", Vec::new()).with_waypoint(1.0, 0.0, 0.0, 0.3)];

        let conflicts = detect_conflicts(&primary, &others, 5.0, 1.0);
        let plot = MissionPlot::build(&primary, &others, &conflicts);
        assert_eq!(conflicts.len(), 2);
        assert_eq!(plot.markers.len(), 2);
        assert_eq!(plot.skipped_conflicts, 0);
    }
}
