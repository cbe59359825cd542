//! Spatial math for conflict detection.

use crate::models::Waypoint;

/// Straight-line distance between two waypoints in 3-D space.
///
/// Time is ignored. NaN or infinite coordinates propagate through the
/// result unchanged, so they never compare below a finite threshold.
pub fn distance(a: &Waypoint, b: &Waypoint) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Absolute time gap between two waypoints.
pub fn time_gap(a: &Waypoint, b: &Waypoint) -> f64 {
    (a.time - b.time).abs()
}
