//! Pre-defined mission sets for demos and tests.

use deconflict_core::{Mission, Scenario, Waypoint};

/// Cruise altitude shared by the demo missions
const CRUISE_ALTITUDE_M: f64 = 30.0;

/// The reference example: three drones, no conflict.
///
/// - DroneA (primary): diagonal climb from the origin
/// - DroneB: parallel-ish path, always more than 5 m away at equal times
/// - DroneC: ends beyond DroneA's final waypoint
pub fn create_reference_scenario() -> Scenario {
    let primary = Mission::new("DroneA", Vec::new())
        .with_waypoint(0.0, 0.0, 0.0, 0.0)
        .with_waypoint(10.0, 10.0, 5.0, 5.0)
        .with_waypoint(20.0, 20.0, 10.0, 10.0);

    let others = vec![
        Mission::new("DroneB", Vec::new())
            .with_waypoint(5.0, 5.0, 2.0, 5.0)
            .with_waypoint(15.0, 15.0, 7.0, 10.0),
        Mission::new("DroneC", Vec::new()).with_waypoint(25.0, 25.0, 12.0, 10.0),
    ];

    Scenario::new(primary, others)
}

/// Two drones flying head-on along the same corridor, passing at t=4.
///
/// A third drone flies the same schedule 20 m to the side and never
/// conflicts.
pub fn create_head_on_scenario() -> Scenario {
    let straight = |drone_id: &str, start_x: f64, step_x: f64, y: f64| {
        let waypoints = (0..=8)
            .map(|i| {
                let t = i as f64;
                Waypoint::new(start_x + step_x * t, y, CRUISE_ALTITUDE_M, t)
            })
            .collect();
        Mission::new(drone_id, waypoints)
    };

    Scenario::new(
        straight("DroneA", 0.0, 5.0, 0.0),
        vec![
            straight("DroneB", 40.0, -5.0, 1.0),
            straight("DroneC", 0.0, 5.0, 20.0),
        ],
    )
}

/// Four drones converging on the origin from the cardinal directions,
/// arriving as the primary passes overhead at t=10.
pub fn create_converging_scenario() -> Scenario {
    let primary = Mission::new("PRIMARY", Vec::new())
        .with_waypoint(-70.0, -70.0, CRUISE_ALTITUDE_M, 0.0)
        .with_waypoint(0.0, 0.0, CRUISE_ALTITUDE_M, 10.0)
        .with_waypoint(70.0, 70.0, CRUISE_ALTITUDE_M, 20.0);

    let headings: [(f64, f64); 4] = [(0.0, 1.0), (1.0, 0.0), (0.0, -1.0), (-1.0, 0.0)];
    let others = headings
        .iter()
        .enumerate()
        .map(|(i, &(dx, dy))| {
            let waypoints = [(100.0, 0.0), (50.0, 5.0), (2.0, 10.0)]
                .iter()
                .map(|&(range, t)| Waypoint::new(dx * range, dy * range, CRUISE_ALTITUDE_M, t))
                .collect();
            Mission::new(format!("DRONE{:03}", i + 1), waypoints)
        })
        .collect();

    Scenario::new(primary, others)
}
