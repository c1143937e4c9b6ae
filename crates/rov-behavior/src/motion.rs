//! Shared speed shaping for the moving nodes.

use rov_core::{Complex, Point};
use rov_map::RobotStatus;

/// Slowest commanded speed while still approaching, in pulses per second.
pub(crate) const MIN_PPS: i32 = 10;

/// Width of the deceleration band beyond the stop distance, in metres.
pub(crate) const NEAR_DISTANCE: f64 = 0.4;

/// Half-angle within which the forward echo is considered to lie on the
/// commanded heading.
pub(crate) const ECHO_CONE_RAD: f64 = std::f64::consts::FRAC_PI_6;

/// Linear speed ramp: `MIN_PPS` at `stop_distance`, `max_speed` from
/// `stop_distance + NEAR_DISTANCE` outward.
pub(crate) fn fuzzy_speed(distance: f64, stop_distance: f64, max_speed: i32) -> i32 {
    let t = ((distance - stop_distance) / NEAR_DISTANCE).clamp(0.0, 1.0);
    (MIN_PPS as f64 + (max_speed - MIN_PPS) as f64 * t).round() as i32
}

/// The distance to feed the speed ramp: the target distance, shrunk when the
/// forward echo reveals a closer obstacle on the commanded heading.
pub(crate) fn effective_distance(status: &RobotStatus, heading: Complex, target: Point) -> f64 {
    let d = status.location.distance(target);
    if status.echo_distance > 0.0 && status.sensor_heading().is_close_to(heading, ECHO_CONE_RAD) {
        d.min(status.echo_distance)
    } else {
        d
    }
}
