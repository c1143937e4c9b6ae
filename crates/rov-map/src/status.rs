//! Per-tick robot status snapshot and perception markers.

use rov_core::{Complex, Point, SimTime};

use crate::radar::SensorPing;

// ── RobotSpec ─────────────────────────────────────────────────────────────────

/// Static physical characteristics of the robot.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotSpec {
    /// Maximum ultrasonic range in metres.
    pub max_radar_distance: f64,
    /// Radius of the robot footprint in metres.
    pub contact_radius: f64,
    /// Maximum motor speed in pulses per second.
    pub max_speed: i32,
}

impl Default for RobotSpec {
    fn default() -> Self {
        Self {
            max_radar_distance: 3.0,
            contact_radius:     0.15,
            max_speed:          60,
        }
    }
}

// ── RobotStatus ───────────────────────────────────────────────────────────────

/// An immutable snapshot of the robot state, one per status message.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotStatus {
    /// Simulation time of the snapshot — the single clock the core runs on.
    pub time: SimTime,
    /// Robot location in the global frame.
    pub location: Point,
    /// Robot body heading.
    pub direction: Complex,
    /// Sensor direction relative to the body.
    pub sensor_direction: Complex,
    /// Echo distance in metres; `0` means no echo.
    pub echo_distance: f64,
    /// Contact sensors: `false` when the corresponding side is blocked.
    pub can_move_forward:  bool,
    pub can_move_backward: bool,
    /// Time base of the proximity subsystem; carried through but never used
    /// for cell stamping.
    pub proxy_time: SimTime,
    /// Physical characteristics.
    pub spec: RobotSpec,
}

impl RobotStatus {
    /// Absolute heading of the sensor beam.
    #[inline]
    pub fn sensor_heading(&self) -> Complex {
        self.direction + self.sensor_direction
    }

    /// Location of the echo, if any.
    pub fn echo_point(&self) -> Option<Point> {
        if self.echo_distance > 0.0 {
            Some(self.location.translate(self.sensor_heading(), self.echo_distance))
        } else {
            None
        }
    }

    /// `true` if either contact sensor reports a block.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        !self.can_move_forward || !self.can_move_backward
    }

    /// The radar observation carried by this status.
    pub fn ping(&self) -> SensorPing {
        SensorPing {
            time:          self.time,
            location:      self.location,
            direction:     self.sensor_heading(),
            echo_distance: self.echo_distance,
            max_distance:  self.spec.max_radar_distance,
        }
    }
}

// ── LabelMarker ───────────────────────────────────────────────────────────────

/// A label detected by the upstream perception stage.  The core only
/// consumes these; it never creates or ages them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LabelMarker {
    pub id:         String,
    pub location:   Point,
    pub first_seen: SimTime,
    pub last_seen:  SimTime,
}
