//! The closed set of commands the behaviour core can send to the robot.

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use crate::geom::Complex;

/// One motion or sensor command, emitted once per reaction.
///
/// `speed` is signed pulses per second (positive = forward).  Equality of
/// whole commands is what drives throttling de-duplication, so the variants
/// derive `PartialEq`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotCommand {
    /// Do nothing this tick; not forwarded to the controller.
    Idle,
    /// Stop both motors.
    Halt,
    /// Move with the given absolute heading and speed.
    Move { direction: Complex, speed: i32 },
    /// Point the proximity sensor at the given angle, relative to the robot.
    Scan(Complex),
    /// Move while keeping the sensor scanning straight ahead.
    MoveFrontScan { direction: Complex, speed: i32 },
}

impl RobotCommand {
    /// Build a scan command, clamping the angle to the sensor's mechanical
    /// range of ±90°.
    pub fn scan(direction: Complex) -> RobotCommand {
        RobotCommand::Scan(direction.clamp(
            Complex::from_rad(-FRAC_PI_2),
            Complex::from_rad(FRAC_PI_2),
        ))
    }

    /// Build a move command.
    pub fn movement(direction: Complex, speed: i32) -> RobotCommand {
        RobotCommand::Move { direction, speed }
    }

    #[inline]
    pub fn is_halt(&self) -> bool {
        matches!(self, RobotCommand::Halt)
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, RobotCommand::Idle)
    }
}

impl fmt::Display for RobotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotCommand::Idle => write!(f, "idle"),
            RobotCommand::Halt => write!(f, "halt"),
            RobotCommand::Move { direction, speed } => write!(f, "move({direction}, {speed}pps)"),
            RobotCommand::Scan(direction) => write!(f, "scan({direction})"),
            RobotCommand::MoveFrontScan { direction, speed } => {
                write!(f, "moveFrontScan({direction}, {speed}pps)")
            }
        }
    }
}
