//! `CommandThrottle` — de-duplication and pacing of the command stream.
//!
//! The firmware keeps applying its last motion command, so re-sending an
//! identical `move` every reaction only burns bandwidth.  The throttle
//! forwards a motion command when its parameters change or when
//! `command_interval` has elapsed since the last send (a keep-alive for the
//! firmware's own watchdog).  Scans follow the same rule keyed on the
//! angle.  `halt` passes immediately exactly once per halt episode, and
//! `idle` is never forwarded — it means "nothing to say this tick".

use rov_core::{Complex, RobotCommand, SimDuration, SimTime};

pub struct CommandThrottle {
    interval:    SimDuration,
    last_motion: Option<(RobotCommand, SimTime)>,
    last_scan:   Option<(Complex, SimTime)>,
    halted:      bool,
}

impl CommandThrottle {
    pub fn new(interval: SimDuration) -> Self {
        Self {
            interval,
            last_motion: None,
            last_scan: None,
            halted: false,
        }
    }

    /// `true` if `command` should be forwarded to the controller now.
    /// Forwarded commands update the internal pacing state.
    pub fn admit(&mut self, command: &RobotCommand, now: SimTime) -> bool {
        match command {
            RobotCommand::Idle => false,

            RobotCommand::Halt => {
                if self.halted {
                    return false;
                }
                self.halted = true;
                self.last_motion = None;
                true
            }

            RobotCommand::Move { .. } | RobotCommand::MoveFrontScan { .. } => {
                self.halted = false;
                if let Some((prev, at)) = &self.last_motion {
                    if prev == command && now.saturating_since(*at) < self.interval {
                        return false;
                    }
                }
                self.last_motion = Some((*command, now));
                true
            }

            RobotCommand::Scan(direction) => {
                if let Some((prev, at)) = &self.last_scan {
                    if prev == direction && now.saturating_since(*at) < self.interval {
                        return false;
                    }
                }
                self.last_scan = Some((*direction, now));
                true
            }
        }
    }
}
