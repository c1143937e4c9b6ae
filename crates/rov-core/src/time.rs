//! Simulation time model.
//!
//! # Design
//!
//! The whole behaviour core runs on a single clock: **simulation time**, in
//! integer milliseconds, as reported by the robot's status messages.  Other
//! time bases that appear on the wire (proxy time, robot wall time) are
//! carried through the status snapshot but never used for ordering — radar
//! cell stamps, state timeouts and command throttling all compare
//! `SimTime`s.
//!
//! Status replays may repeat or slightly decrease the reported time, so
//! elapsed arithmetic saturates instead of underflowing.

use std::fmt;
use std::ops::Add;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulation timestamp, in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Milliseconds elapsed from `earlier` to `self`; zero if `earlier` is
    /// in the future (replayed statuses must not underflow).
    #[inline]
    pub fn saturating_since(self, earlier: SimTime) -> SimDuration {
        SimDuration(self.0.saturating_sub(earlier.0))
    }
}

impl Add<SimDuration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimDuration) -> SimTime {
        SimTime(self.0 + rhs.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}ms", self.0)
    }
}

// ── SimDuration ───────────────────────────────────────────────────────────────

/// A span of simulation time, in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimDuration(pub u64);

impl SimDuration {
    pub const ZERO: SimDuration = SimDuration(0);

    #[inline]
    pub fn from_millis(ms: u64) -> Self {
        SimDuration(ms)
    }

    #[inline]
    pub fn from_secs(secs: u64) -> Self {
        SimDuration(secs * 1_000)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SimDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
