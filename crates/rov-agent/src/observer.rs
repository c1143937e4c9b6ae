//! Observer callbacks for everything the agent publishes.

use rov_core::{Point, RobotCommand};
use rov_state::ExitKey;

use crate::error::AgentError;

/// Callbacks invoked by [`StateAgent`][crate::StateAgent] at key points of
/// each reaction.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  `on_command` reports every command a
/// step emits (including suppressed duplicates and `idle`); the controller
/// port only sees what survives the throttle.
pub trait AgentObserver {
    /// The exit key produced by the step just executed.
    fn on_exit(&mut self, _exit: ExitKey) {}

    /// The machine switched to the state with this id (also fired once for
    /// the entry state at start).
    fn on_state_changed(&mut self, _id: &str) {}

    /// The context target was (re)assigned; `None` clears the indicator.
    fn on_target_changed(&mut self, _target: Option<Point>) {}

    /// A command was emitted by the active state's step.
    fn on_command(&mut self, _command: &RobotCommand) {}

    /// A recoverable error was surfaced (runtime command failure or
    /// controller I/O); the dispatch loop keeps running.
    fn on_error(&mut self, _error: &AgentError) {}
}

/// An [`AgentObserver`] that ignores everything.
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}
