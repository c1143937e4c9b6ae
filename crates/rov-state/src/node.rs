//! The state-node contract and its shared base.
//!
//! Behaviour polymorphism goes through the [`StateNode`] trait; the concerns
//! every node shares — entry stamping, timeout, namespaced keys, declarative
//! hooks, the contact guard — live in [`NodeBase`], held by concrete nodes
//! as a field.

use std::fmt;

use rov_core::{RobotCommand, SimDuration, SimTime};
use rov_map::RobotStatus;

use crate::command::ProcCommand;
use crate::context::ProcessorContext;
use crate::error::{CommandError, StateResult};

// ── ExitKey ───────────────────────────────────────────────────────────────────

/// The closed set of results a `step` may report.  Transitions match on the
/// key's [`name`][ExitKey::name].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExitKey {
    /// Stay in the current state.
    None,
    Completed,
    Timeout,
    Blocked,
    FrontBlocked,
    RearBlocked,
    NotFound,
    Found,
}

impl ExitKey {
    /// The discriminant string trigger regexes match against.
    pub fn name(&self) -> &'static str {
        match self {
            ExitKey::None => "none",
            ExitKey::Completed => "completed",
            ExitKey::Timeout => "timeout",
            ExitKey::Blocked => "blocked",
            ExitKey::FrontBlocked => "front_blocked",
            ExitKey::RearBlocked => "rear_blocked",
            ExitKey::NotFound => "not_found",
            ExitKey::Found => "found",
        }
    }
}

impl fmt::Display for ExitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What one reaction produces: the exit key and the command to dispatch.
pub type StepResult = (ExitKey, RobotCommand);

// ── StateNode ─────────────────────────────────────────────────────────────────

/// One behaviour of the state machine.
///
/// Lifecycle: constructed once at flow build; `init` runs once at agent
/// start; `entry`/`exit` run when the machine enters/leaves the state;
/// `step` runs at every reaction while active.
///
/// `step` is total: recoverable conditions are encoded in the returned
/// [`ExitKey`], never raised.  Hook methods may fail with a
/// [`CommandError`] (a malformed declarative program); the agent surfaces
/// the error and keeps running.
pub trait StateNode: Send {
    fn id(&self) -> &str;

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError>;

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError>;

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError>;

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult;
}

// ── NodeHooks ─────────────────────────────────────────────────────────────────

/// The declarative options every node recognises, as delivered by the
/// configuration loader.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct NodeHooks {
    /// Step timeout in milliseconds; absent or zero disables it.
    pub timeout: Option<u64>,
    /// Micro-VM programs, one instruction per line.
    pub on_init:  Vec<String>,
    pub on_entry: Vec<String>,
    pub on_exit:  Vec<String>,
}

// ── NodeBase ──────────────────────────────────────────────────────────────────

/// The composition helper concrete nodes embed.
///
/// Owns the node id, the parsed (and key-prefixed) hook programs, and the
/// timeout.  The entry stamp lives in the context under
/// `"<id>.entry_time"` so declarative programs can read it too.
pub struct NodeBase {
    id:       String,
    timeout:  Option<SimDuration>,
    on_init:  Option<ProcCommand>,
    on_entry: Option<ProcCommand>,
    on_exit:  Option<ProcCommand>,
}

impl NodeBase {
    /// Parse the hook programs and prefix their keys with the node id.
    pub fn new(id: impl Into<String>, hooks: &NodeHooks) -> StateResult<Self> {
        let id = id.into();
        let parse = |lines: &[String]| -> StateResult<Option<ProcCommand>> {
            if lines.is_empty() {
                Ok(None)
            } else {
                Ok(Some(ProcCommand::parse(lines)?.prefixed(&id)))
            }
        };
        let on_init = parse(&hooks.on_init)?;
        let on_entry = parse(&hooks.on_entry)?;
        let on_exit = parse(&hooks.on_exit)?;
        Ok(Self {
            timeout: hooks.timeout.filter(|&ms| ms > 0).map(SimDuration::from_millis),
            on_init,
            on_entry,
            on_exit,
            id,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The context key `"<id>.<suffix>"`.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}.{suffix}", self.id)
    }

    // ── Hook execution ────────────────────────────────────────────────────

    pub fn run_init(&self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        match &self.on_init {
            Some(cmd) => cmd.execute(ctx),
            None => Ok(()),
        }
    }

    /// Stamp the entry time, then run the entry program.
    pub fn run_entry(&self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        ctx.put(self.key("entry_time"), ctx.simulation_time().0 as i64);
        match &self.on_entry {
            Some(cmd) => cmd.execute(ctx),
            None => Ok(()),
        }
    }

    pub fn run_exit(&self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        match &self.on_exit {
            Some(cmd) => cmd.execute(ctx),
            None => Ok(()),
        }
    }

    // ── Timing ────────────────────────────────────────────────────────────

    /// When the state was last entered (zero before the first entry).
    pub fn entry_time(&self, ctx: &ProcessorContext) -> SimTime {
        SimTime(ctx.get_int(&self.key("entry_time"), 0).max(0) as u64)
    }

    /// Time spent in the state so far.
    pub fn elapsed(&self, ctx: &ProcessorContext) -> SimDuration {
        ctx.simulation_time().saturating_since(self.entry_time(ctx))
    }

    /// `true` once the configured timeout is exceeded.
    pub fn timed_out(&self, ctx: &ProcessorContext) -> bool {
        match self.timeout {
            Some(timeout) => self.elapsed(ctx) >= timeout,
            None => false,
        }
    }

    // ── Guards ────────────────────────────────────────────────────────────

    /// The contact-sensor guard: a halt with the matching blocked exit, or
    /// `None` when both directions are clear.
    pub fn block_result(status: &RobotStatus) -> Option<StepResult> {
        match (status.can_move_forward, status.can_move_backward) {
            (false, false) => Some((ExitKey::Blocked, RobotCommand::Halt)),
            (false, true) => Some((ExitKey::FrontBlocked, RobotCommand::Halt)),
            (true, false) => Some((ExitKey::RearBlocked, RobotCommand::Halt)),
            (true, true) => None,
        }
    }

    /// The standard step preamble: timeout first, then contacts.  Nodes with
    /// their own escape logic (avoiding) skip the contact part.
    pub fn step_guard(&self, ctx: &ProcessorContext) -> Option<StepResult> {
        if self.timed_out(ctx) {
            return Some((ExitKey::Timeout, RobotCommand::Halt));
        }
        Self::block_result(&ctx.world().status)
    }
}
