//! `AvoidingNode` — escape a contact, radar-assisted.
//!
//! When a bumper reports a block the node records the contact pose and backs
//! away along the blocked direction.  Once the bumper clears but the robot
//! is still inside `safe_distance` of the contact point, it asks the radar
//! for a safe point in the escape direction and steers toward it; with no
//! safe point in view it keeps moving along the raw escape vector.  Reaching
//! `safe_distance` completes the escape.
//!
//! This is the one node that overrides the shared contact guard: a block is
//! its working condition, not a reason to halt.

use rov_core::{Complex, Point, RobotCommand};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct AvoidingConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Escape is complete at this distance from the contact point, metres.
    pub safe_distance: f64,
    /// How far the radar may place the escape target, metres.
    pub max_distance: f64,
    /// Escape speed, pulses per second (applied signed).
    pub speed: i32,
}

impl Default for AvoidingConfig {
    fn default() -> Self {
        Self {
            hooks:         NodeHooks::default(),
            safe_distance: 0.3,
            max_distance:  1.0,
            speed:         20,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// The contact being escaped from.
struct Contact {
    point:     Point,
    direction: Complex,
    front:     bool,
}

pub struct AvoidingNode {
    base:    NodeBase,
    cfg:     AvoidingConfig,
    contact: Option<Contact>,
}

impl AvoidingNode {
    pub fn new(id: impl Into<String>, cfg: AvoidingConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg, contact: None })
    }

    pub fn boxed(id: impl Into<String>, cfg: AvoidingConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }

    fn escape_command(&self, direction: Complex, front: bool) -> RobotCommand {
        if front {
            RobotCommand::Move { direction, speed: -self.cfg.speed }
        } else {
            RobotCommand::Move { direction, speed: self.cfg.speed }
        }
    }
}

impl StateNode for AvoidingNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.contact = None;
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if self.base.timed_out(ctx) {
            return (ExitKey::Timeout, RobotCommand::Halt);
        }
        let status = ctx.world().status.clone();

        // Contacts present: (re)record the contact and push away from it.
        if !status.can_move_forward && !status.can_move_backward {
            return (ExitKey::Blocked, RobotCommand::Halt);
        }
        if !status.can_move_forward {
            self.contact = Some(Contact {
                point:     status.location,
                direction: status.direction,
                front:     true,
            });
            return (ExitKey::None, self.escape_command(status.direction, true));
        }
        if !status.can_move_backward {
            self.contact = Some(Contact {
                point:     status.location,
                direction: status.direction,
                front:     false,
            });
            return (ExitKey::None, self.escape_command(status.direction, false));
        }

        // Contacts cleared: keep withdrawing until safe_distance is reached.
        let Some(contact) = &self.contact else {
            // Entered without any contact to escape from.
            return (ExitKey::Completed, RobotCommand::Halt);
        };
        if status.location.distance(contact.point) >= self.cfg.safe_distance {
            self.contact = None;
            return (ExitKey::Completed, RobotCommand::Halt);
        }

        let escape = if contact.front {
            contact.direction.opposite()
        } else {
            contact.direction
        };
        let target = ctx.world().radar.find_safe_target(
            status.location,
            escape,
            self.cfg.safe_distance,
            self.cfg.max_distance,
        );
        match target {
            Some(point) => {
                let toward = Complex::direction(status.location, point);
                if contact.front {
                    // Reversing: face away from the target and back into it.
                    (ExitKey::None, self.escape_command(toward.opposite(), true))
                } else {
                    (ExitKey::None, self.escape_command(toward, false))
                }
            }
            // No safe point in view: continue along the raw escape vector.
            None => (ExitKey::None, self.escape_command(contact.direction, contact.front)),
        }
    }
}
