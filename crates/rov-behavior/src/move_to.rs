//! `MoveToNode` — reach a target point, optionally with a final facing.

use rov_core::{Complex, Point, RobotCommand};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

use crate::motion::{effective_distance, fuzzy_speed};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct MoveToConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Fixed target `(x, y)` in metres; absent, the node reads its
    /// `"<id>.target"` context key at entry (set by a chooser node or a
    /// transition program).
    pub target: Option<(f64, f64)>,
    /// Desired final facing in degrees; absent, any facing completes.
    pub direction: Option<f64>,
    /// Facing tolerance, degrees.
    pub direction_range: f64,
    /// The target counts as reached inside this radius, metres.
    pub stop_distance: f64,
    /// Cruise speed, pulses per second.
    pub max_speed: i32,
}

impl Default for MoveToConfig {
    fn default() -> Self {
        Self {
            hooks:           NodeHooks::default(),
            target:          None,
            direction:       None,
            direction_range: 15.0,
            stop_distance:   0.1,
            max_speed:       40,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

pub struct MoveToNode {
    base:   NodeBase,
    cfg:    MoveToConfig,
    target: Option<Point>,
}

impl MoveToNode {
    pub fn new(id: impl Into<String>, cfg: MoveToConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg, target: None })
    }

    pub fn boxed(id: impl Into<String>, cfg: MoveToConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for MoveToNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.target = self
            .cfg
            .target
            .map(|(x, y)| Point::new(x, y))
            .or_else(|| ctx.get_pos(&self.base.key("target")));
        ctx.set_target(self.target);
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        let Some(target) = self.target else {
            return (ExitKey::NotFound, RobotCommand::Halt);
        };
        let status = &ctx.world().status;

        if status.location.distance(target) <= self.cfg.stop_distance {
            // Arrived; settle the final facing if one is requested.
            let Some(deg) = self.cfg.direction else {
                return (ExitKey::Completed, RobotCommand::Halt);
            };
            let want = Complex::from_deg(deg);
            if status.direction.is_close_to(want, self.cfg.direction_range.to_radians()) {
                return (ExitKey::Completed, RobotCommand::Halt);
            }
            return (ExitKey::None, RobotCommand::Move { direction: want, speed: 0 });
        }

        let heading = Complex::direction(status.location, target);
        let distance = effective_distance(status, heading, target);
        let speed = fuzzy_speed(distance, self.cfg.stop_distance, self.cfg.max_speed);
        (ExitKey::None, RobotCommand::Move { direction: heading, speed })
    }
}
