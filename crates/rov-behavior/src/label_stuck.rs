//! `LabelStuckNode` — approach and hold position at the nearest label.
//!
//! The hold band uses hysteresis: a correction starts only when the range
//! error exceeds `FAR_GAP` and continues until it is back inside
//! `NEAR_GAP`, so the robot settles instead of hunting around the set
//! distance.

use rov_core::{Complex, RobotCommand};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

/// Stop correcting once the range error is inside this, metres.
const NEAR_GAP: f64 = 0.1;

/// Start correcting once the range error exceeds this, metres.
const FAR_GAP: f64 = 0.2;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct LabelStuckConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Hold distance from the label, metres.
    pub distance: f64,
    /// Facing tolerance, degrees.
    pub direction_range: f64,
    /// Labels farther than this are out of play, metres.
    pub max_distance: f64,
    /// Correction speed, pulses per second (applied signed).
    pub speed: i32,
}

impl Default for LabelStuckConfig {
    fn default() -> Self {
        Self {
            hooks:           NodeHooks::default(),
            distance:        0.8,
            direction_range: 10.0,
            max_distance:    3.0,
            speed:           20,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

pub struct LabelStuckNode {
    base:       NodeBase,
    cfg:        LabelStuckConfig,
    correcting: bool,
}

impl LabelStuckNode {
    pub fn new(id: impl Into<String>, cfg: LabelStuckConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg, correcting: false })
    }

    pub fn boxed(id: impl Into<String>, cfg: LabelStuckConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for LabelStuckNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.correcting = false;
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        let world = ctx.world();
        let status = &world.status;

        let label = world
            .nearest_marker(status.location)
            .filter(|m| status.location.distance(m.location) <= self.cfg.max_distance);
        let Some(label) = label else {
            return (ExitKey::NotFound, RobotCommand::Halt);
        };

        let range = status.location.distance(label.location);
        let heading = Complex::direction(status.location, label.location);
        let error = range - self.cfg.distance;

        if self.correcting && error.abs() <= NEAR_GAP {
            self.correcting = false;
        } else if !self.correcting && error.abs() > FAR_GAP {
            self.correcting = true;
        }

        if self.correcting {
            // Too close backs off, too far advances; always facing the label.
            let speed = if error < 0.0 { -self.cfg.speed } else { self.cfg.speed };
            return (ExitKey::None, RobotCommand::Move { direction: heading, speed });
        }
        if !status.direction.is_close_to(heading, self.cfg.direction_range.to_radians()) {
            return (ExitKey::None, RobotCommand::Move { direction: heading, speed: 0 });
        }
        (ExitKey::None, RobotCommand::Idle)
    }
}
