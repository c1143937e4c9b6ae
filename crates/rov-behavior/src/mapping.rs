//! `MappingNode` — build the radar map by sweeping and turning in place.
//!
//! A three-stage micro-FSM inside one node: sweep the sensor from 0° to
//! +90° (`RightScan`), then 0° to −90° (`LeftScan`), then rotate the body by
//! `turn_angle` (`Turn`) and start over.  After a full 360° of accumulated
//! body rotation the node completes.  A detected label interrupts the cycle
//! with `found` at any stage.

use rov_core::{Complex, RobotCommand};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

/// Smallest sensor step of the sweep, degrees.
const MIN_TURN_DEG: f64 = 5.0;

/// Facing tolerance while turning the body, radians (10°).
const TURN_CLOSE_RAD: f64 = 10.0 * std::f64::consts::PI / 180.0;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Statuses to collect at each sweep stop before advancing.
    pub min_number_of_samples: usize,
    /// Body rotation per stage, degrees.
    pub turn_angle: f64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            hooks:                 NodeHooks::default(),
            min_number_of_samples: 3,
            turn_angle:            120.0,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
enum Phase {
    RightScan,
    LeftScan,
    Turn,
}

pub struct MappingNode {
    base:        NodeBase,
    cfg:         MappingConfig,
    phase:       Phase,
    scan_deg:    f64,
    samples:     usize,
    turned_deg:  f64,
    turn_target: Option<Complex>,
}

impl MappingNode {
    pub fn new(id: impl Into<String>, cfg: MappingConfig) -> StateResult<Self> {
        Ok(Self {
            base:        NodeBase::new(id, &cfg.hooks)?,
            cfg,
            phase:       Phase::RightScan,
            scan_deg:    0.0,
            samples:     0,
            turned_deg:  0.0,
            turn_target: None,
        })
    }

    pub fn boxed(id: impl Into<String>, cfg: MappingConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }

    /// Sensor step sized so adjacent stops overlap at the echo range: wide
    /// steps close by, finer steps for distant returns, never below
    /// `MIN_TURN_DEG`.
    fn scan_step_deg(&self, ctx: &ProcessorContext) -> f64 {
        let status = &ctx.world().status;
        let range = if status.echo_distance > 0.0 {
            status.echo_distance
        } else {
            status.spec.max_radar_distance
        };
        let grid = ctx.world().radar.topology().grid_size();
        (grid / range).atan().to_degrees().max(MIN_TURN_DEG)
    }
}

impl StateNode for MappingNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.phase = Phase::RightScan;
        self.scan_deg = 0.0;
        self.samples = 0;
        self.turned_deg = 0.0;
        self.turn_target = None;
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        if !ctx.world().markers.is_empty() {
            return (ExitKey::Found, RobotCommand::Halt);
        }

        match self.phase {
            Phase::RightScan | Phase::LeftScan => {
                self.samples += 1;
                if self.samples < self.cfg.min_number_of_samples {
                    // Hold the stop until enough samples are in.
                    return (ExitKey::None, RobotCommand::scan(Complex::from_deg(self.scan_deg)));
                }
                self.samples = 0;

                let step = self.scan_step_deg(ctx);
                match self.phase {
                    Phase::RightScan => {
                        let next = self.scan_deg + step;
                        if next > 90.0 {
                            self.phase = Phase::LeftScan;
                            self.scan_deg = 0.0;
                        } else {
                            self.scan_deg = next;
                        }
                    }
                    Phase::LeftScan => {
                        let next = self.scan_deg - step;
                        if next < -90.0 {
                            self.phase = Phase::Turn;
                            self.scan_deg = 0.0;
                            self.turn_target = Some(
                                ctx.world().status.direction
                                    + Complex::from_deg(self.cfg.turn_angle),
                            );
                        } else {
                            self.scan_deg = next;
                        }
                    }
                    Phase::Turn => unreachable!("outer match is on scan phases"),
                }
                (ExitKey::None, RobotCommand::scan(Complex::from_deg(self.scan_deg)))
            }

            Phase::Turn => {
                let current = ctx.world().status.direction;
                let target = self.turn_target.unwrap_or(current);
                if current.is_close_to(target, TURN_CLOSE_RAD) {
                    self.turned_deg += self.cfg.turn_angle;
                    self.turn_target = None;
                    if self.turned_deg >= 360.0 {
                        return (ExitKey::Completed, RobotCommand::Halt);
                    }
                    self.phase = Phase::RightScan;
                    self.scan_deg = 0.0;
                    return (ExitKey::None, RobotCommand::scan(Complex::ZERO));
                }
                // Rotate in place toward the stage target.
                (ExitKey::None, RobotCommand::Move { direction: target, speed: 0 })
            }
        }
    }
}
