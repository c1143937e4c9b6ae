//! The target-chooser nodes.
//!
//! Each picks the next point of interest, publishes it under its own
//! `"<id>.target"` key *and* through [`ProcessorContext::set_target`] (the
//! UI indicator), then completes.  A `MoveToNode` downstream picks the
//! point up through a transition program.

use rov_core::{Complex, Point, RobotCommand};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

// ── ExploringPoint ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct ExploringPointConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Clearance a frontier cell must keep from obstacles, metres.
    pub safety_distance: f64,
    /// Frontier cells farther than this are ignored, metres.
    pub max_distance: f64,
}

impl Default for ExploringPointConfig {
    fn default() -> Self {
        Self {
            hooks:           NodeHooks::default(),
            safety_distance: 0.2,
            max_distance:    3.0,
        }
    }
}

/// Choose the farthest safe cell on the unknown frontier — the most
/// map-expanding place the robot can reach.
pub struct ExploringPointNode {
    base: NodeBase,
    cfg:  ExploringPointConfig,
}

impl ExploringPointNode {
    pub fn new(id: impl Into<String>, cfg: ExploringPointConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg })
    }

    pub fn boxed(
        id: impl Into<String>,
        cfg: ExploringPointConfig,
    ) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for ExploringPointNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
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
        let radar = &world.radar;
        let robot = world.status.location;

        let chosen = radar
            .unknown_contour()
            .into_iter()
            .map(|i| (i, radar.topology().point_at(i)))
            .filter(|&(_, p)| robot.distance(p) <= self.cfg.max_distance)
            .filter(|&(_, p)| radar.is_safe(p, self.cfg.safety_distance))
            .max_by(|&(i, p), &(j, q)| {
                robot
                    .distance(p)
                    .total_cmp(&robot.distance(q))
                    .then(j.cmp(&i))
            })
            .map(|(_, p)| p);

        publish_target(&self.base, ctx, chosen)
    }
}

// ── LabelPoint ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct LabelPointConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Stand-off from the label, metres.
    pub safe_distance: f64,
    /// Extra margin on top of the stand-off, metres.
    pub margin: f64,
    /// Labels farther than this are out of play, metres.
    pub max_distance: f64,
}

impl Default for LabelPointConfig {
    fn default() -> Self {
        Self {
            hooks:         NodeHooks::default(),
            safe_distance: 0.5,
            margin:        0.1,
            max_distance:  3.0,
        }
    }
}

/// Choose the approach point short of the nearest label: on the robot's
/// side of it, `safe_distance + margin` away.
pub struct LabelPointNode {
    base: NodeBase,
    cfg:  LabelPointConfig,
}

impl LabelPointNode {
    pub fn new(id: impl Into<String>, cfg: LabelPointConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg })
    }

    pub fn boxed(id: impl Into<String>, cfg: LabelPointConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for LabelPointNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
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
        let robot = world.status.location;

        let chosen = world
            .nearest_marker(robot)
            .filter(|m| robot.distance(m.location) <= self.cfg.max_distance)
            .map(|m| {
                let toward_robot = Complex::direction(m.location, robot);
                m.location
                    .translate(toward_robot, self.cfg.safe_distance + self.cfg.margin)
            });

        publish_target(&self.base, ctx, chosen)
    }
}

// ── CautiousPoint ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct CautiousPointConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Sector weight cap for the centroid, metres.
    pub max_distance: f64,
}

impl Default for CautiousPointConfig {
    fn default() -> Self {
        Self {
            hooks:        NodeHooks::default(),
            max_distance: 3.0,
        }
    }
}

/// Choose the polar map's safe centroid — the middle of the observed free
/// space around the robot.
pub struct CautiousPointNode {
    base: NodeBase,
    cfg:  CautiousPointConfig,
}

impl CautiousPointNode {
    pub fn new(id: impl Into<String>, cfg: CautiousPointConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg })
    }

    pub fn boxed(
        id: impl Into<String>,
        cfg: CautiousPointConfig,
    ) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for CautiousPointNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        let chosen = ctx
            .world()
            .polar
            .as_ref()
            .and_then(|polar| polar.safe_centroid(self.cfg.max_distance));
        publish_target(&self.base, ctx, chosen)
    }
}

// ── Shared publication ────────────────────────────────────────────────────────

fn publish_target(
    base: &NodeBase,
    ctx: &mut ProcessorContext,
    target: Option<Point>,
) -> StepResult {
    match target {
        Some(point) => {
            ctx.put(base.key("target"), point);
            ctx.set_target(Some(point));
            (ExitKey::Completed, RobotCommand::Halt)
        }
        None => {
            ctx.remove(&base.key("target"));
            ctx.set_target(None);
            (ExitKey::NotFound, RobotCommand::Halt)
        }
    }
}
