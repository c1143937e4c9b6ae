//! `FindLabelNode` / `FindUnknownNode` — pure A\* planners over the sector
//! graph.
//!
//! Neither node moves the robot: they publish the planned polyline under
//! their `path` key and complete, leaving the walking to a `MovePathNode`
//! wired in by the flow (typically through a transition program that copies
//! the key across namespaces).

use rustc_hash::FxHashSet;

use rov_core::{AreaExpr, Point, RobotCommand};
use rov_plan::astar;
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct FindConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// A label counts as reached inside this radius, metres.
    pub distance: f64,
    /// Clearance each expanded cell must keep from obstacles, metres.
    pub safety_distance: f64,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            hooks:           NodeHooks::default(),
            distance:        0.5,
            safety_distance: 0.2,
        }
    }
}

// ── Shared planner core ───────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Goal {
    Labels,
    Unknown,
}

/// Route over walkable grid cells from the robot cell to the goal set.
fn plan(ctx: &ProcessorContext, cfg: &FindConfig, goal: Goal) -> Option<Vec<Point>> {
    let world = ctx.world();
    let radar = &world.radar;
    let topology = radar.topology();
    let start = topology.index_of(world.status.location)?;

    let goals: FxHashSet<usize> = match goal {
        Goal::Labels => {
            if world.markers.is_empty() {
                return None;
            }
            let disks = world
                .markers
                .iter()
                .map(|m| AreaExpr::circle(m.location, cfg.distance))
                .collect();
            topology
                .indices_by_area(&AreaExpr::or(disks))
                .into_iter()
                .collect()
        }
        Goal::Unknown => radar.unknown_contour().into_iter().collect(),
    };
    if goals.is_empty() {
        return None;
    }
    let goal_points: Vec<Point> = goals.iter().map(|&i| topology.point_at(i)).collect();

    let indices = astar(
        start,
        |i| goals.contains(i),
        |&i| radar.neighbour_indices(topology.point_at(i), cfg.safety_distance, |_| true),
        |&i, &j| topology.point_at(i).distance(topology.point_at(j)),
        |&i| {
            let p = topology.point_at(i);
            goal_points
                .iter()
                .map(|g| p.distance(*g))
                .fold(f64::INFINITY, f64::min)
        },
    )?;
    Some(indices.into_iter().map(|i| topology.point_at(i)).collect())
}

fn publish(
    base: &NodeBase,
    ctx: &mut ProcessorContext,
    path: Option<Vec<Point>>,
) -> StepResult {
    match path {
        Some(points) => {
            ctx.set_target(points.last().copied());
            ctx.put(base.key("path"), points);
            (ExitKey::Completed, RobotCommand::Halt)
        }
        None => {
            ctx.remove(&base.key("path"));
            (ExitKey::NotFound, RobotCommand::Halt)
        }
    }
}

// ── FindLabelNode ─────────────────────────────────────────────────────────────

pub struct FindLabelNode {
    base: NodeBase,
    cfg:  FindConfig,
}

impl FindLabelNode {
    pub fn new(id: impl Into<String>, cfg: FindConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg })
    }

    pub fn boxed(id: impl Into<String>, cfg: FindConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for FindLabelNode {
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
        let path = plan(ctx, &self.cfg, Goal::Labels);
        publish(&self.base, ctx, path)
    }
}

// ── FindUnknownNode ───────────────────────────────────────────────────────────

pub struct FindUnknownNode {
    base: NodeBase,
    cfg:  FindConfig,
}

impl FindUnknownNode {
    pub fn new(id: impl Into<String>, cfg: FindConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg })
    }

    pub fn boxed(id: impl Into<String>, cfg: FindConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for FindUnknownNode {
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
        let path = plan(ctx, &self.cfg, Goal::Unknown);
        publish(&self.base, ctx, path)
    }
}
