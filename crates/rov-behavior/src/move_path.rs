//! `MovePathNode` — walk an ordered sequence of waypoints.

use rov_core::{Complex, Point, RobotCommand};
use rov_map::WorldModel;
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

use crate::motion::{effective_distance, fuzzy_speed};

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct MovePathConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Fixed waypoint list; absent, the node reads its `"<id>.path"`
    /// context key at entry (filled by a planner node or a transition
    /// program).
    pub path: Option<Vec<(f64, f64)>>,
    /// A waypoint counts as reached inside this radius, metres.
    pub approach_distance: f64,
    /// Cruise speed, pulses per second.
    pub speed: i32,
    /// Tube half-width each leg must keep clear, metres.
    pub safety_distance: f64,
}

impl Default for MovePathConfig {
    fn default() -> Self {
        Self {
            hooks:             NodeHooks::default(),
            path:              None,
            approach_distance: 0.2,
            speed:             30,
            safety_distance:   0.2,
        }
    }
}

// ── PathWalk ──────────────────────────────────────────────────────────────────

/// The waypoint-advancing core shared with the search nodes.
pub(crate) struct PathWalk {
    path:  Vec<Point>,
    index: usize,
}

impl PathWalk {
    pub(crate) fn start(path: Vec<Point>) -> Self {
        Self { path, index: 0 }
    }

    /// One walking reaction: invalidate on an obstructed leg, advance
    /// through reached waypoints, otherwise move toward the current one.
    pub(crate) fn step(
        &mut self,
        world: &WorldModel,
        approach_distance: f64,
        safety_distance: f64,
        speed: i32,
    ) -> StepResult {
        let status = &world.status;
        loop {
            let Some(&waypoint) = self.path.get(self.index) else {
                return (ExitKey::Completed, RobotCommand::Halt);
            };
            if !world.radar.free_trajectory(status.location, waypoint, safety_distance) {
                // The map changed under the plan; the path is void.
                return (ExitKey::NotFound, RobotCommand::Halt);
            }
            if status.location.distance(waypoint) <= approach_distance {
                self.index += 1;
                continue;
            }
            let heading = Complex::direction(status.location, waypoint);
            let distance = effective_distance(status, heading, waypoint);
            let pps = fuzzy_speed(distance, approach_distance, speed);
            return (ExitKey::None, RobotCommand::Move { direction: heading, speed: pps });
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

pub struct MovePathNode {
    base: NodeBase,
    cfg:  MovePathConfig,
    walk: Option<PathWalk>,
}

impl MovePathNode {
    pub fn new(id: impl Into<String>, cfg: MovePathConfig) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg, walk: None })
    }

    pub fn boxed(id: impl Into<String>, cfg: MovePathConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for MovePathNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        let path: Option<Vec<Point>> = match &self.cfg.path {
            Some(points) => Some(points.iter().map(|&(x, y)| Point::new(x, y)).collect()),
            None => ctx.get_path(&self.base.key("path")).map(<[Point]>::to_vec),
        };
        self.walk = path.map(PathWalk::start);
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        match &mut self.walk {
            Some(walk) => walk.step(
                ctx.world(),
                self.cfg.approach_distance,
                self.cfg.safety_distance,
                self.cfg.speed,
            ),
            // No path was supplied at entry.
            None => (ExitKey::NotFound, RobotCommand::Halt),
        }
    }
}
