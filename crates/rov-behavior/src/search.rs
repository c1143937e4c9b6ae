//! `SearchMoveNode` — plan with the RRT at entry, then walk the result.
//!
//! Two recipes share the node: `label` routes toward the detected label
//! disks, `refresh` toward the empty cell whose observation is stalest.
//! Planning happens once, at entry: the pathfinder samples the radar-safe
//! grid under the configured budgets, the winning polyline is
//! shortcut-optimized and published under the node's `path` key, and the
//! remaining ticks walk it exactly like `MovePathNode`.  An exhausted budget
//! is not an error — the node reports `not_found` and clears the key.

use std::time::Duration;

use rov_core::{Point, RobotCommand};
use rov_plan::{GoalSet, GridSpace, RrtBudget, find_path};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

use crate::move_path::PathWalk;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Search radius for goal recipes, metres.
    pub max_distance: f64,
    /// A label counts as reached inside this radius, metres.
    pub distance: f64,
    /// Tube half-width for edge connectivity and walking, metres.
    pub safety_distance: f64,
    /// Maximum RRT edge length before grid snapping, metres.
    pub growth_distance: f64,
    /// RRT budgets.
    pub max_iterations: usize,
    pub min_goals: usize,
    /// Wall-clock cap on one search, milliseconds.
    pub max_search_time: u64,
    /// Sampling seed; a fixed seed reproduces the search exactly.
    pub seed: u64,
    /// Walking parameters.
    pub approach_distance: f64,
    pub speed: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hooks:             NodeHooks::default(),
            max_distance:      3.0,
            distance:          0.5,
            safety_distance:   0.2,
            growth_distance:   0.5,
            max_iterations:    300,
            min_goals:         1,
            max_search_time:   500,
            seed:              1234,
            approach_distance: 0.2,
            speed:             30,
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Recipe {
    Label,
    Refresh,
}

pub struct SearchMoveNode {
    base:   NodeBase,
    cfg:    SearchConfig,
    recipe: Recipe,
    walk:   Option<PathWalk>,
}

impl SearchMoveNode {
    /// Search-and-move toward the detected labels.
    pub fn label(id: impl Into<String>, cfg: SearchConfig) -> StateResult<Self> {
        Self::new(id, cfg, Recipe::Label)
    }

    /// Search-and-move toward the stalest mapped cell.
    pub fn refresh(id: impl Into<String>, cfg: SearchConfig) -> StateResult<Self> {
        Self::new(id, cfg, Recipe::Refresh)
    }

    pub fn label_boxed(
        id: impl Into<String>,
        cfg: SearchConfig,
    ) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::label(id, cfg)?))
    }

    pub fn refresh_boxed(
        id: impl Into<String>,
        cfg: SearchConfig,
    ) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::refresh(id, cfg)?))
    }

    fn new(id: impl Into<String>, cfg: SearchConfig, recipe: Recipe) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &cfg.hooks)?, cfg, recipe, walk: None })
    }

    /// Run the budgeted search against the latched radar snapshot.
    fn plan(&self, ctx: &ProcessorContext) -> Option<Vec<Point>> {
        let world = ctx.world();
        let status = &world.status;

        let goal = match self.recipe {
            Recipe::Label => GoalSet::labels(
                world.markers.iter().map(|m| m.location),
                self.cfg.distance,
                status.location,
                status.spec.contact_radius,
            ),
            Recipe::Refresh => {
                GoalSet::oldest_echo(&world.radar, status.location, self.cfg.max_distance)
            }
        };

        let space = GridSpace::new(
            &world.radar,
            goal,
            self.cfg.safety_distance,
            self.cfg.growth_distance,
            self.cfg.seed,
        );
        let budget = RrtBudget {
            max_iterations:  self.cfg.max_iterations,
            min_goals:       self.cfg.min_goals,
            max_search_time: Duration::from_millis(self.cfg.max_search_time),
        };
        let start = world
            .radar
            .topology()
            .snap(status.location)
            .unwrap_or(status.location);
        find_path(space, start, budget)
    }
}

impl StateNode for SearchMoveNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        match self.plan(ctx) {
            Some(path) => {
                ctx.put(self.base.key("path"), path.clone());
                ctx.set_target(path.last().copied());
                self.walk = Some(PathWalk::start(path));
            }
            None => {
                ctx.remove(&self.base.key("path"));
                self.walk = None;
            }
        }
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
            None => (ExitKey::NotFound, RobotCommand::Halt),
        }
    }
}
