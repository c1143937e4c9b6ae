//! `StateAgent` — drives the flow against the controller's event stream.

use tracing::warn;

use rov_core::{Complex, Point, SimDuration, SimTime};
use rov_map::{LabelMarker, PolarMap, RadarMap, RobotSpec, RobotStatus, WorldModel};
use rov_state::{CommandError, ExitKey, ProcessorContext, StateFlow};

use crate::controller::RobotController;
use crate::error::{AgentError, AgentResult};
use crate::observer::AgentObserver;
use crate::throttle::CommandThrottle;

// ── Config ────────────────────────────────────────────────────────────────────

/// Agent-level timing and derivation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentConfig {
    /// Minimum simulated time between reactions, milliseconds.
    pub reaction_interval: u64,
    /// Keep-alive period for identical commands, milliseconds.
    pub command_interval: u64,
    /// Polar map resolution.
    pub polar_sectors: usize,
    /// Polar scan band, metres.
    pub min_polar_distance: f64,
    pub max_polar_distance: f64,
    /// Radar observations older than this decay to unknown at latch;
    /// `None` keeps them forever.
    pub echo_persistence: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            reaction_interval:  100,
            command_interval:   500,
            polar_sectors:      24,
            min_polar_distance: 0.3,
            max_polar_distance: 3.0,
            echo_persistence:   None,
        }
    }
}

// ── StateAgent ────────────────────────────────────────────────────────────────

/// Owns the flow, the context, the live radar map and the throttle, and
/// turns incoming statuses into at most one reaction each.
///
/// All handlers run on the caller's task; nothing here is shared across
/// threads.  The controller is the only outward-facing sink.
pub struct StateAgent<C: RobotController> {
    cfg:        AgentConfig,
    flow:       StateFlow,
    context:    ProcessorContext,
    radar:      RadarMap,
    markers:    Vec<LabelMarker>,
    throttle:   CommandThrottle,
    controller: C,
    current:       usize,
    last_reaction: SimTime,
    started:       bool,
    shut_down:     bool,
}

impl<C: RobotController> StateAgent<C> {
    /// Assemble an agent around a validated flow.  No hooks run until
    /// [`start`][Self::start].
    pub fn new(flow: StateFlow, radar: RadarMap, cfg: AgentConfig, controller: C) -> Self {
        // A placeholder world model until the first status arrives; replaced
        // at start() before any hook can observe it.
        let world = WorldModel::new(
            RobotStatus {
                time:              SimTime::ZERO,
                location:          Point::ORIGIN,
                direction:         Complex::ZERO,
                sensor_direction:  Complex::ZERO,
                echo_distance:     0.0,
                can_move_forward:  true,
                can_move_backward: true,
                proxy_time:        SimTime::ZERO,
                spec:              RobotSpec::default(),
            },
            radar.clone(),
            Vec::new(),
        );
        let current = flow.entry_index();
        let throttle = CommandThrottle::new(SimDuration::from_millis(cfg.command_interval));
        Self {
            cfg,
            flow,
            context: ProcessorContext::new(world),
            radar,
            markers: Vec::new(),
            throttle,
            controller,
            current,
            last_reaction: SimTime::ZERO,
            started: false,
            shut_down: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn current_state_id(&self) -> &str {
        self.flow.node(self.current).id()
    }

    pub fn context(&self) -> &ProcessorContext {
        &self.context
    }

    pub fn radar(&self) -> &RadarMap {
        &self.radar
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Replace the detected-label set (supplied by the upstream perception
    /// stage); picked up at the next latch.
    pub fn set_markers(&mut self, markers: Vec<LabelMarker>) {
        self.markers = markers;
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start the agent on the first received status: starts the controller,
    /// runs the flow and node init hooks, enters the entry state, and
    /// performs the first reaction.
    pub fn start(
        &mut self,
        status: RobotStatus,
        observer: &mut impl AgentObserver,
    ) -> AgentResult<()> {
        if self.started {
            warn!("start called twice; ignored");
            return Ok(());
        }
        self.controller.start()?;
        self.started = true;

        self.radar.update(&status.ping());
        self.latch(&status);

        if let Some(cmd) = self.flow.on_init().cloned() {
            let result = cmd.execute(&mut self.context);
            self.surface(result, observer);
        }
        for i in 0..self.flow.node_count() {
            let result = self.flow.node_mut(i).init(&mut self.context);
            self.surface(result, observer);
        }

        self.current = self.flow.entry_index();
        let result = self.flow.node_mut(self.current).entry(&mut self.context);
        self.surface(result, observer);
        observer.on_state_changed(self.current_state_id());

        self.last_reaction = status.time;
        self.infer(&status, observer);
        Ok(())
    }

    /// Stop ingress and run the current state's exit hook.  No further step
    /// runs after this.
    pub fn shutdown(&mut self, observer: &mut impl AgentObserver) {
        if !self.started || self.shut_down {
            return;
        }
        self.shut_down = true;
        let result = self.flow.node_mut(self.current).exit(&mut self.context);
        self.surface(result, observer);
        if let Err(e) = self.controller.shutdown() {
            observer.on_error(&e);
        }
    }

    // ── Event ingress ─────────────────────────────────────────────────────

    /// Feed one status message: the radar absorbs it immediately, and when
    /// `reaction_interval` has elapsed a latch + inference follows.
    pub fn on_status(&mut self, status: RobotStatus, observer: &mut impl AgentObserver) {
        if !self.started || self.shut_down {
            return;
        }
        self.radar.update(&status.ping());

        let elapsed = status.time.saturating_since(self.last_reaction);
        if elapsed >= SimDuration::from_millis(self.cfg.reaction_interval) {
            self.last_reaction = status.time;
            self.latch(&status);
            self.infer(&status, observer);
        }
    }

    // ── Latch & inference ─────────────────────────────────────────────────

    /// Snapshot status + radar + markers into the context.
    fn latch(&mut self, status: &RobotStatus) {
        if let Some(ms) = self.cfg.echo_persistence {
            self.radar.decay(status.time, SimDuration::from_millis(ms));
        }
        self.context.set_world(WorldModel::new(
            status.clone(),
            self.radar.clone(),
            self.markers.clone(),
        ));
    }

    /// Run one reaction step against the latched world model.
    fn infer(&mut self, status: &RobotStatus, observer: &mut impl AgentObserver) {
        let polar = PolarMap::from_radar(
            &self.context.world().radar,
            status.location,
            self.cfg.min_polar_distance,
            self.cfg.max_polar_distance,
            self.cfg.polar_sectors,
        );
        self.context.set_polar(polar);

        let (exit, command) = self.flow.node_mut(self.current).step(&mut self.context);

        observer.on_command(&command);
        if self.throttle.admit(&command, status.time) {
            if let Err(e) = self.controller.execute(&command) {
                warn!(%command, "controller rejected command: {e}");
                observer.on_error(&e);
            }
        }

        if let Some(target) = self.context.take_target_event() {
            observer.on_target_changed(target);
        }
        if self.context.take_clear_map_request() {
            self.radar.clean();
        }

        observer.on_exit(exit);
        if exit != ExitKey::None {
            self.transition(exit, observer);
        }
    }

    /// Follow the first matching transition, running exit → on-transition →
    /// entry hooks in order.
    fn transition(&mut self, exit: ExitKey, observer: &mut impl AgentObserver) {
        let from = self.current_state_id().to_string();
        let Some(t) = self.flow.find_transition(&from, exit) else {
            warn!(state = %from, %exit, "no transition matches; staying");
            return;
        };
        let to = self
            .flow
            .node_index(&t.to)
            .expect("transition endpoints validated at flow construction");
        let on_transition = t.on_transition().cloned();

        let result = self.flow.node_mut(self.current).exit(&mut self.context);
        self.surface(result, observer);
        if let Some(cmd) = on_transition {
            let result = cmd.execute(&mut self.context);
            self.surface(result, observer);
        }

        self.current = to;
        let result = self.flow.node_mut(self.current).entry(&mut self.context);
        self.surface(result, observer);
        observer.on_state_changed(self.current_state_id());
    }

    /// Report a hook failure on the errors stream; never aborts the loop.
    fn surface(&self, result: Result<(), CommandError>, observer: &mut impl AgentObserver) {
        if let Err(e) = result {
            warn!("micro-command failed: {e}");
            observer.on_error(&AgentError::State(e.into()));
        }
    }
}
