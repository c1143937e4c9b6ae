//! `HaltNode` — stand still, optionally sweeping the sensor.

use rov_core::{Complex, RobotCommand, SimDuration, SimTime};
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

// ── Config ────────────────────────────────────────────────────────────────────

/// Halt options; all optional with defaults.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct HaltConfig {
    #[serde(flatten)]
    pub hooks: NodeHooks,
    /// Auto-scan period in milliseconds; `0` keeps the sensor still.
    pub scan_interval: u64,
    /// Sweep bounds, degrees.
    pub min_sensor_dir: f64,
    pub max_sensor_dir: f64,
    /// Number of sweep stops between the bounds.
    pub sensor_dir_number: usize,
}

impl Default for HaltConfig {
    fn default() -> Self {
        Self {
            hooks:             NodeHooks::default(),
            scan_interval:     0,
            min_sensor_dir:    -90.0,
            max_sensor_dir:    90.0,
            sensor_dir_number: 9,
        }
    }
}

// ── Sweep ─────────────────────────────────────────────────────────────────────

/// The reflective sweep: an index oscillating in `[0, 2(N−1))` mapped
/// linearly onto `[min, max]`.  The exact mapping fixes the coverage
/// pattern, so keep it stable.
pub(crate) struct ScanSweep {
    min_deg: f64,
    max_deg: f64,
    stops:   usize,
    index:   usize,
}

impl ScanSweep {
    pub(crate) fn new(min_deg: f64, max_deg: f64, stops: usize) -> Self {
        Self { min_deg, max_deg, stops, index: 0 }
    }

    pub(crate) fn reset(&mut self) {
        self.index = 0;
    }

    /// The current stop's direction, advancing the oscillating index.
    pub(crate) fn next_direction(&mut self) -> Complex {
        if self.stops < 2 {
            return Complex::from_deg((self.min_deg + self.max_deg) * 0.5);
        }
        let period = 2 * (self.stops - 1);
        let reflected = if self.index < self.stops {
            self.index
        } else {
            period - self.index
        };
        self.index = (self.index + 1) % period;

        let t = reflected as f64 / (self.stops - 1) as f64;
        Complex::from_deg(self.min_deg + (self.max_deg - self.min_deg) * t)
    }
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// Stay put; on timeout report it, on contacts report the block, otherwise
/// keep the sensor sweeping at the configured cadence.
pub struct HaltNode {
    base:      NodeBase,
    cfg:       HaltConfig,
    sweep:     ScanSweep,
    last_scan: Option<SimTime>,
}

impl HaltNode {
    pub fn new(id: impl Into<String>, cfg: HaltConfig) -> StateResult<Self> {
        let base = NodeBase::new(id, &cfg.hooks)?;
        let sweep = ScanSweep::new(cfg.min_sensor_dir, cfg.max_sensor_dir, cfg.sensor_dir_number);
        Ok(Self { base, cfg, sweep, last_scan: None })
    }

    pub fn boxed(id: impl Into<String>, cfg: HaltConfig) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, cfg)?))
    }
}

impl StateNode for HaltNode {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn init(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_init(ctx)
    }

    fn entry(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.sweep.reset();
        self.last_scan = None;
        self.base.run_entry(ctx)
    }

    fn exit(&mut self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        self.base.run_exit(ctx)
    }

    fn step(&mut self, ctx: &mut ProcessorContext) -> StepResult {
        if let Some(guard) = self.base.step_guard(ctx) {
            return guard;
        }
        if self.cfg.scan_interval > 0 {
            let now = ctx.simulation_time();
            let due = match self.last_scan {
                Some(last) => {
                    now.saturating_since(last) >= SimDuration::from_millis(self.cfg.scan_interval)
                }
                None => true,
            };
            if due {
                self.last_scan = Some(now);
                return (ExitKey::None, RobotCommand::scan(self.sweep.next_direction()));
            }
        }
        (ExitKey::None, RobotCommand::Halt)
    }
}
