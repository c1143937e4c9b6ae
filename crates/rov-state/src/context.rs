//! `ProcessorContext` — the mutable per-run state owned by the agent.

use rustc_hash::FxHashMap;

use rov_core::{Complex, Point, SimTime};
use rov_map::{PolarMap, WorldModel};

use crate::error::CommandError;
use crate::value::Value;

/// Key/value map, operand stack, world-model snapshot, pending target, and
/// the radar-clear hook.
///
/// The context is owned by the dispatch task; state nodes and micro-VM
/// programs mutate it only from within their (serialised) callbacks.  Target
/// and clear-map requests are buffered here and drained by the agent after
/// each step, which is how `target-changed` observations reach the outside
/// without the context knowing about observers.
pub struct ProcessorContext {
    values: FxHashMap<String, Value>,
    stack:  Vec<Value>,
    world:  WorldModel,
    target: Option<Point>,
    target_event:        bool,
    clear_map_requested: bool,
}

impl ProcessorContext {
    pub fn new(world: WorldModel) -> Self {
        Self {
            values: FxHashMap::default(),
            stack:  Vec::new(),
            world,
            target: None,
            target_event:        false,
            clear_map_requested: false,
        }
    }

    // ── World model ───────────────────────────────────────────────────────

    #[inline]
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Latch a fresh world-model snapshot for the upcoming inference.
    pub fn set_world(&mut self, world: WorldModel) {
        self.world = world;
    }

    /// Attach the polar map derived for this inference.
    pub fn set_polar(&mut self, polar: PolarMap) {
        self.world.polar = Some(polar);
    }

    /// Simulation time of the latched status.
    #[inline]
    pub fn simulation_time(&self) -> SimTime {
        self.world.time()
    }

    // ── Key/value store ───────────────────────────────────────────────────

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Numeric read with the widening rule; missing or non-numeric keys
    /// yield `default`.
    pub fn get_num(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(Value::as_num).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(Value::as_int).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn get_pos(&self, key: &str) -> Option<Point> {
        self.get(key).and_then(Value::as_pos)
    }

    pub fn get_dir(&self, key: &str) -> Option<Complex> {
        self.get(key).and_then(Value::as_dir)
    }

    pub fn get_path(&self, key: &str) -> Option<&[Point]> {
        self.get(key).and_then(Value::as_path)
    }

    // ── Operand stack ─────────────────────────────────────────────────────

    pub fn push(&mut self, value: impl Into<Value>) {
        self.stack.push(value.into());
    }

    pub fn pop(&mut self) -> Result<Value, CommandError> {
        self.stack.pop().ok_or(CommandError::StackUnderflow)
    }

    /// Pop with the numeric widening rule.
    pub fn pop_num(&mut self) -> Result<f64, CommandError> {
        let v = self.pop()?;
        v.as_num().ok_or(CommandError::NotANumber(v.type_name()))
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.last()
    }

    #[inline]
    pub fn stack_size(&self) -> usize {
        self.stack.len()
    }

    /// Drop all operands (used to leave a clean stack behind a failed
    /// program).
    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    // ── Target & map hooks ────────────────────────────────────────────────

    /// Assign (or clear, with `None`) the pending target point.  Every
    /// assignment raises a target-changed event for the agent to publish.
    pub fn set_target(&mut self, target: Option<Point>) {
        self.target = target;
        self.target_event = true;
    }

    #[inline]
    pub fn target(&self) -> Option<Point> {
        self.target
    }

    /// Drain the target-changed event, if one was raised since the last
    /// drain.  Yields the current target.
    pub fn take_target_event(&mut self) -> Option<Option<Point>> {
        if self.target_event {
            self.target_event = false;
            Some(self.target)
        } else {
            None
        }
    }

    /// Ask the agent to wipe the radar map after this step.
    pub fn clear_map(&mut self) {
        self.clear_map_requested = true;
    }

    /// Drain the pending clear-map request.
    pub fn take_clear_map_request(&mut self) -> bool {
        std::mem::take(&mut self.clear_map_requested)
    }
}
