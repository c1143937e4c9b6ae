//! Unit tests for rov-state.

use rov_core::{Complex, GridTopology, Point, RobotCommand, SimTime};
use rov_map::{RadarMap, RobotSpec, RobotStatus, WorldModel};

use crate::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcCommand, ProcessorContext, StateError,
    StateFlow, StateNode, StateTransition, StepResult, Value,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn status(time: u64) -> RobotStatus {
    RobotStatus {
        time:              SimTime(time),
        location:          Point::ORIGIN,
        direction:         Complex::ZERO,
        sensor_direction:  Complex::ZERO,
        echo_distance:     0.0,
        can_move_forward:  true,
        can_move_backward: true,
        proxy_time:        SimTime(time),
        spec:              RobotSpec::default(),
    }
}

fn world(time: u64) -> WorldModel {
    let topology = GridTopology::centered(Point::ORIGIN, 0.2, 11, 11).unwrap();
    WorldModel::new(status(time), RadarMap::new(topology), Vec::new())
}

fn context(time: u64) -> ProcessorContext {
    ProcessorContext::new(world(time))
}

/// The smallest possible node: defers everything to its base and always
/// stays put.
struct IdleNode {
    base: NodeBase,
}

impl IdleNode {
    fn boxed(id: &str) -> Box<dyn StateNode> {
        Box::new(IdleNode { base: NodeBase::new(id, &NodeHooks::default()).unwrap() })
    }
}

impl StateNode for IdleNode {
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
        (ExitKey::None, RobotCommand::Halt)
    }
}

// ── Value ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn numeric_widening() {
        assert_eq!(Value::Int(3).as_num(), Some(3.0));
        assert_eq!(Value::Num(2.5).as_int(), Some(2));
        assert_eq!(Value::Text("3".into()).as_num(), None);
    }

    #[test]
    fn typed_accessors_reject_other_variants() {
        let v = Value::Pos(Point::new(1.0, 2.0));
        assert_eq!(v.as_pos(), Some(Point::new(1.0, 2.0)));
        assert_eq!(v.as_dir(), None);
        assert_eq!(v.as_bool(), None);
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(1.5), Value::Num(1.5));
        assert_eq!(Value::from("x"), Value::Text("x".into()));
        assert_eq!(Value::from(vec![Point::ORIGIN]), Value::Path(vec![Point::ORIGIN]));
    }
}

// ── ProcessorContext ──────────────────────────────────────────────────────────

#[cfg(test)]
mod context_tests {
    use super::*;

    #[test]
    fn typed_reads_with_defaults() {
        let mut ctx = context(0);
        ctx.put("a", 2i64);
        assert_eq!(ctx.get_num("a", 0.0), 2.0);
        assert_eq!(ctx.get_num("missing", 7.5), 7.5);
        ctx.put("flag", true);
        assert!(ctx.get_bool("flag", false));
        // Non-numeric values fall back to the default.
        ctx.put("label", "north");
        assert_eq!(ctx.get_int("label", -1), -1);
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut ctx = context(0);
        assert_eq!(ctx.pop(), Err(CommandError::StackUnderflow));
    }

    #[test]
    fn stack_order() {
        let mut ctx = context(0);
        ctx.push(1i64);
        ctx.push(2i64);
        assert_eq!(ctx.stack_size(), 2);
        assert_eq!(ctx.pop().unwrap(), Value::Int(2));
        assert_eq!(ctx.peek(), Some(&Value::Int(1)));
    }

    #[test]
    fn target_events_drain_once() {
        let mut ctx = context(0);
        assert_eq!(ctx.take_target_event(), None);
        ctx.set_target(Some(Point::new(1.0, 1.0)));
        assert_eq!(ctx.take_target_event(), Some(Some(Point::new(1.0, 1.0))));
        assert_eq!(ctx.take_target_event(), None);
        // Clearing the target is also an event (drops the UI indicator).
        ctx.set_target(None);
        assert_eq!(ctx.take_target_event(), Some(None));
    }

    #[test]
    fn clear_map_request_drains_once() {
        let mut ctx = context(0);
        assert!(!ctx.take_clear_map_request());
        ctx.clear_map();
        assert!(ctx.take_clear_map_request());
        assert!(!ctx.take_clear_map_request());
    }
}

// ── ProcCommand ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod command_tests {
    use super::*;

    fn parse(lines: &[&str]) -> ProcCommand {
        ProcCommand::parse(lines).unwrap()
    }

    #[test]
    fn parses_numbers_ops_and_literals() {
        let cmd = parse(&["3", "1.5", "add", "put x", "hello", "put tag"]);
        let mut ctx = context(0);
        cmd.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get_num("x", 0.0), 4.5);
        assert_eq!(ctx.get("tag"), Some(&Value::Text("hello".into())));
    }

    #[test]
    fn arithmetic_operand_order() {
        let cmd = parse(&["10", "4", "sub", "put d", "10", "4", "div", "put q"]);
        let mut ctx = context(0);
        cmd.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get_num("d", 0.0), 6.0);
        assert_eq!(ctx.get_num("q", 0.0), 2.5);
    }

    #[test]
    fn swap_and_neg() {
        let cmd = parse(&["1", "2", "swap", "put a", "put b", "5", "neg", "put n"]);
        let mut ctx = context(0);
        cmd.execute(&mut ctx).unwrap();
        // After swap the top is 1, stored into `a`; 2 goes into `b`.
        assert_eq!(ctx.get_num("a", 0.0), 1.0);
        assert_eq!(ctx.get_num("b", 0.0), 2.0);
        assert_eq!(ctx.get_num("n", 0.0), -5.0);
    }

    #[test]
    fn time_pushes_simulation_time() {
        let cmd = parse(&["time", "put now"]);
        let mut ctx = context(12_345);
        cmd.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get_int("now", 0), 12_345);
    }

    #[test]
    fn get_round_trips() {
        let cmd = parse(&["get src", "put dst"]);
        let mut ctx = context(0);
        ctx.put("src", 9i64);
        cmd.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get_int("dst", 0), 9);
    }

    #[test]
    fn missing_key_fails_and_clears_stack() {
        let cmd = parse(&["1", "get nope"]);
        let mut ctx = context(0);
        assert_eq!(
            cmd.execute(&mut ctx),
            Err(CommandError::MissingKey("nope".into()))
        );
        assert_eq!(ctx.stack_size(), 0);
    }

    #[test]
    fn arithmetic_on_non_number_fails() {
        let cmd = parse(&["oops", "1", "add"]);
        let mut ctx = context(0);
        assert_eq!(cmd.execute(&mut ctx), Err(CommandError::NotANumber("text")));
    }

    #[test]
    fn unbalanced_program_is_rejected() {
        let cmd = parse(&["1", "2"]);
        let mut ctx = context(0);
        assert_eq!(cmd.execute(&mut ctx), Err(CommandError::UnbalancedStack(2)));
        assert_eq!(ctx.stack_size(), 0);
    }

    #[test]
    fn keyless_get_is_a_config_error() {
        assert!(matches!(
            ProcCommand::parse(&["get"]),
            Err(StateError::Config(_))
        ));
        assert!(matches!(
            ProcCommand::parse(&["put"]),
            Err(StateError::Config(_))
        ));
    }

    #[test]
    fn prefixing_confines_keys_to_the_namespace() {
        let cmd = parse(&["7", "put x", "get x", "put y"]).prefixed("halt");
        let mut ctx = context(0);
        cmd.execute(&mut ctx).unwrap();
        assert_eq!(ctx.get_int("halt.x", 0), 7);
        assert_eq!(ctx.get_int("halt.y", 0), 7);
        assert_eq!(ctx.get("x"), None);
        assert_eq!(ctx.get("y"), None);
    }
}

// ── NodeBase ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod node_tests {
    use super::*;

    #[test]
    fn entry_stamp_and_elapsed() {
        let base = NodeBase::new("n", &NodeHooks::default()).unwrap();
        let mut ctx = context(1_000);
        base.run_entry(&mut ctx).unwrap();
        assert_eq!(base.entry_time(&ctx), SimTime(1_000));

        ctx.set_world(world(1_750));
        assert_eq!(base.elapsed(&ctx).as_millis(), 750);
    }

    #[test]
    fn timeout_observed_only_when_configured() {
        let hooks = NodeHooks { timeout: Some(500), ..Default::default() };
        let base = NodeBase::new("n", &hooks).unwrap();
        let mut ctx = context(0);
        base.run_entry(&mut ctx).unwrap();

        assert!(!base.timed_out(&ctx));
        ctx.set_world(world(499));
        assert!(!base.timed_out(&ctx));
        ctx.set_world(world(500));
        assert!(base.timed_out(&ctx));

        // Zero disables the timeout entirely.
        let disabled = NodeBase::new("m", &NodeHooks { timeout: Some(0), ..Default::default() })
            .unwrap();
        assert!(!disabled.timed_out(&ctx));
    }

    #[test]
    fn block_result_mapping() {
        let mut s = status(0);
        assert_eq!(NodeBase::block_result(&s), None);

        s.can_move_forward = false;
        assert_eq!(
            NodeBase::block_result(&s),
            Some((ExitKey::FrontBlocked, RobotCommand::Halt))
        );

        s.can_move_forward = true;
        s.can_move_backward = false;
        assert_eq!(
            NodeBase::block_result(&s),
            Some((ExitKey::RearBlocked, RobotCommand::Halt))
        );

        s.can_move_forward = false;
        assert_eq!(
            NodeBase::block_result(&s),
            Some((ExitKey::Blocked, RobotCommand::Halt))
        );
    }

    #[test]
    fn hook_programs_run_in_the_node_namespace() {
        let hooks = NodeHooks {
            on_entry: vec!["time".into(), "put mark".into()],
            ..Default::default()
        };
        let base = NodeBase::new("scan", &hooks).unwrap();
        let mut ctx = context(42);
        base.run_entry(&mut ctx).unwrap();
        assert_eq!(ctx.get_int("scan.mark", 0), 42);
        assert_eq!(ctx.get("mark"), None);
    }
}

// ── StateFlow ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod flow_tests {
    use super::*;

    fn transition(from: &str, trigger: &str, to: &str) -> StateTransition {
        StateTransition::new(from, trigger, to, &[] as &[&str]).unwrap()
    }

    #[test]
    fn validates_entry_and_endpoints() {
        let nodes = || vec![IdleNode::boxed("a"), IdleNode::boxed("b")];

        assert!(StateFlow::new("a", nodes(), vec![], None).is_ok());
        assert!(matches!(
            StateFlow::new("zzz", nodes(), vec![], None),
            Err(StateError::Config(_))
        ));
        assert!(matches!(
            StateFlow::new("a", nodes(), vec![transition("a", "timeout", "ghost")], None),
            Err(StateError::Config(_))
        ));
        assert!(matches!(
            StateFlow::new("a", nodes(), vec![transition("ghost", "timeout", "b")], None),
            Err(StateError::Config(_))
        ));
        assert!(matches!(
            StateFlow::new("a", vec![IdleNode::boxed("a"), IdleNode::boxed("a")], vec![], None),
            Err(StateError::Config(_))
        ));
    }

    #[test]
    fn bad_trigger_pattern_is_fatal() {
        assert!(matches!(
            StateTransition::new("a", "(", "b", &[] as &[&str]),
            Err(StateError::Trigger { .. })
        ));
    }

    #[test]
    fn triggers_match_the_whole_exit_name() {
        let t = transition("a", "blocked", "b");
        assert!(t.matches(ExitKey::Blocked));
        // Anchored: "blocked" must not match the longer front_blocked.
        assert!(!t.matches(ExitKey::FrontBlocked));

        let catch_all = transition("a", ".*", "b");
        assert!(catch_all.matches(ExitKey::Timeout));
        assert!(catch_all.matches(ExitKey::NotFound));
    }

    #[test]
    fn first_matching_transition_wins() {
        let flow = StateFlow::new(
            "a",
            vec![IdleNode::boxed("a"), IdleNode::boxed("b"), IdleNode::boxed("c")],
            vec![
                transition("a", "timeout|completed", "b"),
                transition("a", ".*", "c"),
            ],
            None,
        )
        .unwrap();

        assert_eq!(flow.find_transition("a", ExitKey::Timeout).unwrap().to, "b");
        assert_eq!(flow.find_transition("a", ExitKey::Blocked).unwrap().to, "c");
        assert!(flow.find_transition("b", ExitKey::Timeout).is_none());
    }

    #[test]
    fn entry_index_resolves() {
        let flow = StateFlow::new(
            "b",
            vec![IdleNode::boxed("a"), IdleNode::boxed("b")],
            vec![],
            None,
        )
        .unwrap();
        assert_eq!(flow.entry_index(), 1);
        assert_eq!(flow.entry_id(), "b");
    }
}
