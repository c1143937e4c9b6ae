//! `StateFlow` — the static transition graph the agent executes.

use regex::Regex;

use crate::command::ProcCommand;
use crate::error::{StateError, StateResult};
use crate::node::{ExitKey, StateNode};

// ── StateTransition ───────────────────────────────────────────────────────────

/// One labelled edge: `from` × trigger pattern → `to`, with an optional
/// program to run while switching.
///
/// The trigger is matched against the whole exit-key name (the pattern is
/// anchored at compile time), so `"completed"` matches exactly that exit and
/// `".*"` is the catch-all.  Transition programs deliberately keep their
/// keys unprefixed — they bridge state namespaces.
pub struct StateTransition {
    pub from: String,
    pub to:   String,
    trigger:  Regex,
    on_transition: Option<ProcCommand>,
}

impl StateTransition {
    pub fn new<S: AsRef<str>>(
        from: impl Into<String>,
        trigger: &str,
        to: impl Into<String>,
        on_transition: &[S],
    ) -> StateResult<Self> {
        let anchored = format!("\\A(?:{trigger})\\z");
        let trigger_re = Regex::new(&anchored).map_err(|source| StateError::Trigger {
            pattern: trigger.to_string(),
            source,
        })?;
        let on_transition = if on_transition.is_empty() {
            None
        } else {
            Some(ProcCommand::parse(on_transition)?)
        };
        Ok(Self {
            from: from.into(),
            to:   to.into(),
            trigger: trigger_re,
            on_transition,
        })
    }

    /// `true` if this edge fires for `exit`.
    pub fn matches(&self, exit: ExitKey) -> bool {
        self.trigger.is_match(exit.name())
    }

    pub fn on_transition(&self) -> Option<&ProcCommand> {
        self.on_transition.as_ref()
    }
}

// ── StateFlow ─────────────────────────────────────────────────────────────────

/// The validated graph: entry state, nodes by id, ordered transitions, and
/// an optional flow-level init program.
pub struct StateFlow {
    entry:       String,
    nodes:       Vec<Box<dyn StateNode>>,
    transitions: Vec<StateTransition>,
    on_init:     Option<ProcCommand>,
}

impl StateFlow {
    /// Validate and build.  Fails when the entry id is unknown, a node id is
    /// duplicated, or a transition references an undefined state — the only
    /// fatal error path in the core.
    pub fn new(
        entry: impl Into<String>,
        nodes: Vec<Box<dyn StateNode>>,
        transitions: Vec<StateTransition>,
        on_init: Option<ProcCommand>,
    ) -> StateResult<Self> {
        let entry = entry.into();
        for (i, node) in nodes.iter().enumerate() {
            if nodes[..i].iter().any(|other| other.id() == node.id()) {
                return Err(StateError::Config(format!("duplicate state id `{}`", node.id())));
            }
        }
        let defined = |id: &str| nodes.iter().any(|n| n.id() == id);
        if !defined(&entry) {
            return Err(StateError::Config(format!("unknown entry state `{entry}`")));
        }
        for t in &transitions {
            if !defined(&t.from) {
                return Err(StateError::Config(format!(
                    "transition from unknown state `{}`",
                    t.from
                )));
            }
            if !defined(&t.to) {
                return Err(StateError::Config(format!(
                    "transition to unknown state `{}`",
                    t.to
                )));
            }
        }
        Ok(Self { entry, nodes, transitions, on_init })
    }

    #[inline]
    pub fn entry_id(&self) -> &str {
        &self.entry
    }

    /// Index of the entry node.
    pub fn entry_index(&self) -> usize {
        self.node_index(&self.entry).expect("validated at construction")
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id() == id)
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> &dyn StateNode {
        self.nodes[index].as_ref()
    }

    pub fn node_mut(&mut self, index: usize) -> &mut dyn StateNode {
        self.nodes[index].as_mut()
    }

    pub fn on_init(&self) -> Option<&ProcCommand> {
        self.on_init.as_ref()
    }

    /// The first transition (in declaration order) leaving `from` whose
    /// trigger matches `exit`.
    pub fn find_transition(&self, from: &str, exit: ExitKey) -> Option<&StateTransition> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.matches(exit))
    }
}
