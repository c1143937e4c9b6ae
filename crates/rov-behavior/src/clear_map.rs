//! `ClearMapNode` — wipe the radar map and move on.

use rov_core::RobotCommand;
use rov_state::{
    CommandError, ExitKey, NodeBase, NodeHooks, ProcessorContext, StateNode, StateResult,
    StepResult,
};

/// Requests a radar wipe through the context hook (the agent owns the live
/// map and applies it after the step) and completes immediately.
pub struct ClearMapNode {
    base: NodeBase,
}

impl ClearMapNode {
    pub fn new(id: impl Into<String>, hooks: NodeHooks) -> StateResult<Self> {
        Ok(Self { base: NodeBase::new(id, &hooks)? })
    }

    pub fn boxed(id: impl Into<String>, hooks: NodeHooks) -> StateResult<Box<dyn StateNode>> {
        Ok(Box::new(Self::new(id, hooks)?))
    }
}

impl StateNode for ClearMapNode {
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
        ctx.clear_map();
        (ExitKey::Completed, RobotCommand::Halt)
    }
}
