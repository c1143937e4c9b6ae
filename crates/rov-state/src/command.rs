//! The reified stack-VM micro-language for declarative hooks.
//!
//! Programs arrive as ordered text lines in node and transition configs:
//!
//! ```text
//! time
//! put entry_mark
//! ```
//!
//! Each line is a number (pushed as a value), a recognised op name (`get`
//! and `put` take their key on the same line), or anything else, which is
//! pushed as a string literal.  A well-formed program leaves the stack empty;
//! the post-condition is checked dynamically because `get` pushes values of
//! statically unknown provenance.

use crate::context::ProcessorContext;
use crate::error::{CommandError, StateError, StateResult};
use crate::value::Value;

/// One stack-VM instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum ProcOp {
    /// Push a literal.
    Push(Value),
    /// Push the value stored under the key.
    Get(String),
    /// Pop a value and store it under the key.
    Put(String),
    /// Push the current simulation time, in milliseconds.
    Time,
    Add,
    Sub,
    Mul,
    Div,
    Neg,
    /// Exchange the two topmost operands.
    Swap,
    /// Store a batch of literals (used by config-driven defaults).
    SetProperties(Vec<(String, Value)>),
}

/// An ordered instruction sequence.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ProcCommand {
    ops: Vec<ProcOp>,
}

impl ProcCommand {
    pub fn new(ops: Vec<ProcOp>) -> Self {
        Self { ops }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[inline]
    pub fn ops(&self) -> &[ProcOp] {
        &self.ops
    }

    // ── Parsing ───────────────────────────────────────────────────────────

    /// Parse one program from its textual lines.
    ///
    /// Malformed lines (`get`/`put` without a key) are configuration errors
    /// and fail flow construction.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> StateResult<ProcCommand> {
        let mut ops = Vec::with_capacity(lines.len());
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            ops.push(parse_line(line)?);
        }
        Ok(ProcCommand { ops })
    }

    /// Rewrite every key as `"<id>.<key>"`.  Applied once at load time to
    /// node hook programs so execution stays inside the node's namespace.
    pub fn prefixed(self, id: &str) -> ProcCommand {
        let ops = self
            .ops
            .into_iter()
            .map(|op| match op {
                ProcOp::Get(k) => ProcOp::Get(format!("{id}.{k}")),
                ProcOp::Put(k) => ProcOp::Put(format!("{id}.{k}")),
                ProcOp::SetProperties(pairs) => ProcOp::SetProperties(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (format!("{id}.{k}"), v))
                        .collect(),
                ),
                other => other,
            })
            .collect();
        ProcCommand { ops }
    }

    // ── Execution ─────────────────────────────────────────────────────────

    /// Run the program against `ctx`.
    ///
    /// Fails on underflow, missing `get` keys, non-numeric arithmetic
    /// operands, or a non-empty stack at the end.  On failure the operand
    /// stack is cleared so the next program starts clean.
    pub fn execute(&self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        match self.run(ctx) {
            Ok(()) => {
                let depth = ctx.stack_size();
                if depth != 0 {
                    ctx.clear_stack();
                    return Err(CommandError::UnbalancedStack(depth));
                }
                Ok(())
            }
            Err(e) => {
                ctx.clear_stack();
                Err(e)
            }
        }
    }

    fn run(&self, ctx: &mut ProcessorContext) -> Result<(), CommandError> {
        for op in &self.ops {
            match op {
                ProcOp::Push(v) => ctx.push(v.clone()),
                ProcOp::Get(key) => {
                    let v = ctx
                        .get(key)
                        .cloned()
                        .ok_or_else(|| CommandError::MissingKey(key.clone()))?;
                    ctx.push(v);
                }
                ProcOp::Put(key) => {
                    let v = ctx.pop()?;
                    ctx.put(key.clone(), v);
                }
                ProcOp::Time => ctx.push(Value::Int(ctx.simulation_time().0 as i64)),
                ProcOp::Add => binary(ctx, |a, b| a + b)?,
                ProcOp::Sub => binary(ctx, |a, b| a - b)?,
                ProcOp::Mul => binary(ctx, |a, b| a * b)?,
                ProcOp::Div => binary(ctx, |a, b| a / b)?,
                ProcOp::Neg => {
                    let a = ctx.pop_num()?;
                    ctx.push(Value::Num(-a));
                }
                ProcOp::Swap => {
                    let b = ctx.pop()?;
                    let a = ctx.pop()?;
                    ctx.push(b);
                    ctx.push(a);
                }
                ProcOp::SetProperties(pairs) => {
                    for (k, v) in pairs {
                        ctx.put(k.clone(), v.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pop two numbers and push `f(deeper, top)`.
fn binary(
    ctx: &mut ProcessorContext,
    f: impl FnOnce(f64, f64) -> f64,
) -> Result<(), CommandError> {
    let b = ctx.pop_num()?;
    let a = ctx.pop_num()?;
    ctx.push(Value::Num(f(a, b)));
    Ok(())
}

fn parse_line(line: &str) -> StateResult<ProcOp> {
    match line {
        "time" => return Ok(ProcOp::Time),
        "add" => return Ok(ProcOp::Add),
        "sub" => return Ok(ProcOp::Sub),
        "mul" => return Ok(ProcOp::Mul),
        "div" => return Ok(ProcOp::Div),
        "neg" => return Ok(ProcOp::Neg),
        "swap" => return Ok(ProcOp::Swap),
        "get" | "put" => {
            return Err(StateError::Config(format!("`{line}` requires a key operand")));
        }
        _ => {}
    }
    if let Some(key) = line.strip_prefix("get ") {
        return Ok(ProcOp::Get(key.trim().to_string()));
    }
    if let Some(key) = line.strip_prefix("put ") {
        return Ok(ProcOp::Put(key.trim().to_string()));
    }
    if let Ok(i) = line.parse::<i64>() {
        return Ok(ProcOp::Push(Value::Int(i)));
    }
    if let Ok(n) = line.parse::<f64>() {
        return Ok(ProcOp::Push(Value::Num(n)));
    }
    Ok(ProcOp::Push(Value::Text(line.to_string())))
}
