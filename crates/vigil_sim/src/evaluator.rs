//! Expression evaluator and statement executor for the simulation engine.
//!
//! [`eval_expr`] recursively evaluates an [`Expr`] tree into a [`Value`],
//! reading signal values from the current state. [`exec_statement`] walks a
//! [`Statement`], collecting deferred [`PendingUpdate`]s for the engine to
//! apply once the whole domain body has run.

use vigil_common::value::mask;
use vigil_common::{Value, MAX_WIDTH};
use vigil_tree::{BinaryOp, Design, Expr, SignalId, Statement, UnaryOp};

use crate::error::SimError;

/// A deferred signal update collected during statement execution.
///
/// Updates are applied in collection order once the body finishes, so a
/// later write to the same target wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    /// The signal to update.
    pub target: SignalId,
    /// The new value, already sized to the target.
    pub value: Value,
}

/// Context for expression evaluation and statement execution.
pub struct EvalContext<'a> {
    /// The design, for signal widths and names.
    pub design: &'a Design,
    /// Current value of every signal, indexed by raw signal ID.
    pub values: &'a [Value],
}

impl EvalContext<'_> {
    fn read(&self, id: SignalId) -> Result<Value, SimError> {
        self.values
            .get(id.as_raw() as usize)
            .copied()
            .ok_or(SimError::UnknownSignal(id))
    }
}

fn make(bits: u64, width: u32) -> Result<Value, SimError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(SimError::EvalError {
            reason: format!("result width {width} outside 1..={MAX_WIDTH}"),
        });
    }
    Ok(Value::new(bits, width))
}

/// Evaluates an expression against the current state.
pub fn eval_expr(ctx: &EvalContext<'_>, expr: &Expr) -> Result<Value, SimError> {
    match expr {
        Expr::Signal(id) => ctx.read(*id),

        Expr::Const(v) => Ok(*v),

        Expr::Unary { op, operand } => {
            let val = eval_expr(ctx, operand)?;
            Ok(eval_unary(*op, val))
        }

        Expr::Binary { op, lhs, rhs } => {
            let l = eval_expr(ctx, lhs)?;
            let r = eval_expr(ctx, rhs)?;
            Ok(eval_binary(*op, l, r))
        }

        Expr::Mux {
            sel,
            if_true,
            if_false,
        } => {
            let s = eval_expr(ctx, sel)?;
            let t = eval_expr(ctx, if_true)?;
            let f = eval_expr(ctx, if_false)?;
            let width = t.width().max(f.width());
            Ok(if s.is_true() { t } else { f }.resize(width))
        }

        Expr::Slice { expr, start, stop } => {
            let val = eval_expr(ctx, expr)?;
            if start >= stop || *stop > val.width() {
                return Err(SimError::EvalError {
                    reason: format!("slice [{start}:{stop}] of a {}-bit value", val.width()),
                });
            }
            make(val.as_u64() >> start, stop - start)
        }

        Expr::Concat(parts) => {
            // First part lands in the least significant bits
            let mut bits = 0u64;
            let mut offset = 0u32;
            for part in parts {
                let v = eval_expr(ctx, part)?;
                if offset + v.width() > MAX_WIDTH {
                    return Err(SimError::EvalError {
                        reason: "concatenation wider than 64 bits".into(),
                    });
                }
                bits |= v.as_u64() << offset;
                offset += v.width();
            }
            make(bits, offset)
        }
    }
}

fn eval_unary(op: UnaryOp, val: Value) -> Value {
    let w = val.width();
    match op {
        UnaryOp::Not => Value::new(!val.as_u64(), w),
        UnaryOp::Neg => Value::new(val.as_u64().wrapping_neg(), w),
        UnaryOp::RedAnd => Value::from_bool(val.as_u64() == mask(w)),
        UnaryOp::RedOr => Value::from_bool(val.is_true()),
        UnaryOp::RedXor => Value::from_bool(val.as_u64().count_ones() % 2 == 1),
        UnaryOp::LogicNot => Value::from_bool(!val.is_true()),
    }
}

fn eval_binary(op: BinaryOp, lhs: Value, rhs: Value) -> Value {
    let (a, b) = (lhs.as_u64(), rhs.as_u64());
    let w = lhs.width().max(rhs.width());
    match op {
        BinaryOp::And => Value::new(a & b, w),
        BinaryOp::Or => Value::new(a | b, w),
        BinaryOp::Xor => Value::new(a ^ b, w),
        BinaryOp::Add => Value::new(a.wrapping_add(b), w),
        BinaryOp::Sub => Value::new(a.wrapping_sub(b), w),
        BinaryOp::Mul => Value::new(a.wrapping_mul(b), w),
        BinaryOp::Shl => Value::new(if b >= 64 { 0 } else { a << b }, lhs.width()),
        BinaryOp::Shr => Value::new(if b >= 64 { 0 } else { a >> b }, lhs.width()),
        BinaryOp::Eq => Value::from_bool(a == b),
        BinaryOp::Ne => Value::from_bool(a != b),
        BinaryOp::Lt => Value::from_bool(a < b),
        BinaryOp::Le => Value::from_bool(a <= b),
        BinaryOp::Gt => Value::from_bool(a > b),
        BinaryOp::Ge => Value::from_bool(a >= b),
        BinaryOp::LogicAnd => Value::from_bool(a != 0 && b != 0),
        BinaryOp::LogicOr => Value::from_bool(a != 0 || b != 0),
    }
}

/// Executes a statement, collecting pending updates and formal failures.
///
/// A failing `assert` or `assume` pushes a message onto `failures`; `cover`
/// directives have no effect on the run.
pub fn exec_statement(
    ctx: &EvalContext<'_>,
    stmt: &Statement,
    pending: &mut Vec<PendingUpdate>,
    failures: &mut Vec<String>,
) -> Result<(), SimError> {
    match stmt {
        Statement::Assign(a) => {
            let width = ctx
                .design
                .signal(a.target)
                .ok_or(SimError::UnknownSignal(a.target))?
                .width;
            let val = eval_expr(ctx, &a.value)?;
            pending.push(PendingUpdate {
                target: a.target,
                value: val.resize(width),
            });
            Ok(())
        }

        Statement::Switch(s) => {
            let test = eval_expr(ctx, &s.test)?;
            for case in &s.cases {
                let taken = match &case.patterns {
                    None => true,
                    Some(patterns) => {
                        let mut any = false;
                        for p in patterns {
                            if p.matches(test.as_u64(), test.width())? {
                                any = true;
                                break;
                            }
                        }
                        any
                    }
                };
                if taken {
                    return exec_block(ctx, &case.body, pending, failures);
                }
            }
            Ok(())
        }

        Statement::Formal(f) => {
            let cond = eval_expr(ctx, &f.condition)?;
            if f.kind.can_fail() && !cond.is_true() {
                let at = f
                    .loc
                    .as_ref()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string);
                failures.push(format!("{} failed at {at}", f.kind));
            }
            Ok(())
        }
    }
}

/// Executes a statement list in order.
pub fn exec_block(
    ctx: &EvalContext<'_>,
    stmts: &[Statement],
    pending: &mut Vec<PendingUpdate>,
    failures: &mut Vec<String>,
) -> Result<(), SimError> {
    for stmt in stmts {
        exec_statement(ctx, stmt, pending, failures)?;
    }
    Ok(())
}
