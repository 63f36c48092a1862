//! Expression trees read by assignments, dispatch tests, and formal directives.

use crate::arena::Arena;
use crate::error::TreeError;
use crate::ids::SignalId;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use vigil_common::{Value, MAX_WIDTH};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~`).
    Not,
    /// Arithmetic negation (`-`), wrapping.
    Neg,
    /// Reduction AND.
    RedAnd,
    /// Reduction OR.
    RedOr,
    /// Reduction XOR.
    RedXor,
    /// Logical NOT (`!`): 1 when the operand is zero.
    LogicNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
    /// Left shift.
    Shl,
    /// Logical right shift.
    Shr,
    /// Equality.
    Eq,
    /// Inequality.
    Ne,
    /// Unsigned less than.
    Lt,
    /// Unsigned less than or equal.
    Le,
    /// Unsigned greater than.
    Gt,
    /// Unsigned greater than or equal.
    Ge,
    /// Logical AND of the operands' truthiness.
    LogicAnd,
    /// Logical OR of the operands' truthiness.
    LogicOr,
}

impl UnaryOp {
    /// Operator symbol used when rendering expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "~",
            UnaryOp::Neg => "-",
            UnaryOp::RedAnd => "&",
            UnaryOp::RedOr => "|",
            UnaryOp::RedXor => "^",
            UnaryOp::LogicNot => "!",
        }
    }
}

impl BinaryOp {
    /// Operator symbol used when rendering expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::LogicAnd => "&&",
            BinaryOp::LogicOr => "||",
        }
    }

    /// Returns `true` for operators whose result is always 1 bit.
    pub fn is_predicate(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge
                | BinaryOp::LogicAnd
                | BinaryOp::LogicOr
        )
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The current value of a signal.
    Signal(SignalId),
    /// A constant.
    Const(Value),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// A two-way multiplexer (`sel ? if_true : if_false`).
    Mux {
        /// The selector; any set bit selects `if_true`.
        sel: Box<Expr>,
        /// Value when the selector is true.
        if_true: Box<Expr>,
        /// Value when the selector is false.
        if_false: Box<Expr>,
    },
    /// Bits `[start, stop)` of an expression.
    Slice {
        /// The sliced expression.
        expr: Box<Expr>,
        /// First bit (inclusive).
        start: u32,
        /// Last bit (exclusive).
        stop: u32,
    },
    /// Concatenation; the first part lands in the least significant bits.
    Concat(Vec<Expr>),
}

impl Expr {
    /// A reference to a signal.
    pub fn signal(id: SignalId) -> Self {
        Expr::Signal(id)
    }

    /// A constant of the given width.
    pub fn constant(bits: u64, width: u32) -> Self {
        Expr::Const(Value::new(bits, width))
    }

    /// A unary operation.
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// A binary operation.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Bitwise NOT of `self`.
    pub fn not(self) -> Self {
        Expr::unary(UnaryOp::Not, self)
    }

    /// Bitwise AND.
    pub fn and(self, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::And, self, rhs)
    }

    /// Bitwise OR.
    pub fn or(self, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Or, self, rhs)
    }

    /// Bitwise XOR.
    pub fn xor(self, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Xor, self, rhs)
    }

    /// Equality comparison.
    pub fn equals(self, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Eq, self, rhs)
    }

    /// Wrapping addition.
    pub fn add(self, rhs: Expr) -> Self {
        Expr::binary(BinaryOp::Add, self, rhs)
    }

    /// A multiplexer selecting between two values.
    pub fn mux(sel: Expr, if_true: Expr, if_false: Expr) -> Self {
        Expr::Mux {
            sel: Box::new(sel),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    /// Bits `[start, stop)` of `self`.
    pub fn slice(self, start: u32, stop: u32) -> Self {
        Expr::Slice {
            expr: Box::new(self),
            start,
            stop,
        }
    }

    /// Returns `true` for a constant.
    pub fn is_const(&self) -> bool {
        matches!(self, Expr::Const(_))
    }

    /// Computes the bit width of this expression against a signal table.
    pub fn width(&self, signals: &Arena<SignalId, Signal>) -> Result<u32, TreeError> {
        let width = match self {
            Expr::Signal(id) => signals.get(*id).ok_or(TreeError::UnknownSignal(*id))?.width,
            Expr::Const(v) => v.width(),
            Expr::Unary { op, operand } => {
                let w = operand.width(signals)?;
                match op {
                    UnaryOp::Not | UnaryOp::Neg => w,
                    UnaryOp::RedAnd | UnaryOp::RedOr | UnaryOp::RedXor | UnaryOp::LogicNot => 1,
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = lhs.width(signals)?;
                let r = rhs.width(signals)?;
                match op {
                    _ if op.is_predicate() => 1,
                    BinaryOp::Shl | BinaryOp::Shr => l,
                    _ => l.max(r),
                }
            }
            Expr::Mux {
                sel,
                if_true,
                if_false,
            } => {
                sel.width(signals)?;
                if_true.width(signals)?.max(if_false.width(signals)?)
            }
            Expr::Slice { expr, start, stop } => {
                let w = expr.width(signals)?;
                if start >= stop || *stop > w {
                    return Err(TreeError::BadSlice {
                        start: *start,
                        stop: *stop,
                        width: w,
                    });
                }
                stop - start
            }
            Expr::Concat(parts) => {
                let mut total = 0;
                for part in parts {
                    total += part.width(signals)?;
                }
                total
            }
        };
        if width == 0 || width > MAX_WIDTH {
            return Err(TreeError::UnsupportedWidth {
                what: "expression".into(),
                width,
            });
        }
        Ok(width)
    }

    /// Returns the operands of a boolean combinator, or `None` if `self` is not one.
    ///
    /// A boolean combinator is a 1-bit NOT/logical-NOT, or a 1-bit
    /// AND/OR/XOR/logical-AND/logical-OR whose operands are themselves 1 bit.
    /// Comparisons and reductions are leaves: their operands are not decisions.
    pub fn boolean_operands(
        &self,
        signals: &Arena<SignalId, Signal>,
    ) -> Result<Option<Vec<&Expr>>, TreeError> {
        let operands = match self {
            Expr::Unary {
                op: UnaryOp::Not | UnaryOp::LogicNot,
                operand,
            } if operand.width(signals)? == 1 => vec![operand.as_ref()],
            Expr::Binary {
                op:
                    BinaryOp::And
                    | BinaryOp::Or
                    | BinaryOp::Xor
                    | BinaryOp::LogicAnd
                    | BinaryOp::LogicOr,
                lhs,
                rhs,
            } if lhs.width(signals)? == 1 && rhs.width(signals)? == 1 => {
                vec![lhs.as_ref(), rhs.as_ref()]
            }
            _ => return Ok(None),
        };
        Ok(Some(operands))
    }

    /// Returns the direct subexpressions in left-to-right order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Signal(_) | Expr::Const(_) => Vec::new(),
            Expr::Unary { operand, .. } => vec![operand.as_ref()],
            Expr::Binary { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::Mux {
                sel,
                if_true,
                if_false,
            } => vec![sel.as_ref(), if_true.as_ref(), if_false.as_ref()],
            Expr::Slice { expr, .. } => vec![expr.as_ref()],
            Expr::Concat(parts) => parts.iter().collect(),
        }
    }

    /// Collects every signal this expression reads.
    pub fn read_signals(&self, out: &mut Vec<SignalId>) {
        if let Expr::Signal(id) = self {
            out.push(*id);
        }
        for child in self.children() {
            child.read_signals(out);
        }
    }
}
