//! Abstract syntax tree for the cQASM 3 subset this reader accepts: register
//! declarations, gate calls (with `ctrl`/`negctrl`/`inv`/`pow` modifiers),
//! measurement, reset, barrier, wait, and opaque `asm` passthroughs. No
//! classical control flow or user gate definitions — those are out of scope
//! for a circuit that is read once and compiled, never executed.

use serde::{Deserialize, Serialize};

/// A complete cQASM 3 program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub version: String,
    pub statements: Vec<Statement>,
}

/// A top-level statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// `qubit[n] name;` or `qubit name;`
    QubitDecl { name: String, size: Option<u32> },

    /// `bit[n] name;` or `bit name;`
    BitDecl { name: String, size: Option<u32> },

    Gate(GateCall),

    /// `measure q -> c;` or `c = measure q;`
    Measure { qubits: Vec<QubitRef>, bits: Vec<BitRef> },

    Reset { qubits: Vec<QubitRef> },

    Init { qubits: Vec<QubitRef> },

    Barrier { qubits: Vec<QubitRef> },

    /// `wait(n) q;`
    Wait { cycles: Expression, qubits: Vec<QubitRef> },

    /// `asm(backend_name) """payload""";` — an opaque passthrough.
    AsmDeclaration { backend_name: String, payload: String },
}

/// A gate call, carrying any modifiers in application order (innermost
/// first, matching `pow(2) @ ctrl @ x q[0], q[1];`'s left-to-right reading).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub qubits: Vec<QubitRef>,
    pub modifiers: Vec<GateModifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GateModifier {
    Ctrl(Option<u32>),
    NegCtrl(Option<u32>),
    Inv,
    Pow(Expression),
}

/// Reference to a qubit, a whole register, or a register range (SGMQ).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum QubitRef {
    Single { register: String, index: Option<u32> },
    Range { register: String, start: u32, end: u32 },
}

impl QubitRef {
    pub fn register_name(&self) -> &str {
        match self {
            QubitRef::Single { register, .. } | QubitRef::Range { register, .. } => register,
        }
    }
}

/// Reference to a classical bit, a whole register, or a register range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BitRef {
    Single { register: String, index: Option<u32> },
    Range { register: String, start: u32, end: u32 },
}

impl BitRef {
    pub fn register_name(&self) -> &str {
        match self {
            BitRef::Single { register, .. } | BitRef::Range { register, .. } => register,
        }
    }
}

/// A constant expression over `pi`/`tau`/`euler`, literals, and the four
/// arithmetic operators plus a handful of unary functions (`sin`, `cos`,
/// `sqrt`) — enough to write `pi/2`, `-pi/4`, `2*pi/3`, `sqrt(2)/2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    Int(i64),
    Float(f64),
    Pi,
    Tau,
    Euler,
    Neg(Box<Expression>),
    BinOp { left: Box<Expression>, op: BinOp, right: Box<Expression> },
    FnCall { name: String, args: Vec<Expression> },
    Paren(Box<Expression>),
}

impl Expression {
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Expression::Int(v) => Some(*v as f64),
            Expression::Float(v) => Some(*v),
            Expression::Pi => Some(std::f64::consts::PI),
            Expression::Tau => Some(std::f64::consts::TAU),
            Expression::Euler => Some(std::f64::consts::E),
            Expression::Neg(e) => e.as_f64().map(|v| -v),
            Expression::BinOp { left, op, right } => {
                let l = left.as_f64()?;
                let r = right.as_f64()?;
                Some(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                    BinOp::Mod => l % r,
                })
            }
            Expression::FnCall { name, args } if args.len() == 1 => {
                let arg = args[0].as_f64()?;
                match name.as_str() {
                    "sin" => Some(arg.sin()),
                    "cos" => Some(arg.cos()),
                    "tan" => Some(arg.tan()),
                    "sqrt" => Some(arg.sqrt()),
                    "exp" => Some(arg.exp()),
                    "ln" => Some(arg.ln()),
                    _ => None,
                }
            }
            Expression::FnCall { .. } => None,
            Expression::Paren(e) => e.as_f64(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn binop_eval_divides_pi() {
        let expr = Expression::BinOp {
            left: Box::new(Expression::Pi),
            op: BinOp::Div,
            right: Box::new(Expression::Int(2)),
        };
        assert!((expr.as_f64().unwrap() - PI / 2.0).abs() < 1e-10);
    }

    #[test]
    fn fn_call_sqrt_evaluates() {
        let expr = Expression::FnCall { name: "sqrt".into(), args: vec![Expression::Float(4.0)] };
        assert_eq!(expr.as_f64(), Some(2.0));
    }

    #[test]
    fn qubit_range_reports_register_name() {
        let r = QubitRef::Range { register: "q".into(), start: 0, end: 2 };
        assert_eq!(r.register_name(), "q");
    }
}
