//! Reference evaluation of expressions.
//!
//! The binding runtime evaluates generated code, not these trees. This
//! evaluator exists to check compiled bindings against their source: an
//! inverted assignment, evaluated and substituted back, must reproduce the
//! value it was derived from.

use std::fmt;

use hashbrown::HashMap;
use thiserror::Error;

use crate::expr::{ExprKind, MathOp, UnaryOp};
use crate::handle::NodeId;
use crate::model::ExprModel;

/// A runtime value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Any integral primitive.
    Int(i64),
    /// `float` or `double`.
    Float(f64),
    /// `boolean`.
    Bool(bool),
    /// `String` or `char`.
    Str(String),
}

impl Value {
    /// Returns the value as a float if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

/// Errors raised during evaluation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    /// No value bound for an identifier or property path.
    #[error("no value bound for `{0}`")]
    Unbound(String),

    /// A literal could not be read as its declared type.
    #[error("invalid {ty} literal `{text}`")]
    BadLiteral {
        /// The literal text.
        text: String,
        /// Its declared type.
        ty: String,
    },

    /// Operand kinds do not fit the operator.
    #[error("cannot apply `{op}` to {operands}")]
    TypeMismatch {
        /// The operator.
        op: &'static str,
        /// The operand kinds.
        operands: String,
    },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A property access on something that is not a variable path.
    #[error("property access requires a variable path")]
    NotAPath,
}

/// Values bound to identifiers and dotted property paths, e.g. `user.age`.
#[derive(Clone, Debug, Default)]
pub struct Env {
    values: HashMap<String, Value>,
}

impl Env {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `path` to `value`, returning the environment for chaining.
    #[must_use]
    pub fn with(mut self, path: &str, value: Value) -> Self {
        self.set(path, value);
        self
    }

    /// Binds `path` to `value`.
    pub fn set(&mut self, path: &str, value: Value) {
        self.values.insert(path.to_string(), value);
    }

    /// Returns the value bound to `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path)
    }
}

impl ExprModel {
    /// Returns the dotted path of an identifier or property chain.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Option<String> {
        match self.get(id) {
            ExprKind::Identifier { name, .. } => Some(name.clone()),
            ExprKind::Field { target, name } => Some(format!("{}.{name}", self.path(*target)?)),
            _ => None,
        }
    }

    /// Evaluates an expression.
    ///
    /// An [`ExprKind::Assign`] evaluates to the value it would write.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for unbound paths, malformed literals and
    /// ill-typed or undefined operations.
    pub fn evaluate(&self, id: NodeId, env: &Env) -> Result<Value, EvalError> {
        match self.get(id) {
            ExprKind::Literal { text, ty } => parse_literal(text, ty),
            ExprKind::Identifier { .. } | ExprKind::Field { .. } => {
                let path = self.path(id).ok_or(EvalError::NotAPath)?;
                env.get(&path).cloned().ok_or(EvalError::Unbound(path))
            }
            ExprKind::Math { left, op, right } => {
                let left = self.evaluate(*left, env)?;
                let right = self.evaluate(*right, env)?;
                apply_math(*op, left, right)
            }
            ExprKind::Unary { op, operand } => apply_unary(*op, self.evaluate(*operand, env)?),
            ExprKind::Group(inner) => self.evaluate(*inner, env),
            ExprKind::Cast { ty, operand } => Ok(cast(ty, self.evaluate(*operand, env)?)),
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => match self.evaluate(*cond, env)? {
                Value::Bool(true) => self.evaluate(*then, env),
                Value::Bool(false) => self.evaluate(*otherwise, env),
                other => Err(EvalError::TypeMismatch {
                    op: "?:",
                    operands: other.kind().to_string(),
                }),
            },
            ExprKind::Assign { value, .. } => self.evaluate(*value, env),
        }
    }
}

fn parse_literal(text: &str, ty: &str) -> Result<Value, EvalError> {
    let bad = || EvalError::BadLiteral {
        text: text.to_string(),
        ty: ty.to_string(),
    };
    match ty {
        "byte" | "short" | "int" | "long" => text
            .trim_end_matches(['l', 'L'])
            .parse()
            .map(Value::Int)
            .map_err(|_| bad()),
        "float" | "double" => text
            .trim_end_matches(['f', 'F', 'd', 'D'])
            .parse()
            .map(Value::Float)
            .map_err(|_| bad()),
        "boolean" => text.parse().map(Value::Bool).map_err(|_| bad()),
        "String" | "char" => text
            .strip_prefix(['"', '\''])
            .and_then(|s| s.strip_suffix(['"', '\'']))
            .map(|s| Value::Str(s.to_string()))
            .ok_or_else(bad),
        _ => Err(bad()),
    }
}

fn mismatch(op: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op,
        operands: format!("{} and {}", left.kind(), right.kind()),
    }
}

fn apply_math(op: MathOp, left: Value, right: Value) -> Result<Value, EvalError> {
    match (op, &left, &right) {
        (MathOp::Add, Value::Str(l), r) => Ok(Value::Str(format!("{l}{r}"))),
        (MathOp::Add, l, Value::Str(r)) => Ok(Value::Str(format!("{l}{r}"))),
        (_, Value::Int(l), Value::Int(r)) => {
            let (l, r) = (*l, *r);
            match op {
                MathOp::Add => Ok(Value::Int(l.wrapping_add(r))),
                MathOp::Sub => Ok(Value::Int(l.wrapping_sub(r))),
                MathOp::Mul => Ok(Value::Int(l.wrapping_mul(r))),
                MathOp::Div if r == 0 => Err(EvalError::DivisionByZero),
                MathOp::Div => Ok(Value::Int(l.wrapping_div(r))),
                MathOp::Rem if r == 0 => Err(EvalError::DivisionByZero),
                MathOp::Rem => Ok(Value::Int(l.wrapping_rem(r))),
            }
        }
        _ => {
            let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) else {
                return Err(mismatch(op.symbol(), &left, &right));
            };
            Ok(Value::Float(match op {
                MathOp::Add => l + r,
                MathOp::Sub => l - r,
                MathOp::Mul => l * r,
                MathOp::Div => l / r,
                MathOp::Rem => l % r,
            }))
        }
    }
}

fn apply_unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
        (op, other) => Err(EvalError::TypeMismatch {
            op: op.symbol(),
            operands: other.kind().to_string(),
        }),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn cast(ty: &str, value: Value) -> Value {
    match (ty, value) {
        ("byte" | "short" | "int" | "long", Value::Float(x)) => Value::Int(x as i64),
        ("float" | "double", Value::Int(n)) => Value::Float(n as f64),
        (_, other) => other,
    }
}
