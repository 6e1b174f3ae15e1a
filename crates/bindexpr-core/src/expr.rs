//! Expression node kinds.
//!
//! This module defines the closed set of expression variants stored in the
//! model, together with their operators.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::handle::NodeId;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathOp {
    /// `+`, numeric addition or string concatenation.
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
}

impl MathOp {
    /// All operators, in declaration order.
    pub const ALL: [MathOp; 5] = [MathOp::Add, MathOp::Sub, MathOp::Mul, MathOp::Div, MathOp::Rem];

    /// Returns the operator as it appears in source and generated code.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "*",
            MathOp::Div => "/",
            MathOp::Rem => "%",
        }
    }
}

impl fmt::Display for MathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A prefix unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation, `-`.
    Neg,
    /// Logical not, `!`.
    Not,
    /// Bitwise complement, `~`.
    BitNot,
}

impl UnaryOp {
    /// Returns the operator as it appears in source and generated code.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Names the generated binding class a write-back belongs to.
///
/// Composite expressions pass it through untouched; only leaves read it to
/// decide which setter to call.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BindingContext(Arc<str>);

impl BindingContext {
    /// Creates a context for the given binding class.
    #[must_use]
    pub fn new(class_name: &str) -> Self {
        Self(Arc::from(class_name))
    }

    /// Returns the binding class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BindingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingContext({})", self.0)
    }
}

/// An expression stored in the model.
///
/// Children are referenced by [`NodeId`] into the same model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    // === Leaves ===
    /// A constant written in source, e.g. `10`, `2.5`, `"name"`.
    Literal {
        /// Source text, quotes included for strings.
        text: String,
        /// Declared type name.
        ty: String,
    },

    /// A binding variable. Always dynamic.
    Identifier {
        /// Variable name.
        name: String,
        /// Declared type name.
        ty: String,
    },

    // === Compound expressions ===
    /// Property access: `target.name`.
    Field {
        /// The object being accessed.
        target: NodeId,
        /// Property name.
        name: String,
    },

    /// Binary arithmetic: `left op right`.
    Math {
        /// Left operand.
        left: NodeId,
        /// The operator.
        op: MathOp,
        /// Right operand.
        right: NodeId,
    },

    /// Prefix unary operator.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: NodeId,
    },

    /// Explicit parentheses.
    Group(NodeId),

    /// Type cast: `(ty) operand`.
    Cast {
        /// Target type name.
        ty: String,
        /// The expression being cast.
        operand: NodeId,
    },

    /// Conditional: `cond ? then : otherwise`.
    Ternary {
        /// The predicate.
        cond: NodeId,
        /// Value when the predicate holds.
        then: NodeId,
        /// Value otherwise.
        otherwise: NodeId,
    },

    /// A write-back of `value` into an assignable leaf, produced by inversion.
    Assign {
        /// The identifier or field being written.
        target: NodeId,
        /// The value to write.
        value: NodeId,
        /// The binding class owning the setter.
        context: BindingContext,
    },
}

impl ExprKind {
    /// Returns the variant tag used in structural keys.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            ExprKind::Literal { .. } => "lit",
            ExprKind::Identifier { .. } => "id",
            ExprKind::Field { .. } => "field",
            ExprKind::Math { .. } => "math",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Group(_) => "group",
            ExprKind::Cast { .. } => "cast",
            ExprKind::Ternary { .. } => "ternary",
            ExprKind::Assign { .. } => "assign",
        }
    }

    /// Returns true if a two-way binding can write into this node directly.
    ///
    /// Assignable nodes are variable paths, which never need parentheses
    /// in front of a member access.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        matches!(self, ExprKind::Identifier { .. } | ExprKind::Field { .. })
    }

    /// Returns the children of this node, in order.
    #[must_use]
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        match self {
            ExprKind::Literal { .. } | ExprKind::Identifier { .. } => SmallVec::new(),
            ExprKind::Field { target, .. } => smallvec::smallvec![*target],
            ExprKind::Math { left, right, .. } => smallvec::smallvec![*left, *right],
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => {
                smallvec::smallvec![*operand]
            }
            ExprKind::Group(inner) => smallvec::smallvec![*inner],
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => smallvec::smallvec![*cond, *then, *otherwise],
            ExprKind::Assign { target, value, .. } => smallvec::smallvec![*target, *value],
        }
    }

    /// Rebuilds this node with every child replaced by `f(child)`.
    ///
    /// Children are visited in the same order as [`ExprKind::children`].
    #[must_use]
    pub fn map_children(&self, mut f: impl FnMut(NodeId) -> NodeId) -> ExprKind {
        match self {
            ExprKind::Literal { .. } | ExprKind::Identifier { .. } => self.clone(),
            ExprKind::Field { target, name } => ExprKind::Field {
                target: f(*target),
                name: name.clone(),
            },
            ExprKind::Math { left, op, right } => {
                let left = f(*left);
                let right = f(*right);
                ExprKind::Math {
                    left,
                    op: *op,
                    right,
                }
            }
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: f(*operand),
            },
            ExprKind::Group(inner) => ExprKind::Group(f(*inner)),
            ExprKind::Cast { ty, operand } => ExprKind::Cast {
                ty: ty.clone(),
                operand: f(*operand),
            },
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                let cond = f(*cond);
                let then = f(*then);
                let otherwise = f(*otherwise);
                ExprKind::Ternary {
                    cond,
                    then,
                    otherwise,
                }
            }
            ExprKind::Assign {
                target,
                value,
                context,
            } => {
                let target = f(*target);
                let value = f(*value);
                ExprKind::Assign {
                    target,
                    value,
                    context: context.clone(),
                }
            }
        }
    }
}
