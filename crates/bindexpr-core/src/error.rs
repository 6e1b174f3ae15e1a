//! Errors raised while compiling binding expressions.

use bindexpr_types::TypeError;
use thiserror::Error;

use crate::expr::MathOp;

/// Errors raised by type resolution and inversion.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExprError {
    /// The expression cannot be the target of a two-way binding.
    #[error("{reason}: {expr}")]
    NotInvertible {
        /// Why inversion is impossible.
        reason: String,
        /// The offending expression, rendered.
        expr: String,
    },

    /// An operator without a rearrangement rule reached inversion.
    ///
    /// The invertibility check rejects such operators first, so this is an
    /// internal invariant violation rather than a user error.
    #[error("math operator `{0}` reached inversion but has no inverse")]
    InvalidOperator(MathOp),

    /// Inversion recursed deeper than allowed.
    #[error("inversion exceeded the maximum depth of {0}")]
    DepthExceeded(usize),

    /// The type system rejected a query.
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl ExprError {
    /// Creates a [`ExprError::NotInvertible`].
    pub fn not_invertible(reason: impl Into<String>, expr: impl ToString) -> Self {
        Self::NotInvertible {
            reason: reason.into(),
            expr: expr.to_string(),
        }
    }

    /// Returns true for invariant violations that indicate a bug rather than a
    /// problem with the user's expression.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidOperator(_))
    }
}
