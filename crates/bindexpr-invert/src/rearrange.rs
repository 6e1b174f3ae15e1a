//! Linear rearrangement rules for binary arithmetic.
//!
//! Given `x op c = v` (or `c op x = v`), builds the expression `x` must equal.

use bindexpr_core::{ExprError, ExprModel, MathOp, NodeId};

use crate::side::DynamicSide;

/// Builds the new value for the dynamic operand in `dest`.
///
/// `value` and `constant` must already live in `dest`.
///
/// # Errors
///
/// Returns [`ExprError::InvalidOperator`] for `%`, which has no rule.
pub fn rearrange(
    dest: &mut ExprModel,
    op: MathOp,
    side: DynamicSide,
    value: NodeId,
    constant: NodeId,
) -> Result<NodeId, ExprError> {
    let (left, inverse, right) = match (op, side) {
        // c + x = v  =>  x = v - c
        (MathOp::Add, _) => (value, MathOp::Sub, constant),
        // c * x = v  =>  x = v / c
        (MathOp::Mul, _) => (value, MathOp::Div, constant),
        // x - c = v  =>  x = v + c
        (MathOp::Sub, DynamicSide::Left) => (value, MathOp::Add, constant),
        // c - x = v  =>  x = c - v
        (MathOp::Sub, DynamicSide::Right) => (constant, MathOp::Sub, value),
        // x / c = v  =>  x = v * c
        (MathOp::Div, DynamicSide::Left) => (value, MathOp::Mul, constant),
        // c / x = v  =>  x = c / v
        (MathOp::Div, DynamicSide::Right) => (constant, MathOp::Div, value),
        (MathOp::Rem, _) => return Err(ExprError::InvalidOperator(op)),
    };
    Ok(dest.math(left, inverse, right))
}
