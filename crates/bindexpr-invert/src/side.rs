//! Which operand of a binary expression carries the dynamic value.

use bindexpr_core::{ExprModel, NodeId};

/// The dynamic operand of a binary expression whose other operand is constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicSide {
    /// `x op const`
    Left,
    /// `const op x`
    Right,
}

impl DynamicSide {
    /// Determines the dynamic side, or `None` when both or neither are dynamic.
    #[must_use]
    pub fn of(model: &ExprModel, left: NodeId, right: NodeId) -> Option<Self> {
        match (model.is_dynamic(left), model.is_dynamic(right)) {
            (true, false) => Some(DynamicSide::Left),
            (false, true) => Some(DynamicSide::Right),
            _ => None,
        }
    }

    /// Splits `(left, right)` into `(dynamic, constant)`.
    #[must_use]
    pub fn split(self, left: NodeId, right: NodeId) -> (NodeId, NodeId) {
        match self {
            DynamicSide::Left => (left, right),
            DynamicSide::Right => (right, left),
        }
    }
}
