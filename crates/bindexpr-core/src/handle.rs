//! Node handles.
//!
//! A [`NodeId`] is a position in one [`ExprModel`](crate::ExprModel) and
//! carries nothing else. Moving an expression to another model goes through
//! [`ExprModel::clone_into`](crate::ExprModel::clone_into), which hands back
//! a new id; the old one must not be used with the destination.

use std::fmt;

/// Position of a node in the model that created it.
///
/// Within one model, equal ids mean structurally equal expressions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wraps a raw arena position. Models mint ids; callers rarely need to.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The arena position.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
