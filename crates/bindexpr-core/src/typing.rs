//! Lazy type resolution.
//!
//! Each node asks the [`TypeResolver`] for its type the first time it is
//! needed and keeps the answer for the lifetime of the model. A failed
//! resolution leaves the cell empty, so nothing inconsistent is memoized.

use bindexpr_types::{Ty, TypeResolver};
use log::trace;

use crate::error::ExprError;
use crate::expr::{ExprKind, MathOp, UnaryOp};
use crate::handle::NodeId;
use crate::model::ExprModel;

impl ExprModel {
    /// Returns the resolved type of a node, computing it on first use.
    ///
    /// # Errors
    ///
    /// Propagates any [`TypeError`](bindexpr_types::TypeError) raised by the
    /// resolver for this node or one of its children.
    pub fn resolved_type(
        &self,
        id: NodeId,
        resolver: &dyn TypeResolver,
    ) -> Result<Ty, ExprError> {
        let cell = self.resolved_cell(id);
        if let Some(ty) = cell.get() {
            trace!("type of {id} cached: {ty}");
            return Ok(ty.clone());
        }
        let ty = self.resolve_type(id, resolver)?;
        Ok(cell.get_or_init(|| ty).clone())
    }

    /// Returns the memoized type, if it has been resolved already.
    #[must_use]
    pub fn cached_type(&self, id: NodeId) -> Option<&Ty> {
        self.resolved_cell(id).get()
    }

    fn resolve_type(&self, id: NodeId, resolver: &dyn TypeResolver) -> Result<Ty, ExprError> {
        let ty = match self.get(id) {
            ExprKind::Literal { ty, .. }
            | ExprKind::Identifier { ty, .. }
            | ExprKind::Cast { ty, .. } => resolver.find_type(ty)?,
            ExprKind::Field { target, name } => {
                let owner = self.resolved_type(*target, resolver)?;
                resolver.property_type(&owner, name)?
            }
            ExprKind::Math { left, op, right } => {
                let left = self.resolved_type(*left, resolver)?;
                let right = self.resolved_type(*right, resolver)?;
                if *op == MathOp::Add && (resolver.is_string(&left) || resolver.is_string(&right))
                {
                    resolver.string_type()?
                } else {
                    resolver.common_ancestor(&left, &right)?
                }
            }
            ExprKind::Unary {
                op: UnaryOp::Not, ..
            } => resolver.boolean_type()?,
            ExprKind::Unary { operand: inner, .. } | ExprKind::Group(inner) => {
                self.resolved_type(*inner, resolver)?
            }
            ExprKind::Ternary {
                then, otherwise, ..
            } => {
                let then = self.resolved_type(*then, resolver)?;
                let otherwise = self.resolved_type(*otherwise, resolver)?;
                resolver.common_ancestor(&then, &otherwise)?
            }
            ExprKind::Assign { target, .. } => self.resolved_type(*target, resolver)?,
        };
        Ok(ty)
    }
}
