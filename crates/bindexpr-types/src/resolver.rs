//! The resolver boundary.

use crate::error::TypeError;
use crate::ty::Ty;

/// The queries a binding expression may ask of the host type system.
///
/// Implementations must be deterministic: the expression model memoizes the
/// first answer it gets for every node.
pub trait TypeResolver {
    /// Looks a type up by name.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::TypeNotFound`] if the name is unknown.
    fn find_type(&self, name: &str) -> Result<Ty, TypeError>;

    /// Returns true if values of `ty` behave like strings.
    fn is_string(&self, ty: &Ty) -> bool;

    /// Returns the narrowest type both `a` and `b` can be treated as.
    ///
    /// Must be usable pairwise across an arbitrary promotion chain, so it has
    /// to be commutative and associative for the types it accepts.
    ///
    /// # Errors
    ///
    /// Returns an error if either type is unknown or the two share nothing.
    fn common_ancestor(&self, a: &Ty, b: &Ty) -> Result<Ty, TypeError>;

    /// Returns the type of `owner.property`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::PropertyNotFound`] if `owner` has no such property.
    fn property_type(&self, owner: &Ty, property: &str) -> Result<Ty, TypeError>;

    /// Returns the type of string literals and string concatenation.
    ///
    /// # Errors
    ///
    /// Returns an error if the host has no string type.
    fn string_type(&self) -> Result<Ty, TypeError>;

    /// Returns the type of logical negation.
    ///
    /// # Errors
    ///
    /// Returns an error if the host has no boolean type.
    fn boolean_type(&self) -> Result<Ty, TypeError>;
}

impl<R: TypeResolver + ?Sized> TypeResolver for &R {
    fn find_type(&self, name: &str) -> Result<Ty, TypeError> {
        (**self).find_type(name)
    }

    fn is_string(&self, ty: &Ty) -> bool {
        (**self).is_string(ty)
    }

    fn common_ancestor(&self, a: &Ty, b: &Ty) -> Result<Ty, TypeError> {
        (**self).common_ancestor(a, b)
    }

    fn property_type(&self, owner: &Ty, property: &str) -> Result<Ty, TypeError> {
        (**self).property_type(owner, property)
    }

    fn string_type(&self) -> Result<Ty, TypeError> {
        (**self).string_type()
    }

    fn boolean_type(&self) -> Result<Ty, TypeError> {
        (**self).boolean_type()
    }
}
