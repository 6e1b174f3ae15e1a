//! Type resolution errors.

use thiserror::Error;

/// Errors reported by a [`TypeResolver`](crate::TypeResolver).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    /// No type with this name is known.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// The owner type has no property with this name.
    #[error("property `{property}` not found on type {owner}")]
    PropertyNotFound {
        /// The type that was searched.
        owner: String,
        /// The missing property.
        property: String,
    },

    /// The two types cannot be treated as any shared type.
    #[error("no common ancestor for {0} and {1}")]
    NoCommonAncestor(String, String),
}
