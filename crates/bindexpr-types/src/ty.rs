//! Semantic type handles.

use std::fmt;
use std::sync::Arc;

/// A handle to a type known by a [`TypeResolver`](crate::TypeResolver).
///
/// Handles are cheap to clone and compare by their fully qualified name.
/// A resolver is the only authority on what a name means; two resolvers may
/// hand out equal handles with different semantics.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ty(Arc<str>);

impl Ty {
    /// Creates a handle for the given type name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Returns the type name as written in generated code.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty({})", self.0)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ty {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
