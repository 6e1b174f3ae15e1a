//! # bindexpr-types
//!
//! The type system boundary consulted by binding expressions.
//!
//! The expression engine never decides on its own what a type *is*; it asks a
//! [`TypeResolver`]. This crate provides:
//! - The [`Ty`] handle passed across the boundary
//! - The [`TypeResolver`] trait the host type system implements
//! - [`BuiltinTypes`], a self-contained resolver with Java-like primitives,
//!   numeric widening and single-inheritance classes

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtin;
pub mod error;
pub mod resolver;
pub mod ty;

pub use builtin::BuiltinTypes;
pub use error::TypeError;
pub use resolver::TypeResolver;
pub use ty::Ty;
