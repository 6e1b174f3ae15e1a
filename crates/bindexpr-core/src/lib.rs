//! # bindexpr-core
//!
//! Core expression model for declarative two-way data bindings.
//!
//! This crate provides:
//! - Arena-allocated expression storage with structural interning
//! - Type-safe node handles
//! - Change-propagation dependencies between dynamic nodes
//! - Lazy, memoized type resolution against a host [`TypeResolver`]
//! - Cross-model cloning
//! - A reference evaluator for checking compiled bindings
//!
//! ## Design Principles
//!
//! - **Arena + Index**: nodes reference children by [`NodeId`], never by pointer
//! - **Interning**: every structurally unique expression is stored once per model
//! - **Write-once Caches**: types are computed on demand and never change after
//!
//! [`TypeResolver`]: bindexpr_types::TypeResolver

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod eval;
pub mod expr;
pub mod handle;
pub mod intern;
pub mod model;
pub mod typing;

mod proptests;

pub use error::ExprError;
pub use eval::{Env, EvalError, Value};
pub use expr::{BindingContext, ExprKind, MathOp, UnaryOp};
pub use handle::NodeId;
pub use model::{Dependency, ExprDisplay, ExprModel};
