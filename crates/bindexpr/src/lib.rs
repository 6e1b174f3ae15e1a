//! # bindexpr
//!
//! Expression compilation engine for declarative two-way data bindings.
//!
//! This is the facade crate. It re-exports the model, type, code generation
//! and inversion crates and ties them together in a [`BindingCompiler`].
//!
//! ## Example
//!
//! ```rust
//! use bindexpr::prelude::*;
//!
//! let mut types = BuiltinTypes::new();
//! types.register_class("User", "Object");
//! types.register_property("User", "age", "int").unwrap();
//! let compiler = BindingCompiler::new(types);
//!
//! let mut model = compiler.model();
//! let user = model.identifier("user", "User");
//! let age = model.field(user, "age");
//! let one = model.literal("1", "int");
//! let expr = model.math(age, MathOp::Add, one);
//!
//! let forward = compiler.compile(&model, expr).unwrap();
//! assert_eq!(forward.code, "(user.age) + (1)");
//!
//! let inverse = compiler
//!     .compile_inverse(&model, expr, &BindingContext::new("MainBinding"), "value")
//!     .unwrap();
//! assert_eq!(inverse.code, "user.setAge((value) - (1))");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod compiler;
pub mod config;
pub mod logger;

pub use bindexpr_codegen as codegen;
pub use bindexpr_core as expr;
pub use bindexpr_invert as invert;
pub use bindexpr_types as types;

pub use compiler::{BindingCompiler, BindingReport, CompiledExpr, Diagnostic, InverseBinding};
pub use config::CompilerConfig;

/// Commonly used items.
pub mod prelude {
    pub use crate::compiler::{BindingCompiler, BindingReport, CompiledExpr, InverseBinding};
    pub use crate::config::CompilerConfig;
    pub use bindexpr_core::{
        BindingContext, Env, ExprError, ExprKind, ExprModel, MathOp, NodeId, UnaryOp, Value,
    };
    pub use bindexpr_types::{BuiltinTypes, Ty, TypeResolver};
}
