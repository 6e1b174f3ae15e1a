//! # bindexpr-invert
//!
//! Symbolic inversion for two-way bindings.
//!
//! Given an expression bound to a view attribute and the attribute's new
//! value, the [`Inverter`] solves for the value that must be written into the
//! expression's single dynamic leaf. Only linear rearrangement of `+ - * /`
//! is supported, plus the self-inverse unary operators, casts and grouping.
//!
//! ## Example
//!
//! ```rust
//! use bindexpr_core::{BindingContext, Env, ExprModel, MathOp, Value};
//! use bindexpr_invert::Inverter;
//! use bindexpr_types::BuiltinTypes;
//!
//! let types = BuiltinTypes::new();
//! let mut source = ExprModel::new();
//! let c = source.literal("10", "int");
//! let x = source.identifier("x", "int");
//! let expr = source.math(c, MathOp::Add, x);
//!
//! let mut working = ExprModel::new();
//! let value = working.identifier("value", "int");
//! let assignment = Inverter::new(&source, &types)
//!     .invert(expr, value, &mut working, &BindingContext::new("MainBinding"))
//!     .unwrap();
//!
//! let env = Env::new().with("value", Value::Int(25));
//! assert_eq!(working.evaluate(assignment, &env), Ok(Value::Int(15)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod inverter;
pub mod rearrange;
pub mod side;

mod proptests;

pub use inverter::{Inverter, DEFAULT_MAX_DEPTH};
pub use rearrange::rearrange;
pub use side::DynamicSide;
