//! # bindexpr-codegen
//!
//! Generates target-language code for binding expressions.
//!
//! The [`CodeEmitter`] trait is the boundary to whatever assembles the
//! generated glue classes; [`CodeBuffer`] is a ready-made implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod emitter;
pub mod generate;

pub use emitter::{CodeBuffer, CodeEmitter};
pub use generate::{generate, generate_string, CodegenOptions};
