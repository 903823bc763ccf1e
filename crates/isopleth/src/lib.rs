//! # Isopleth
//!
//! A symbolic-expression compiler for an implicit-curve plotter.
//!
//! Isopleth turns a textual math expression — an equation, a plain
//! expression, or a function definition — into either a numeric constant
//! or a GLSL scalar fragment the plotting runtime evaluates per pixel.
//! The pipeline is parse → simplify → (optionally differentiate and
//! inline) → compile, with user-defined variables and functions held in a
//! per-session [`Context`].
//!
//! ## Quick Start
//!
//! ```
//! use isopleth::prelude::*;
//!
//! let mut ctx = Context::new();
//!
//! // Constant expressions fold to a value.
//! let folded = ctx.compile_expression("2+3\\cdot 4", 0).unwrap();
//! assert_eq!(folded, Evaluation::Value(14.0));
//!
//! // Anything with an unknown compiles to runtime code.
//! let curve = ctx.compile_expression("y=x^2", 1).unwrap();
//! assert!(matches!(curve, Evaluation::Code(_)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use isopleth_codegen as codegen;
pub use isopleth_core as core;
pub use isopleth_diff as diff;
pub use isopleth_parser as parser;
pub use isopleth_simplify as simplify;

mod context;
mod error;

pub use context::{Context, Evaluation};
pub use error::Error;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{Context, Error, Evaluation};
    pub use isopleth_core::{Axis, ExprArena, ExprId};
}
