//! # isopleth-codegen
//!
//! Lowers a simplified expression tree into a GLSL scalar fragment for the
//! plotting runtime.
//!
//! The runtime evaluates fragments per pixel with `x`/`y` bound and only
//! offers addition, multiplication, negation, a handful of unary
//! primitives, and guarded division through numbered "denominator" slots.
//! Every division (and every negative integer power, which routes through
//! division) allocates a slot; each slot's sign is packed into an output
//! mask so the rasterizer can detect sign flips across neighboring samples
//! without recomputing denominators.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod emit;

pub use emit::{compile, CodegenError, Fragment, MAX_DENOMINATORS};
