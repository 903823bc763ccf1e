//! # isopleth-simplify
//!
//! Bottom-up algebraic simplification for Isopleth expression trees.
//!
//! This is deliberately a single constant-folding pass, not a rewrite
//! search: it folds constant subexpressions, flattens associative `+`/`*`
//! chains, and removes the `×1`, `×0`, `+0` identities. The pass is
//! idempotent — a second application returns the identical handle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
mod proptests;

pub use engine::simplify;
