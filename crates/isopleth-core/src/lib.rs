//! # isopleth-core
//!
//! Core expression engine for the Isopleth equation compiler.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Type-safe expression handles
//! - Closed operator enumerations with exhaustive scalar dispatch
//! - The session registries for named variables and user functions
//! - A diagnostic tree renderer
//!
//! ## Design Principles
//!
//! - **Immutable nodes**: every transform produces new handles; an
//!   expression tree can never be corrupted by another expression's
//!   simplification.
//! - **Hash-consing**: structurally identical subtrees share one node, so
//!   structural equality is handle equality.
//! - **Closed dispatch**: operator behavior lives in exhaustive `match`es
//!   over small enums, not in lookup tables.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod expr;
pub mod handle;
pub mod real;
pub mod registry;
pub mod render;

pub use arena::ExprArena;
pub use expr::{Axis, BinaryOp, Expr, NaryOp, UnaryOp, Unknowns};
pub use handle::ExprId;
pub use real::Real;
pub use registry::{Function, Functions, Variables};
pub use render::render_tree;
