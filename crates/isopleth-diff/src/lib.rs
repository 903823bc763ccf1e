//! # isopleth-diff
//!
//! Substitution and symbolic differentiation for Isopleth expression trees.
//!
//! Differentiation applies the standard rules case by case and produces a
//! deliberately unsimplified tree; callers are expected to run the
//! simplifier immediately afterward, and between repeated applications —
//! raw repeated differentiation blows up tree size combinatorially.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod derive;
pub mod substitute;

pub use derive::{differentiate, DeriveError};
pub use substitute::substitute;
