//! Type-safe expression handles.
//!
//! Handles are 32-bit indices into the arena. Because the arena hash-conses
//! its nodes, two handles are equal if and only if they refer to
//! structurally identical expressions.

use std::fmt;

/// A handle to an expression stored in an [`ExprArena`](crate::ExprArena).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    /// Creates a handle from a raw arena index.
    #[must_use]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
