//! Session registries for named variables and user functions.
//!
//! Both registries are keyed by single-letter names with last-write-wins
//! semantics. They are owned by the session context and threaded into the
//! pipeline stages that need them; there is no global state.

use hashbrown::HashMap;

use crate::expr::Axis;
use crate::handle::ExprId;

/// Named numeric constants.
///
/// Entries are written when a variable definition compiles to a constant
/// and removed explicitly on deletion. The simplifier reads this table to
/// fold `Variable` nodes into literals.
#[derive(Clone, Debug, Default)]
pub struct Variables {
    map: HashMap<char, f64>,
}

impl Variables {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a binding.
    pub fn set(&mut self, name: char, value: f64) {
        self.map.insert(name, value);
    }

    /// Removes a binding, returning its value if it existed.
    pub fn remove(&mut self, name: char) -> Option<f64> {
        self.map.remove(&name)
    }

    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: char) -> Option<f64> {
        self.map.get(&name).copied()
    }

    /// Returns true if the name is bound.
    #[must_use]
    pub fn contains(&self, name: char) -> bool {
        self.map.contains_key(&name)
    }
}

/// A registered single-argument user function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Function {
    /// The bound unknown the body is written in.
    pub unknown: Axis,
    /// The simplified body, with the unknown left free.
    pub body: ExprId,
}

/// User-defined functions, keyed by display name.
///
/// The parser consults this table to inline calls. Redefinition does not
/// retroactively touch trees that already inlined the old body; those are
/// independent copies by construction of substitution.
#[derive(Clone, Debug, Default)]
pub struct Functions {
    map: HashMap<char, Function>,
}

impl Functions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a definition.
    pub fn set(&mut self, name: char, function: Function) {
        self.map.insert(name, function);
    }

    /// Removes a definition, returning it if it existed.
    pub fn remove(&mut self, name: char) -> Option<Function> {
        self.map.remove(&name)
    }

    /// Looks up a definition.
    #[must_use]
    pub fn get(&self, name: char) -> Option<Function> {
        self.map.get(&name).copied()
    }

    /// Returns true if the name is defined.
    #[must_use]
    pub fn contains(&self, name: char) -> bool {
        self.map.contains_key(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut vars = Variables::new();
        vars.set('a', 1.0);
        vars.set('a', 2.0);
        assert_eq!(vars.get('a'), Some(2.0));

        assert_eq!(vars.remove('a'), Some(2.0));
        assert_eq!(vars.remove('a'), None);
        assert!(!vars.contains('a'));
    }

    #[test]
    fn zero_is_a_value() {
        // A binding to 0 is still a binding.
        let mut vars = Variables::new();
        vars.set('k', 0.0);
        assert_eq!(vars.get('k'), Some(0.0));
    }
}
