//! Arena allocator for expression storage.
//!
//! All expressions live contiguously in a `Vec`, with hash-consing ensuring
//! each structurally unique expression is stored exactly once. Nodes are
//! never mutated after interning, so subtree sharing between independently
//! compiled expressions is safe.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::expr::{Axis, BinaryOp, Expr, NaryOp, UnaryOp, Unknowns};
use crate::handle::ExprId;

/// The arena all pipeline stages allocate into.
#[derive(Debug, Default)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<Expr>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<Expr, ExprId>,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    pub fn intern(&mut self, node: Expr) -> ExprId {
        if let Some(&id) = self.intern_map.get(&node) {
            return id;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "arena capacity exceeded");

        let id = ExprId::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, id);
        id
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle belongs to a different arena.
    #[must_use]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.nodes[id.index() as usize]
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reports which reserved unknowns appear in the subtree.
    #[must_use]
    pub fn unknowns(&self, id: ExprId) -> Unknowns {
        match self.get(id) {
            Expr::Number(_) | Expr::Variable(_) => Unknowns::default(),
            Expr::Unknown(axis) => Unknowns {
                x: *axis == Axis::X,
                y: *axis == Axis::Y,
            },
            Expr::Unary(_, child) => self.unknowns(*child),
            Expr::Binary(_, left, right) => {
                self.unknowns(*left).union(self.unknowns(*right))
            }
            Expr::Nary(_, children) => children
                .iter()
                .fold(Unknowns::default(), |acc, &c| acc.union(self.unknowns(c))),
        }
    }

    // === Convenience constructors ===

    /// Creates a numeric literal.
    pub fn number(&mut self, value: f64) -> ExprId {
        self.intern(Expr::Number(value.into()))
    }

    /// Creates a named-variable reference.
    pub fn variable(&mut self, name: char) -> ExprId {
        self.intern(Expr::Variable(name))
    }

    /// Creates an unknown placeholder.
    pub fn unknown(&mut self, axis: Axis) -> ExprId {
        self.intern(Expr::Unknown(axis))
    }

    /// Creates a unary operation.
    pub fn unary(&mut self, op: UnaryOp, child: ExprId) -> ExprId {
        self.intern(Expr::Unary(op, child))
    }

    /// Creates a binary operation.
    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.intern(Expr::Binary(op, left, right))
    }

    /// Creates a variadic chain. A single-element list collapses to that
    /// element rather than wrapping it.
    pub fn nary(&mut self, op: NaryOp, children: impl Into<SmallVec<[ExprId; 4]>>) -> ExprId {
        let children = children.into();
        debug_assert!(!children.is_empty(), "empty variadic chain");
        if children.len() == 1 {
            return children[0];
        }
        self.intern(Expr::Nary(op, children))
    }

    /// Creates an addition chain.
    pub fn add(&mut self, children: impl Into<SmallVec<[ExprId; 4]>>) -> ExprId {
        self.nary(NaryOp::Add, children)
    }

    /// Creates a multiplication chain.
    pub fn mul(&mut self, children: impl Into<SmallVec<[ExprId; 4]>>) -> ExprId {
        self.nary(NaryOp::Mul, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn hash_consing() {
        let mut arena = ExprArena::new();

        let x = arena.unknown(Axis::X);
        let one = arena.number(1.0);

        // Create (x + 1) twice; hash-consing must return the same handle.
        let sum1 = arena.add(smallvec![x, one]);
        let sum2 = arena.add(smallvec![x, one]);
        assert_eq!(sum1, sum2);

        // Arena holds exactly 3 nodes: x, 1, (x + 1).
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn singleton_chain_collapses() {
        let mut arena = ExprArena::new();
        let x = arena.unknown(Axis::X);
        assert_eq!(arena.mul(smallvec![x]), x);
    }

    #[test]
    fn unknown_usage_walk() {
        let mut arena = ExprArena::new();

        let x = arena.unknown(Axis::X);
        let y = arena.unknown(Axis::Y);
        let a = arena.variable('a');
        let sum = arena.add(smallvec![x, a]);

        assert_eq!(arena.unknowns(sum), Unknowns { x: true, y: false });

        let eq = arena.binary(BinaryOp::Equal, sum, y);
        assert_eq!(arena.unknowns(eq), Unknowns { x: true, y: true });

        assert!(!arena.unknowns(a).any());
    }
}
