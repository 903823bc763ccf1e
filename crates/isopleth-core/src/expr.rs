//! Expression node types and operator dispatch.
//!
//! The node set is a closed variant: numeric literals, named variables,
//! the two reserved unknowns, unary and binary operations, and flattened
//! variadic `+`/`*` chains. Operator behavior is dispatched by exhaustive
//! `match` so that adding an operator is a compile error until every
//! pipeline stage handles it.

use smallvec::SmallVec;

use crate::handle::ExprId;
use crate::real::Real;

/// The two reserved unknowns of the plotting plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

impl Axis {
    /// The identifier the evaluation runtime binds for this axis.
    #[must_use]
    pub const fn name(self) -> char {
        match self {
            Axis::X => 'x',
            Axis::Y => 'y',
        }
    }

    /// Maps `'x'`/`'y'` to an axis.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'x' => Some(Axis::X),
            'y' => Some(Axis::Y),
            _ => None,
        }
    }
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Round toward negative infinity.
    Floor,
    /// Absolute value.
    Abs,
    /// Round toward positive infinity.
    Ceil,
    /// Base-10 logarithm.
    Log10,
    /// Natural logarithm.
    Ln,
    /// Square root.
    Sqrt,
}

impl UnaryOp {
    /// Looks up the operator for a surface-syntax macro name.
    #[must_use]
    pub fn from_macro(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(UnaryOp::Sin),
            "cos" => Some(UnaryOp::Cos),
            "tan" => Some(UnaryOp::Tan),
            "floor" => Some(UnaryOp::Floor),
            "abs" => Some(UnaryOp::Abs),
            "ceil" => Some(UnaryOp::Ceil),
            "log" => Some(UnaryOp::Log10),
            "ln" => Some(UnaryOp::Ln),
            "sqrt" => Some(UnaryOp::Sqrt),
            _ => None,
        }
    }

    /// The surface-syntax spelling, used in diagnostics.
    #[must_use]
    pub const fn macro_name(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Floor => "floor",
            UnaryOp::Abs => "abs",
            UnaryOp::Ceil => "ceil",
            UnaryOp::Log10 => "log",
            UnaryOp::Ln => "ln",
            UnaryOp::Sqrt => "sqrt",
        }
    }

    /// Applies the operator to a resolved numeric child.
    #[must_use]
    pub fn apply(self, a: f64) -> f64 {
        match self {
            UnaryOp::Neg => -a,
            UnaryOp::Sin => a.sin(),
            UnaryOp::Cos => a.cos(),
            UnaryOp::Tan => a.tan(),
            UnaryOp::Floor => a.floor(),
            UnaryOp::Abs => a.abs(),
            UnaryOp::Ceil => a.ceil(),
            UnaryOp::Log10 => a.log10(),
            UnaryOp::Ln => a.ln(),
            UnaryOp::Sqrt => a.sqrt(),
        }
    }
}

/// Binary operators.
///
/// `Equal` is only legal at the root of an equation; every pipeline stage
/// rejects it anywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition.
    Add,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation.
    Pow,
    /// Top-level equation marker.
    Equal,
}

impl BinaryOp {
    /// Applies the operator to two resolved numeric operands.
    ///
    /// Returns `None` for `Equal`, which has no numeric interpretation.
    #[must_use]
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            BinaryOp::Add => Some(a + b),
            BinaryOp::Mul => Some(a * b),
            BinaryOp::Div => Some(a / b),
            BinaryOp::Pow => Some(a.powf(b)),
            BinaryOp::Equal => None,
        }
    }
}

/// Variadic operators. Only `+` and `*` chains flatten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NaryOp {
    /// Addition chain.
    Add,
    /// Multiplication chain.
    Mul,
}

impl NaryOp {
    /// Folds two resolved operands.
    #[must_use]
    pub fn fold(self, a: f64, b: f64) -> f64 {
        match self {
            NaryOp::Add => a + b,
            NaryOp::Mul => a * b,
        }
    }

    /// The infix spelling in generated code.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            NaryOp::Add => '+',
            NaryOp::Mul => '*',
        }
    }
}

/// An expression node stored in the arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A numeric literal.
    Number(Real),
    /// A named constant, resolved through the session's variable registry.
    Variable(char),
    /// A free placeholder for one of the two reserved unknowns.
    Unknown(Axis),
    /// A unary operation.
    Unary(UnaryOp, ExprId),
    /// A binary operation.
    Binary(BinaryOp, ExprId, ExprId),
    /// A flattened variadic chain. Never has exactly one child after
    /// simplification.
    Nary(NaryOp, SmallVec<[ExprId; 4]>),
}

impl Expr {
    /// Returns true if this node has no children.
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            Expr::Number(_) | Expr::Variable(_) | Expr::Unknown(_)
        )
    }

    /// Returns the literal value if this node is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(r) => Some(r.get()),
            _ => None,
        }
    }
}

/// Which reserved unknowns a subtree mentions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unknowns {
    /// The subtree mentions `x`.
    pub x: bool,
    /// The subtree mentions `y`.
    pub y: bool,
}

impl Unknowns {
    /// Combines usage from two subtrees.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            x: self.x || other.x,
            y: self.y || other.y,
        }
    }

    /// Returns true if either unknown appears.
    #[must_use]
    pub const fn any(self) -> bool {
        self.x || self.y
    }
}
