//! Structural substitution of the bound unknown.

use isopleth_core::{Expr, ExprArena, ExprId};
use smallvec::SmallVec;

/// Replaces every `Unknown` in `body` with `replacement`.
///
/// This is how user-function calls are inlined: the stored body keeps its
/// unknown free, and each call site substitutes its argument subtree. The
/// result is an independent copy; later registry changes never reach it.
pub fn substitute(arena: &mut ExprArena, body: ExprId, replacement: ExprId) -> ExprId {
    match arena.get(body).clone() {
        Expr::Unknown(_) => replacement,
        Expr::Number(_) | Expr::Variable(_) => body,
        Expr::Unary(op, child) => {
            let child = substitute(arena, child, replacement);
            arena.unary(op, child)
        }
        Expr::Binary(op, left, right) => {
            let left = substitute(arena, left, replacement);
            let right = substitute(arena, right, replacement);
            arena.binary(op, left, right)
        }
        Expr::Nary(op, children) => {
            let children: SmallVec<[ExprId; 4]> = children
                .iter()
                .map(|&c| substitute(arena, c, replacement))
                .collect();
            arena.nary(op, children)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isopleth_core::{Axis, BinaryOp};
    use smallvec::smallvec;

    #[test]
    fn replaces_every_unknown() {
        let mut arena = ExprArena::new();

        // x^2 + x
        let x = arena.unknown(Axis::X);
        let two = arena.number(2.0);
        let square = arena.binary(BinaryOp::Pow, x, two);
        let body = arena.add(smallvec![square, x]);

        let three = arena.number(3.0);
        let inlined = substitute(&mut arena, body, three);

        let expected_square = arena.binary(BinaryOp::Pow, three, two);
        let expected = arena.add(smallvec![expected_square, three]);
        assert_eq!(inlined, expected);
    }

    #[test]
    fn atoms_pass_through() {
        let mut arena = ExprArena::new();

        let a = arena.variable('a');
        let y = arena.unknown(Axis::Y);
        assert_eq!(substitute(&mut arena, a, y), a);

        let n = arena.number(4.0);
        assert_eq!(substitute(&mut arena, n, y), n);
    }

    #[test]
    fn argument_can_be_a_subtree() {
        let mut arena = ExprArena::new();

        // body: sin(x), argument: y + 1
        let x = arena.unknown(Axis::X);
        let body = arena.unary(isopleth_core::UnaryOp::Sin, x);

        let y = arena.unknown(Axis::Y);
        let one = arena.number(1.0);
        let arg = arena.add(smallvec![y, one]);

        let inlined = substitute(&mut arena, body, arg);
        let expected = arena.unary(isopleth_core::UnaryOp::Sin, arg);
        assert_eq!(inlined, expected);
    }
}
