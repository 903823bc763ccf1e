//! The simplification pass.

use isopleth_core::{BinaryOp, Expr, ExprArena, ExprId, NaryOp, Variables};
use smallvec::SmallVec;

/// Simplifies the subtree rooted at `id`, bottom-up.
///
/// Returns the rewritten handle and, when the whole subtree reduced to a
/// literal, its numeric value — so callers can short-circuit without
/// re-walking the result. An unresolved `Variable` is not an error here;
/// it simply carries no value until compile time.
pub fn simplify(
    arena: &mut ExprArena,
    variables: &Variables,
    id: ExprId,
) -> (ExprId, Option<f64>) {
    match arena.get(id).clone() {
        Expr::Number(r) => (id, Some(r.get())),
        Expr::Unknown(_) => (id, None),
        Expr::Variable(name) => (id, variables.get(name)),

        Expr::Unary(op, child) => {
            let (child, value) = simplify(arena, variables, child);
            match value {
                Some(v) => {
                    let folded = op.apply(v);
                    (arena.number(folded), Some(folded))
                }
                None => (arena.unary(op, child), None),
            }
        }

        Expr::Binary(op, left, right) => {
            let (left, lhs) = simplify(arena, variables, left);
            let (right, rhs) = simplify(arena, variables, right);

            match (lhs, rhs) {
                (Some(a), Some(b)) => match op.apply(a, b) {
                    Some(v) => (arena.number(v), Some(v)),
                    // `Equal` roots have no numeric interpretation.
                    None => (arena.binary(op, left, right), None),
                },
                (None, Some(exponent)) if op == BinaryOp::Pow => {
                    if exponent == 0.0 {
                        (arena.number(1.0), Some(1.0))
                    } else if exponent == 1.0 {
                        (left, None)
                    } else {
                        (arena.binary(op, left, right), None)
                    }
                }
                _ => (arena.binary(op, left, right), None),
            }
        }

        Expr::Nary(op, children) => simplify_nary(arena, variables, op, &children),
    }
}

fn fold_into(op: NaryOp, acc: &mut Option<f64>, value: f64) {
    *acc = Some(match *acc {
        Some(folded) => op.fold(folded, value),
        None => value,
    });
}

fn simplify_nary(
    arena: &mut ExprArena,
    variables: &Variables,
    op: NaryOp,
    children: &[ExprId],
) -> (ExprId, Option<f64>) {
    // Flatten same-operator chains into this node's child list.
    let mut flat: Vec<ExprId> = Vec::with_capacity(children.len());
    let mut pending: Vec<ExprId> = children.iter().rev().copied().collect();
    while let Some(child) = pending.pop() {
        match arena.get(child) {
            Expr::Nary(inner, inner_children) if *inner == op => {
                pending.extend(inner_children.iter().rev().copied());
            }
            _ => flat.push(child),
        }
    }

    // Simplify every child, folding the numeric ones into one constant.
    let mut symbolic: SmallVec<[ExprId; 4]> = SmallVec::new();
    let mut folded: Option<f64> = None;
    for child in flat {
        let (child, value) = simplify(arena, variables, child);
        if let Some(v) = value {
            fold_into(op, &mut folded, v);
            continue;
        }
        // A simplified child can itself be a same-operator chain when an
        // intermediate wrapper collapsed; splice it so the result stays
        // flat and the pass idempotent.
        match arena.get(child).clone() {
            Expr::Nary(inner, inner_children) if inner == op => {
                for c in inner_children {
                    match arena.get(c).as_number() {
                        Some(v) => fold_into(op, &mut folded, v),
                        None => symbolic.push(c),
                    }
                }
            }
            _ => symbolic.push(child),
        }
    }
    if let Some(v) = folded {
        let constant = arena.number(v);
        symbolic.push(constant);
    }

    // Identity elimination.
    match op {
        NaryOp::Add => {
            symbolic.retain(|id| arena.get(*id).as_number() != Some(0.0));
        }
        NaryOp::Mul => {
            if symbolic.iter().any(|&id| arena.get(id).as_number() == Some(0.0)) {
                symbolic.clear();
            } else {
                symbolic.retain(|id| arena.get(*id).as_number() != Some(1.0));
            }
        }
    }

    match symbolic.len() {
        // An emptied chain collapses to zero, for `Mul` as well as `Add`.
        0 => (arena.number(0.0), Some(0.0)),
        1 => {
            let only = symbolic[0];
            let value = arena.get(only).as_number();
            (only, value)
        }
        _ => (arena.nary(op, symbolic), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isopleth_core::{Axis, UnaryOp};
    use smallvec::smallvec;

    fn context() -> (ExprArena, Variables) {
        (ExprArena::new(), Variables::new())
    }

    #[test]
    fn constant_folding() {
        let (mut arena, vars) = context();

        // 2 + 3 * 4
        let two = arena.number(2.0);
        let three = arena.number(3.0);
        let four = arena.number(4.0);
        let product = arena.mul(smallvec![three, four]);
        let sum = arena.add(smallvec![two, product]);

        let (id, value) = simplify(&mut arena, &vars, sum);
        assert_eq!(value, Some(14.0));
        assert_eq!(arena.get(id).as_number(), Some(14.0));
    }

    #[test]
    fn identity_elimination_returns_bare_unknown() {
        let (mut arena, vars) = context();

        // x * 1 + 0
        let x = arena.unknown(Axis::X);
        let one = arena.number(1.0);
        let zero = arena.number(0.0);
        let product = arena.mul(smallvec![x, one]);
        let sum = arena.add(smallvec![product, zero]);

        let (id, value) = simplify(&mut arena, &vars, sum);
        assert_eq!(value, None);
        assert_eq!(id, x);
    }

    #[test]
    fn zero_annihilates_products() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let zero = arena.number(0.0);
        let sin = arena.unary(UnaryOp::Sin, x);
        let product = arena.mul(smallvec![sin, zero]);

        let (_, value) = simplify(&mut arena, &vars, product);
        assert_eq!(value, Some(0.0));
    }

    #[test]
    fn emptied_product_collapses_to_zero() {
        let (mut arena, vars) = context();

        // A product whose children all fold away to the constant 1 empties
        // out and collapses to zero, same as an emptied sum.
        let a = arena.number(1.0);
        let b = arena.number(1.0);
        let product = arena.intern(Expr::Nary(NaryOp::Mul, smallvec![a, b]));

        let (_, value) = simplify(&mut arena, &vars, product);
        assert_eq!(value, Some(0.0));
    }

    #[test]
    fn power_exponent_shortcuts() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let zero = arena.number(0.0);
        let one = arena.number(1.0);

        let pow0 = arena.binary(BinaryOp::Pow, x, zero);
        let (_, value) = simplify(&mut arena, &vars, pow0);
        assert_eq!(value, Some(1.0));

        let pow1 = arena.binary(BinaryOp::Pow, x, one);
        let (id, value) = simplify(&mut arena, &vars, pow1);
        assert_eq!(value, None);
        assert_eq!(id, x);
    }

    #[test]
    fn variables_resolve_through_the_registry() {
        let (mut arena, mut vars) = context();
        vars.set('a', 2.5);

        let a = arena.variable('a');
        let two = arena.number(2.0);
        let product = arena.mul(smallvec![a, two]);

        let (_, value) = simplify(&mut arena, &vars, product);
        assert_eq!(value, Some(5.0));

        // Unregistered variables are legal here; they just carry no value.
        let b = arena.variable('b');
        let (id, value) = simplify(&mut arena, &vars, b);
        assert_eq!(value, None);
        assert_eq!(id, b);
    }

    #[test]
    fn associative_chains_flatten() {
        let (mut arena, vars) = context();

        // (x + (y + 1)) + 2 — written with nested chains.
        let x = arena.unknown(Axis::X);
        let y = arena.unknown(Axis::Y);
        let one = arena.number(1.0);
        let two = arena.number(2.0);
        let inner = arena.intern(Expr::Nary(NaryOp::Add, smallvec![y, one]));
        let middle = arena.intern(Expr::Nary(NaryOp::Add, smallvec![x, inner]));
        let outer = arena.intern(Expr::Nary(NaryOp::Add, smallvec![middle, two]));

        let (id, value) = simplify(&mut arena, &vars, outer);
        assert_eq!(value, None);

        // One flat chain: [x, y, 3].
        let three = arena.number(3.0);
        let expected = arena.add(smallvec![x, y, three]);
        assert_eq!(id, expected);
    }

    #[test]
    fn collapsed_wrapper_splices_into_parent() {
        let (mut arena, vars) = context();

        // x * (a*b + 0): the inner sum collapses to the product a*b, which
        // must splice into the outer product instead of nesting.
        let x = arena.unknown(Axis::X);
        let a = arena.variable('a');
        let b = arena.variable('b');
        let zero = arena.number(0.0);
        let ab = arena.mul(smallvec![a, b]);
        let sum = arena.intern(Expr::Nary(NaryOp::Add, smallvec![ab, zero]));
        let outer = arena.mul(smallvec![x, sum]);

        let (id, _) = simplify(&mut arena, &vars, outer);
        let expected = arena.mul(smallvec![x, a, b]);
        assert_eq!(id, expected);
    }

    #[test]
    fn idempotent_on_a_mixed_tree() {
        let (mut arena, mut vars) = context();
        vars.set('a', 3.0);

        // sin(x) * a + x^2 + 0
        let x = arena.unknown(Axis::X);
        let sin = arena.unary(UnaryOp::Sin, x);
        let a = arena.variable('a');
        let product = arena.mul(smallvec![sin, a]);
        let two = arena.number(2.0);
        let square = arena.binary(BinaryOp::Pow, x, two);
        let zero = arena.number(0.0);
        let sum = arena.add(smallvec![product, square, zero]);

        let (once, _) = simplify(&mut arena, &vars, sum);
        let (twice, _) = simplify(&mut arena, &vars, once);
        assert_eq!(once, twice);
    }
}
