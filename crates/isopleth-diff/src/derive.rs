//! Symbolic differentiation with respect to the bound unknown.

use isopleth_core::{BinaryOp, Expr, ExprArena, ExprId, NaryOp, UnaryOp};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors from symbolic differentiation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeriveError {
    /// The operator has no derivative at this level of modeling.
    #[error("`{}` has no derivative over the reals", .0.macro_name())]
    NotDifferentiable(UnaryOp),

    /// An equation is not a differentiable expression.
    #[error("an equation can't be differentiated")]
    Equation,
}

/// Differentiates the subtree rooted at `id` with respect to the unknown.
///
/// The result is intentionally left unsimplified; run the simplifier on it
/// before differentiating again or handing it on.
pub fn differentiate(arena: &mut ExprArena, id: ExprId) -> Result<ExprId, DeriveError> {
    match arena.get(id).clone() {
        Expr::Unknown(_) => Ok(arena.number(1.0)),
        Expr::Number(_) | Expr::Variable(_) => Ok(arena.number(0.0)),

        Expr::Unary(op, child) => derive_unary(arena, op, child),

        Expr::Binary(op, left, right) => match op {
            BinaryOp::Pow => derive_power(arena, id, left, right),
            BinaryOp::Div => derive_quotient(arena, left, right),
            BinaryOp::Add => {
                let da = differentiate(arena, left)?;
                let db = differentiate(arena, right)?;
                Ok(arena.add(smallvec::smallvec![da, db]))
            }
            BinaryOp::Mul => {
                let da = differentiate(arena, left)?;
                let db = differentiate(arena, right)?;
                let t1 = arena.mul(smallvec::smallvec![da, right]);
                let t2 = arena.mul(smallvec::smallvec![left, db]);
                Ok(arena.add(smallvec::smallvec![t1, t2]))
            }
            BinaryOp::Equal => Err(DeriveError::Equation),
        },

        Expr::Nary(op, children) => match op {
            NaryOp::Add => {
                let mut terms: SmallVec<[ExprId; 4]> = SmallVec::new();
                for &child in &children {
                    terms.push(differentiate(arena, child)?);
                }
                Ok(arena.nary(NaryOp::Add, terms))
            }
            // Generalized product rule: sum over positions of the product
            // with that position differentiated.
            NaryOp::Mul => {
                let mut terms: SmallVec<[ExprId; 4]> = SmallVec::new();
                for i in 0..children.len() {
                    let mut product: SmallVec<[ExprId; 4]> = SmallVec::new();
                    for (j, &child) in children.iter().enumerate() {
                        if i == j {
                            product.push(differentiate(arena, child)?);
                        } else {
                            product.push(child);
                        }
                    }
                    terms.push(arena.nary(NaryOp::Mul, product));
                }
                Ok(arena.nary(NaryOp::Add, terms))
            }
        },
    }
}

fn derive_unary(
    arena: &mut ExprArena,
    op: UnaryOp,
    child: ExprId,
) -> Result<ExprId, DeriveError> {
    match op {
        UnaryOp::Neg => {
            let d = differentiate(arena, child)?;
            Ok(arena.unary(UnaryOp::Neg, d))
        }

        // f'/f
        UnaryOp::Ln => {
            let d = differentiate(arena, child)?;
            Ok(arena.binary(BinaryOp::Div, d, child))
        }

        // cos(f)·f'
        UnaryOp::Sin => {
            let cos = arena.unary(UnaryOp::Cos, child);
            let d = differentiate(arena, child)?;
            Ok(arena.mul(smallvec::smallvec![cos, d]))
        }

        // -sin(f)·f'
        UnaryOp::Cos => {
            let sin = arena.unary(UnaryOp::Sin, child);
            let neg_sin = arena.unary(UnaryOp::Neg, sin);
            let d = differentiate(arena, child)?;
            Ok(arena.mul(smallvec::smallvec![neg_sin, d]))
        }

        // f'/cos(f)²
        UnaryOp::Tan => {
            let d = differentiate(arena, child)?;
            let cos = arena.unary(UnaryOp::Cos, child);
            let cos_squared = arena.mul(smallvec::smallvec![cos, cos]);
            Ok(arena.binary(BinaryOp::Div, d, cos_squared))
        }

        // f'/(2·√f)
        UnaryOp::Sqrt => {
            let d = differentiate(arena, child)?;
            let two = arena.number(2.0);
            let sqrt = arena.unary(UnaryOp::Sqrt, child);
            let den = arena.mul(smallvec::smallvec![two, sqrt]);
            Ok(arena.binary(BinaryOp::Div, d, den))
        }

        // f'/(ln10·f)
        UnaryOp::Log10 => {
            let d = differentiate(arena, child)?;
            let ln10 = arena.number(std::f64::consts::LN_10);
            let den = arena.mul(smallvec::smallvec![ln10, child]);
            Ok(arena.binary(BinaryOp::Div, d, den))
        }

        UnaryOp::Floor | UnaryOp::Abs | UnaryOp::Ceil => {
            Err(DeriveError::NotDifferentiable(op))
        }
    }
}

/// Power rule for a literal exponent, general exponential rule otherwise.
fn derive_power(
    arena: &mut ExprArena,
    node: ExprId,
    base: ExprId,
    exponent: ExprId,
) -> Result<ExprId, DeriveError> {
    if let Some(a) = arena.get(exponent).as_number() {
        // a·f^(a-1)·f'
        let coefficient = arena.number(a);
        let reduced = arena.number(a - 1.0);
        let power = arena.binary(BinaryOp::Pow, base, reduced);
        let d = differentiate(arena, base)?;
        Ok(arena.mul(smallvec::smallvec![coefficient, power, d]))
    } else {
        // f^g·(g'·ln f + g·f'/f)
        let dg = differentiate(arena, exponent)?;
        let ln_f = arena.unary(UnaryOp::Ln, base);
        let t1 = arena.mul(smallvec::smallvec![dg, ln_f]);

        let df = differentiate(arena, base)?;
        let df_over_f = arena.binary(BinaryOp::Div, df, base);
        let t2 = arena.mul(smallvec::smallvec![exponent, df_over_f]);

        let chain = arena.add(smallvec::smallvec![t1, t2]);
        Ok(arena.mul(smallvec::smallvec![node, chain]))
    }
}

/// Quotient rule: (f'·g − f·g')/g².
fn derive_quotient(
    arena: &mut ExprArena,
    numerator: ExprId,
    denominator: ExprId,
) -> Result<ExprId, DeriveError> {
    let df = differentiate(arena, numerator)?;
    let dg = differentiate(arena, denominator)?;

    let t1 = arena.mul(smallvec::smallvec![df, denominator]);
    let t2 = arena.mul(smallvec::smallvec![numerator, dg]);
    let neg_t2 = arena.unary(UnaryOp::Neg, t2);
    let num = arena.add(smallvec::smallvec![t1, neg_t2]);

    let den = arena.mul(smallvec::smallvec![denominator, denominator]);
    Ok(arena.binary(BinaryOp::Div, num, den))
}
