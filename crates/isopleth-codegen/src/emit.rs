//! The fragment emitter.

use isopleth_core::{BinaryOp, Expr, ExprArena, ExprId, UnaryOp, Variables};
use thiserror::Error;
use tracing::debug;

/// Hard capacity of the runtime's denominator sign mask.
pub const MAX_DENOMINATORS: usize = 32;

/// Errors produced during code generation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    /// Nothing to solve for: the tree mentions neither `x` nor `y`.
    #[error("the expression doesn't have any unknowns")]
    NoUnknowns,

    /// A variable with no registry entry at compile time.
    #[error("there is no variable called `{0}`")]
    UndefinedVariable(char),

    /// The expression needs more denominator slots than the mask holds.
    #[error("an expression can't have more than {MAX_DENOMINATORS} denominators")]
    TooManyDenominators,

    /// A variadic chain with fewer than two operands reached the emitter.
    #[error("a variadic chain can't have fewer than two operands")]
    MalformedNary,

    /// An `Equal` below the root.
    #[error("`=` is not an operation inside an expression")]
    NestedEqual,
}

/// A generated GLSL fragment.
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    /// The statements to splice into the runtime's dispatch, ending with
    /// the `ret.x` assignment of the primary expression's sign.
    pub code: String,
    /// The defining expression of each denominator slot, in allocation
    /// order. The runtime packs their signs into `ret.y`, most recently
    /// allocated slot in the least significant position.
    pub denominators: Vec<String>,
}

/// Compiles a simplified tree into a fragment for `slot`.
///
/// An `Equal` root compiles as `left - right`. A plain expression using
/// only one unknown is solved against the missing one (`expr - y` for an
/// `x`-only expression); one using both is taken as the implicit curve
/// `expr = 0`.
pub fn compile(
    arena: &ExprArena,
    variables: &Variables,
    root: ExprId,
    slot: u32,
) -> Result<Fragment, CodegenError> {
    let unknowns = arena.unknowns(root);
    if !unknowns.any() {
        return Err(CodegenError::NoUnknowns);
    }

    let mut emitter = Emitter {
        arena,
        variables,
        slot,
        denominators: Vec::new(),
    };

    let code = match arena.get(root) {
        Expr::Binary(BinaryOp::Equal, left, right) => {
            let left = emitter.node(*left)?;
            let right = emitter.node(*right)?;
            format!("{left} - {right}")
        }
        _ => {
            let body = emitter.node(root)?;
            if !unknowns.x {
                format!("{body} - x")
            } else if !unknowns.y {
                format!("{body} - y")
            } else {
                body
            }
        }
    };

    let fragment = emitter.finish(&code);
    debug!(
        slot,
        denominators = fragment.denominators.len(),
        "compiled fragment"
    );
    Ok(fragment)
}

struct Emitter<'a> {
    arena: &'a ExprArena,
    variables: &'a Variables,
    slot: u32,
    denominators: Vec<String>,
}

impl Emitter<'_> {
    fn node(&mut self, id: ExprId) -> Result<String, CodegenError> {
        match self.arena.get(id).clone() {
            Expr::Number(r) => Ok(float_literal(r.get())),

            Expr::Variable(name) => match self.variables.get(name) {
                Some(value) => Ok(float_literal(value)),
                None => Err(CodegenError::UndefinedVariable(name)),
            },

            Expr::Unknown(axis) => Ok(axis.name().to_string()),

            Expr::Unary(op, child) => {
                let child = self.node(child)?;
                Ok(match op {
                    UnaryOp::Neg => format!("-{child}"),
                    UnaryOp::Sin => format!("sin({child})"),
                    UnaryOp::Cos => format!("cos({child})"),
                    UnaryOp::Floor => format!("floor({child})"),
                    UnaryOp::Abs => format!("abs({child})"),
                    UnaryOp::Ceil => format!("ceil({child})"),
                    UnaryOp::Log10 => format!("log10({child})"),
                    UnaryOp::Ln => format!("ln({child})"),
                    UnaryOp::Sqrt => format!("sqrtf({child})"),
                    // The runtime has no tangent primitive; synthesize it
                    // through a guarded division so asymptotes are tracked.
                    UnaryOp::Tan => {
                        self.division(&format!("sin({child})"), format!("cos({child})"))?
                    }
                })
            }

            Expr::Binary(op, left, right) => match op {
                BinaryOp::Div => {
                    let numerator = self.node(left)?;
                    let denominator = self.node(right)?;
                    self.division(&numerator, denominator)
                }
                BinaryOp::Pow => {
                    if let Some(exponent) = integer_exponent(self.arena.get(right)) {
                        let base = self.node(left)?;
                        self.integer_power(&base, exponent)
                    } else {
                        let base = self.node(left)?;
                        let exponent = self.node(right)?;
                        Ok(format!("pow({base}, {exponent})"))
                    }
                }
                BinaryOp::Add => {
                    let left = self.node(left)?;
                    let right = self.node(right)?;
                    Ok(format!("({left} + {right})"))
                }
                BinaryOp::Mul => {
                    let left = self.node(left)?;
                    let right = self.node(right)?;
                    Ok(format!("({left} * {right})"))
                }
                BinaryOp::Equal => Err(CodegenError::NestedEqual),
            },

            Expr::Nary(op, children) => {
                if children.len() < 2 {
                    return Err(CodegenError::MalformedNary);
                }
                let mut code = self.node(children[0])?;
                for &child in &children[1..] {
                    let operand = self.node(child)?;
                    code.push(' ');
                    code.push(op.symbol());
                    code.push(' ');
                    code.push_str(&operand);
                }
                Ok(format!("({code})"))
            }
        }
    }

    /// Allocates a denominator slot and divides through it.
    fn division(
        &mut self,
        numerator: &str,
        denominator: String,
    ) -> Result<String, CodegenError> {
        if self.denominators.len() == MAX_DENOMINATORS {
            return Err(CodegenError::TooManyDenominators);
        }
        self.denominators.push(denominator);
        Ok(format!(
            "({numerator} / var_{}_{})",
            self.slot,
            self.denominators.len() - 1
        ))
    }

    /// Unrolls a literal integer exponent into repeated multiplication.
    ///
    /// Negative exponents reciprocate through the division path so the
    /// denominator's sign is tracked like any other.
    fn integer_power(&mut self, base: &str, exponent: i64) -> Result<String, CodegenError> {
        if exponent == 0 {
            return Ok("1.0".to_string());
        }
        if exponent < 0 {
            let magnitude = self.integer_power(base, -exponent)?;
            return self.division("1.0", magnitude);
        }

        let mut code = base.to_string();
        for _ in 1..exponent {
            code.push_str(" * ");
            code.push_str(base);
        }
        Ok(code)
    }

    /// Declares every denominator slot, folds its sign into the mask, then
    /// assigns the primary magnitude's sign.
    fn finish(self, code: &str) -> Fragment {
        let mut out = String::new();
        for (i, denominator) in self.denominators.iter().enumerate() {
            out.push_str(&format!(
                "\n        float var_{slot}_{i} = {denominator};\n        ret.y <<= 1;\n        ret.y |= int(fneg(var_{slot}_{i}));",
                slot = self.slot,
            ));
        }
        out.push_str(&format!("\n        ret.x = int(fneg({code}));"));

        Fragment {
            code: out,
            denominators: self.denominators,
        }
    }
}

/// The exponent as an integer, if it is a finite literal with no
/// fractional part.
fn integer_exponent(expr: &Expr) -> Option<i64> {
    let value = expr.as_number()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 2e9 {
        Some(value as i64)
    } else {
        None
    }
}

/// A literal in the runtime's spelling; integral values keep a decimal
/// point so GLSL reads them as floats.
fn float_literal(value: f64) -> String {
    if value.is_finite() && value == value.trunc() {
        format!("float({value:.1})")
    } else {
        format!("float({value})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use isopleth_core::Axis;
    use smallvec::smallvec;

    fn context() -> (ExprArena, Variables) {
        (ExprArena::new(), Variables::new())
    }

    #[test]
    fn explicit_equation_compiles_left_minus_right() {
        let (mut arena, vars) = context();

        // y = x^2
        let x = arena.unknown(Axis::X);
        let y = arena.unknown(Axis::Y);
        let two = arena.number(2.0);
        let square = arena.binary(BinaryOp::Pow, x, two);
        let root = arena.binary(BinaryOp::Equal, y, square);

        let fragment = compile(&arena, &vars, root, 0).unwrap();
        assert_eq!(fragment.code, "\n        ret.x = int(fneg(y - x * x));");
        assert!(fragment.denominators.is_empty());
    }

    #[test]
    fn missing_unknown_becomes_the_dependent_variable() {
        let (mut arena, vars) = context();

        // x^2 alone solves against y.
        let x = arena.unknown(Axis::X);
        let two = arena.number(2.0);
        let square = arena.binary(BinaryOp::Pow, x, two);

        let fragment = compile(&arena, &vars, square, 3).unwrap();
        assert_eq!(fragment.code, "\n        ret.x = int(fneg(x * x - y));");

        // y alone solves against x.
        let y = arena.unknown(Axis::Y);
        let fragment = compile(&arena, &vars, y, 3).unwrap();
        assert_eq!(fragment.code, "\n        ret.x = int(fneg(y - x));");
    }

    #[test]
    fn no_unknowns_is_rejected() {
        let (mut arena, vars) = context();

        let a = arena.variable('a');
        assert_eq!(
            compile(&arena, &vars, a, 0),
            Err(CodegenError::NoUnknowns)
        );
    }

    #[test]
    fn undefined_variable_is_named() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let k = arena.variable('k');
        let sum = arena.add(smallvec![x, k]);

        assert_eq!(
            compile(&arena, &vars, sum, 0),
            Err(CodegenError::UndefinedVariable('k'))
        );
    }

    #[test]
    fn resolved_variables_lower_as_literals() {
        let (mut arena, mut vars) = context();
        vars.set('a', 2.5);
        vars.set('z', 0.0);

        let x = arena.unknown(Axis::X);
        let a = arena.variable('a');
        let z = arena.variable('z');
        let sum = arena.add(smallvec![x, a, z]);

        let fragment = compile(&arena, &vars, sum, 0).unwrap();
        assert_eq!(
            fragment.code,
            "\n        ret.x = int(fneg((x + float(2.5) + float(0.0)) - y));"
        );
    }

    #[test]
    fn division_allocates_slots_in_order() {
        let (mut arena, vars) = context();

        // 1/(x-1) + 1/(x-2)
        let x = arena.unknown(Axis::X);
        let one = arena.number(1.0);
        let two = arena.number(2.0);
        let neg_one = arena.unary(UnaryOp::Neg, one);
        let neg_two = arena.unary(UnaryOp::Neg, two);
        let den_a = arena.add(smallvec![x, neg_one]);
        let den_b = arena.add(smallvec![x, neg_two]);
        let div_a = arena.binary(BinaryOp::Div, one, den_a);
        let div_b = arena.binary(BinaryOp::Div, one, den_b);
        let sum = arena.add(smallvec![div_a, div_b]);

        let fragment = compile(&arena, &vars, sum, 7).unwrap();

        assert_eq!(
            fragment.denominators,
            vec![
                "(x + -float(1.0))".to_string(),
                "(x + -float(2.0))".to_string(),
            ]
        );
        // Mask accumulation follows allocation order: slot 0 shifts first,
        // leaving the most recent slot in the least significant bit.
        let expected = "\n        float var_7_0 = (x + -float(1.0));\n        ret.y <<= 1;\n        ret.y |= int(fneg(var_7_0));\n        float var_7_1 = (x + -float(2.0));\n        ret.y <<= 1;\n        ret.y |= int(fneg(var_7_1));\n        ret.x = int(fneg(((float(1.0) / var_7_0) + (float(1.0) / var_7_1)) - y));";
        assert_eq!(fragment.code, expected);
    }

    #[test]
    fn capacity_boundary() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let one = arena.number(1.0);

        // 32 nested divisions compile.
        let mut tree = x;
        for _ in 0..32 {
            tree = arena.binary(BinaryOp::Div, one, tree);
        }
        let fragment = compile(&arena, &vars, tree, 0).unwrap();
        assert_eq!(fragment.denominators.len(), 32);

        // The 33rd fails.
        let tree = arena.binary(BinaryOp::Div, one, tree);
        assert_eq!(
            compile(&arena, &vars, tree, 0),
            Err(CodegenError::TooManyDenominators)
        );
    }

    #[test]
    fn tangent_divides_sine_by_cosine() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let tan = arena.unary(UnaryOp::Tan, x);

        let fragment = compile(&arena, &vars, tan, 0).unwrap();
        assert_eq!(fragment.denominators, vec!["cos(x)".to_string()]);
        assert!(fragment.code.contains("(sin(x) / var_0_0)"));
    }

    #[test]
    fn integer_powers_unroll() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let three = arena.number(3.0);
        let cube = arena.binary(BinaryOp::Pow, x, three);

        let fragment = compile(&arena, &vars, cube, 0).unwrap();
        assert!(fragment.code.contains("x * x * x - y"));
    }

    #[test]
    fn negative_powers_reciprocate_through_a_slot() {
        let (mut arena, vars) = context();

        // x^-2 lowers as 1/(x·x) with a denominator slot.
        let x = arena.unknown(Axis::X);
        let neg_two = arena.number(-2.0);
        let power = arena.binary(BinaryOp::Pow, x, neg_two);

        let fragment = compile(&arena, &vars, power, 0).unwrap();
        assert_eq!(fragment.denominators, vec!["x * x".to_string()]);
        assert!(fragment.code.contains("(1.0 / var_0_0)"));
    }

    #[test]
    fn non_literal_exponents_use_pow() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let half = arena.number(0.5);
        let root = arena.binary(BinaryOp::Pow, x, half);

        let fragment = compile(&arena, &vars, root, 0).unwrap();
        assert!(fragment.code.contains("pow(x, float(0.5))"));

        let y = arena.unknown(Axis::Y);
        let tower = arena.binary(BinaryOp::Pow, x, y);
        let fragment = compile(&arena, &vars, tower, 0).unwrap();
        assert!(fragment.code.contains("pow(x, y)"));
    }

    #[test]
    fn both_unknowns_without_equal_compile_as_the_implicit_curve() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let y = arena.unknown(Axis::Y);
        let product = arena.mul(smallvec![x, y]);

        let fragment = compile(&arena, &vars, product, 0).unwrap();
        assert_eq!(fragment.code, "\n        ret.x = int(fneg((x * y)));");
    }

    #[test]
    fn nested_equal_is_rejected() {
        let (mut arena, vars) = context();

        let x = arena.unknown(Axis::X);
        let y = arena.unknown(Axis::Y);
        let inner = arena.binary(BinaryOp::Equal, x, y);
        let neg = arena.unary(UnaryOp::Neg, inner);

        assert_eq!(
            compile(&arena, &vars, neg, 0),
            Err(CodegenError::NestedEqual)
        );
    }
}
