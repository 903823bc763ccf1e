//! The AST builder: terms, factors, and user-function inlining.

use isopleth_core::{
    Axis, BinaryOp, ExprArena, ExprId, Function, Functions, NaryOp, UnaryOp, Variables,
};
use isopleth_diff::{differentiate, substitute};
use isopleth_simplify::simplify;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::ParseError;
use crate::sanitize::sanitize;
use crate::token::{tokenize, Token};

/// Parses an expression or equation into the arena.
///
/// At most one `=` may appear; each side parses independently and the
/// result is an `Equal` root. Registered user functions are inlined at
/// their call sites, applying the differentiator once per tick mark with a
/// simplification pass in between.
pub fn parse(
    arena: &mut ExprArena,
    variables: &Variables,
    functions: &Functions,
    text: &str,
) -> Result<ExprId, ParseError> {
    if text.contains('=') {
        let mut sides = text.split('=');
        let lhs = sides.next().unwrap_or_default();
        let rhs = sides.next().unwrap_or_default();
        if sides.next().is_some() {
            return Err(ParseError::MultipleEquals);
        }

        let lhs = parse(arena, variables, functions, lhs)?;
        let rhs = parse(arena, variables, functions, rhs)?;
        return Ok(arena.binary(BinaryOp::Equal, lhs, rhs));
    }

    let tokens = tokenize(&sanitize(text)?)?;
    trace!(?tokens, "tokenized");

    let mut builder = Builder {
        arena,
        variables,
        functions,
    };
    builder.expression(&tokens)
}

struct Builder<'a> {
    arena: &'a mut ExprArena,
    variables: &'a Variables,
    functions: &'a Functions,
}

impl Builder<'_> {
    /// Splits at top-level `+`/`-` and sums the terms.
    fn expression(&mut self, tokens: &[Token]) -> Result<ExprId, ParseError> {
        let terms = split_terms(tokens);
        if terms.is_empty() {
            return Err(ParseError::EmptyExpression);
        }

        let mut built: SmallVec<[ExprId; 4]> = SmallVec::new();
        for (negated, body) in terms {
            let term = self.term(body)?;
            built.push(if negated {
                self.arena.unary(UnaryOp::Neg, term)
            } else {
                term
            });
        }

        Ok(self.arena.nary(NaryOp::Add, built))
    }

    /// A term is a product of adjacent factors.
    fn term(&mut self, tokens: &[Token]) -> Result<ExprId, ParseError> {
        let mut factors: SmallVec<[ExprId; 4]> = SmallVec::new();
        let mut index = 0;
        while index < tokens.len() {
            let (factor, next) = self.factor(tokens, index)?;
            factors.push(factor);
            index = next;
        }

        if factors.is_empty() {
            return Err(ParseError::EmptyTerm);
        }
        Ok(self.arena.nary(NaryOp::Mul, factors))
    }

    /// Consumes one primary token, then an optional trailing exponent.
    ///
    /// The exponent binds only this factor; its right-hand side is itself
    /// a factor, so chained `^` associate to the right.
    fn factor(
        &mut self,
        tokens: &[Token],
        mut index: usize,
    ) -> Result<(ExprId, usize), ParseError> {
        let token = tokens.get(index).ok_or(ParseError::MissingOperand)?;
        index += 1;

        let node = match token {
            Token::Group(inner) => self.expression(inner)?,

            Token::Macro(name) => match name.as_str() {
                "pi" => self.arena.number(std::f64::consts::PI),
                "frac" => {
                    let (numerator, next) = self.factor(tokens, index)?;
                    index = next;
                    let (denominator, next) = self.factor(tokens, index)?;
                    index = next;
                    self.arena.binary(BinaryOp::Div, numerator, denominator)
                }
                other => match UnaryOp::from_macro(other) {
                    Some(op) => {
                        let (child, next) = self.factor(tokens, index)?;
                        index = next;
                        self.arena.unary(op, child)
                    }
                    None => return Err(ParseError::UnknownMacro(other.to_string())),
                },
            },

            Token::Number(value) => self.arena.number(*value),

            Token::Letter('e') => self.arena.number(std::f64::consts::E),
            Token::Letter('x') => self.arena.unknown(Axis::X),
            Token::Letter('y') => self.arena.unknown(Axis::Y),
            Token::Letter(name) => match self.functions.get(*name) {
                Some(function) => {
                    let (call, next) = self.call(tokens, index, function)?;
                    index = next;
                    call
                }
                None => self.arena.variable(*name),
            },

            other => return Err(ParseError::UnexpectedToken(other.clone())),
        };

        if let Some(Token::Caret) = tokens.get(index) {
            index += 1;
            let (exponent, next) = self.factor(tokens, index)?;
            index = next;
            return Ok((self.arena.binary(BinaryOp::Pow, node, exponent), index));
        }

        Ok((node, index))
    }

    /// Inlines a call to a registered function.
    ///
    /// Tick marks differentiate the stored body, re-simplifying after each
    /// application; the call argument then substitutes the bound unknown.
    fn call(
        &mut self,
        tokens: &[Token],
        mut index: usize,
        function: Function,
    ) -> Result<(ExprId, usize), ParseError> {
        let mut ticks = 0;
        while let Some(Token::Tick) = tokens.get(index) {
            ticks += 1;
            index += 1;
        }

        let (argument, next) = self.factor(tokens, index)?;
        index = next;

        let mut body = function.body;
        for _ in 0..ticks {
            let derived = differentiate(self.arena, body)?;
            let (simplified, _) = simplify(self.arena, self.variables, derived);
            body = simplified;
        }

        Ok((substitute(self.arena, body, argument), index))
    }
}

/// Splits a token stream at top-level `+`/`-` boundaries.
///
/// The sign that opens a slice travels with it as a negation flag; empty
/// unsigned slices (a leading `+`, consecutive operators) are dropped, but
/// an empty negated slice is kept so the term builder can reject it.
fn split_terms(tokens: &[Token]) -> Vec<(bool, &[Token])> {
    let mut terms = Vec::new();
    let mut start = 0;
    let mut negated = false;

    for (i, token) in tokens.iter().enumerate() {
        if matches!(token, Token::Plus | Token::Minus) {
            terms.push((negated, &tokens[start..i]));
            negated = matches!(token, Token::Minus);
            start = i + 1;
        }
    }
    terms.push((negated, &tokens[start..]));

    terms
        .into_iter()
        .filter(|(negated, slice)| *negated || !slice.is_empty())
        .collect()
}
