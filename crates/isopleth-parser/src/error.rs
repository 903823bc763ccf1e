//! Parse-stage errors.

use isopleth_diff::DeriveError;
use thiserror::Error;

use crate::token::Token;

/// Errors produced while turning text into an expression tree.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParseError {
    /// More than one `=` in the input.
    #[error("there can't be more than one equal sign")]
    MultipleEquals,

    /// A macro name with no operator mapping.
    #[error("there is no operation called `\\{0}`")]
    UnknownMacro(String),

    /// Unbalanced `{`/`}` (or unterminated `\operatorname{...}`).
    #[error("unbalanced group delimiters")]
    UnbalancedGroup,

    /// A character the surface syntax has no meaning for.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),

    /// A numeric literal that does not scan as a float.
    #[error("invalid number literal `{0}`")]
    InvalidNumber(String),

    /// Nothing to parse at all.
    #[error("empty expression")]
    EmptyExpression,

    /// A term with no factors, e.g. a dangling `-`.
    #[error("a term needs at least one factor")]
    EmptyTerm,

    /// A macro or exponent ran out of input for its operand.
    #[error("missing operand")]
    MissingOperand,

    /// A token that cannot start a factor.
    #[error("unexpected token {0:?}")]
    UnexpectedToken(Token),

    /// A derivative marker asked for an impossible derivative.
    #[error(transparent)]
    Derive(#[from] DeriveError),
}
