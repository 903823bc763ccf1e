//! The aggregated error surface of the pipeline.

use isopleth_codegen::CodegenError;
use isopleth_parser::ParseError;
use thiserror::Error;

/// Any failure the expression pipeline can produce.
///
/// Every stage fails fast: the first error propagates and no partial
/// result is returned. The caller (the equation UI) is expected to report
/// these per expression; the core only supplies the typed value and a
/// human-readable message.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// Malformed input text.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Lowering to runtime code failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// A variable definition that does not reduce to a number.
    #[error("the variable `{name}` couldn't be evaluated to a value")]
    NotConstant {
        /// The variable being defined.
        name: char,
    },

    /// A function body that does not use its declared unknown.
    #[error("the function `{name}` does not match its unknown `{unknown}`")]
    UnknownMismatch {
        /// The function being defined.
        name: char,
        /// The unknown it was declared over.
        unknown: char,
    },

    /// `x`, `y`, and `e` cannot be redefined.
    #[error("`{0}` is a reserved name")]
    ReservedName(char),

    /// A name can't be a variable and a function at once.
    #[error("the name `{0}` is already in use")]
    NameTaken(char),

    /// A function declaration that isn't name-then-unknown.
    #[error("`{0}` is not a valid function declaration")]
    InvalidDeclaration(String),

    /// Deleting a variable that was never registered.
    #[error("there is no variable called `{0}`")]
    UndefinedVariable(char),

    /// Deleting a function that was never registered.
    #[error("there is no function called `{0}`")]
    UndefinedFunction(char),
}
