//! The compilation session.

use isopleth_codegen::compile;
use isopleth_core::{render_tree, Axis, ExprArena, ExprId, Function, Functions, Variables};
use isopleth_parser::parse;
use isopleth_simplify::simplify;
use tracing::{debug, trace};

use crate::error::Error;

/// Names with fixed meanings: the unknowns and Euler's number.
const RESERVED: [char; 3] = ['x', 'y', 'e'];

/// The outcome of compiling an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    /// The expression reduced to a number.
    Value(f64),
    /// A GLSL fragment for the plotting runtime.
    Code(String),
}

impl Evaluation {
    /// The numeric result, if the expression folded completely.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Evaluation::Value(v) => Some(*v),
            Evaluation::Code(_) => None,
        }
    }

    /// The generated fragment, if the expression kept an unknown.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Evaluation::Value(_) => None,
            Evaluation::Code(code) => Some(code),
        }
    }
}

/// A compilation session: the expression arena plus the variable and
/// function registries.
///
/// Each session is independent; there is no global state. The caller
/// serializes edits simply by holding `&mut Context`, and a registry write
/// is visible to every subsequent parse or compile. Deleting an entry
/// never touches trees that already inlined it — substitution copies.
#[derive(Debug, Default)]
pub struct Context {
    arena: ExprArena,
    variables: Variables,
    functions: Functions,
}

impl Context {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a free-standing expression or equation.
    ///
    /// `slot` is the caller-assigned integer that namespaces this
    /// expression's denominator slots in the shared runtime; it must be
    /// unique per live expression.
    pub fn compile_expression(&mut self, text: &str, slot: u32) -> Result<Evaluation, Error> {
        let root = parse(&mut self.arena, &self.variables, &self.functions, text)?;
        trace!(tree = %render_tree(&self.arena, root), "parsed");

        let evaluation = self.process(root, slot)?;
        match &evaluation {
            Evaluation::Value(value) => debug!(text, value = *value, "expression evaluated"),
            Evaluation::Code(_) => debug!(text, slot, "expression compiled"),
        }
        Ok(evaluation)
    }

    /// Defines (or redefines) a variable and returns its value.
    ///
    /// The definition must reduce to a constant. The old binding is
    /// removed first so a redefinition can't read itself.
    pub fn define_variable(&mut self, name: char, text: &str, slot: u32) -> Result<f64, Error> {
        if RESERVED.contains(&name) {
            return Err(Error::ReservedName(name));
        }
        if self.functions.contains(name) {
            return Err(Error::NameTaken(name));
        }

        self.variables.remove(name);

        let root = parse(&mut self.arena, &self.variables, &self.functions, text)?;
        let evaluation = self.process(root, slot)?;
        let Evaluation::Value(value) = evaluation else {
            return Err(Error::NotConstant { name });
        };

        self.variables.set(name, value);
        debug!(%name, value, "variable defined");
        Ok(value)
    }

    /// Defines (or redefines) a user function.
    ///
    /// `declaration` is two letters: the display name, then the bound
    /// unknown (`"fx"` declares `f` over `x`). The body must actually use
    /// the declared unknown. Like any expression, the body also compiles
    /// for plotting; the returned evaluation is that result.
    ///
    /// Redefinition does not recompile expressions that inlined the old
    /// body — invalidating those is the equation manager's job.
    pub fn define_function(
        &mut self,
        declaration: &str,
        text: &str,
        slot: u32,
    ) -> Result<Evaluation, Error> {
        let mut letters = declaration.chars();
        let (Some(name), Some(unknown), None) =
            (letters.next(), letters.next(), letters.next())
        else {
            return Err(Error::InvalidDeclaration(declaration.to_string()));
        };
        let Some(axis) = Axis::from_char(unknown) else {
            return Err(Error::InvalidDeclaration(declaration.to_string()));
        };

        if RESERVED.contains(&name) {
            return Err(Error::ReservedName(name));
        }
        if self.variables.contains(name) {
            return Err(Error::NameTaken(name));
        }

        self.functions.remove(name);

        let root = parse(&mut self.arena, &self.variables, &self.functions, text)?;
        let unknowns = self.arena.unknowns(root);
        let declared_in_use = match axis {
            Axis::X => unknowns.x,
            Axis::Y => unknowns.y,
        };
        if !declared_in_use {
            return Err(Error::UnknownMismatch { name, unknown });
        }

        // Store the body simplified so every inlined copy starts small.
        let (body, _) = simplify(&mut self.arena, &self.variables, root);
        let evaluation = self.process(body, slot)?;

        self.functions.set(
            name,
            Function {
                unknown: axis,
                body,
            },
        );
        debug!(%name, %unknown, "function defined");
        Ok(evaluation)
    }

    /// Removes a variable definition.
    pub fn delete_variable(&mut self, name: char) -> Result<(), Error> {
        match self.variables.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::UndefinedVariable(name)),
        }
    }

    /// Removes a function definition.
    pub fn delete_function(&mut self, name: char) -> Result<(), Error> {
        match self.functions.remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::UndefinedFunction(name)),
        }
    }

    /// Read-only variable lookup, for diagnostics and the equation UI.
    #[must_use]
    pub fn variable(&self, name: char) -> Option<f64> {
        self.variables.get(name)
    }

    /// Simplifies, then either reports the folded value or lowers to code.
    fn process(&mut self, root: ExprId, slot: u32) -> Result<Evaluation, Error> {
        let (root, value) = simplify(&mut self.arena, &self.variables, root);
        trace!(tree = %render_tree(&self.arena, root), "simplified");

        match value {
            Some(value) => Ok(Evaluation::Value(value)),
            None => {
                let fragment = compile(&self.arena, &self.variables, root, slot)?;
                Ok(Evaluation::Code(fragment.code))
            }
        }
    }
}
