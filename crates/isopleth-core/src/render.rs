//! Diagnostic tree rendering.
//!
//! Produces a box-drawing layout of an expression tree for trace output
//! and test assertions. Purely diagnostic; nothing parses this back.

use crate::arena::ExprArena;
use crate::expr::Expr;
use crate::handle::ExprId;

/// Renders the subtree rooted at `root` as an indented tree.
#[must_use]
pub fn render_tree(arena: &ExprArena, root: ExprId) -> String {
    let mut out = String::from("-Root\n");
    render(arena, "", root, true, &mut out);
    out
}

fn render(arena: &ExprArena, prefix: &str, id: ExprId, last: bool, out: &mut String) {
    out.push_str(prefix);
    out.push_str(if last { "└── " } else { "├── " });
    out.push_str(&label(arena.get(id)));
    out.push('\n');

    let child_prefix = format!("{prefix}{}", if last { "    " } else { "|   " });
    match arena.get(id) {
        Expr::Number(_) | Expr::Variable(_) | Expr::Unknown(_) => {}
        Expr::Unary(_, child) => render(arena, &child_prefix, *child, true, out),
        Expr::Binary(_, left, right) => {
            render(arena, &child_prefix, *left, false, out);
            render(arena, &child_prefix, *right, true, out);
        }
        Expr::Nary(_, children) => {
            for (i, &child) in children.iter().enumerate() {
                render(arena, &child_prefix, child, i == children.len() - 1, out);
            }
        }
    }
}

fn label(expr: &Expr) -> String {
    match expr {
        Expr::Number(r) => format!("number: {r}"),
        Expr::Variable(name) => format!("variable: {name}"),
        Expr::Unknown(axis) => format!("unknown: {}", axis.name()),
        Expr::Unary(op, _) => format!("unary: {op:?}"),
        Expr::Binary(op, _, _) => format!("binary: {op:?}"),
        Expr::Nary(op, _) => format!("nary: {op:?}"),
    }
}
