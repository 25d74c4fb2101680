//! The typed syntax tree.
//!
//! Nodes are allocated in bump arenas and hold their children as `&'a`
//! references; a node that would wrap exactly one child at its precedence
//! level is never built (the parser returns the child instead), which
//! keeps trees shallow.

mod display;
mod expr;
mod stmt;

pub use display::{children_of, render_tree, NodeRef};
pub use expr::{Call, Chain, Comparison, Expr};
pub use stmt::{Block, FunctionDef, Program, Stmt};

use crate::arena::Arena;
use crate::token::Token;

/// Borrowed bundle of every arena the parser allocates into.
#[derive(Clone, Copy)]
pub struct AstArena<'a> {
    pub exprs: &'a Arena<Expr<'a>>,
    pub expr_refs: &'a Arena<&'a Expr<'a>>,
    pub links: &'a Arena<(Token, &'a Expr<'a>)>,
    pub stmts: &'a Arena<Stmt<'a>>,
    pub defs: &'a Arena<FunctionDef<'a>>,
    pub tokens: &'a Arena<Token>,
}

impl<'a> AstArena<'a> {
    pub fn new(
        exprs: &'a Arena<Expr<'a>>,
        expr_refs: &'a Arena<&'a Expr<'a>>,
        links: &'a Arena<(Token, &'a Expr<'a>)>,
        stmts: &'a Arena<Stmt<'a>>,
        defs: &'a Arena<FunctionDef<'a>>,
        tokens: &'a Arena<Token>,
    ) -> Self {
        AstArena {
            exprs,
            expr_refs,
            links,
            stmts,
            defs,
            tokens,
        }
    }
}
