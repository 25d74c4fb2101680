use super::expr::Expr;
use crate::token::Token;
use crate::values::TimeUnit;

/// A `{ … }` body: the statements between the brackets. Bodies do not own
/// a scope themselves; whoever executes one decides the scoping.
pub type Block<'a> = &'a [Stmt<'a>];

/// A `fun` definition. Environment bindings reference these nodes
/// directly, which the arena keeps alive for the whole run.
#[derive(Debug)]
pub struct FunctionDef<'a> {
    pub name: Token,
    pub params: &'a [Token],
    pub body: Block<'a>,
}

#[derive(Debug)]
pub enum Stmt<'a> {
    /// `fun name(params…) { … };`
    FunctionDef(&'a FunctionDef<'a>),
    /// `var name;` or `var name = expr;`
    VariableDef {
        name: Token,
        init: Option<&'a Expr<'a>>,
    },
    /// `name = expr;`
    Assignment {
        name: Token,
        value: &'a Expr<'a>,
    },
    /// `name(args…);` — result discarded.
    Call(&'a Expr<'a>),
    /// `if expr { … } else { … };`
    If {
        cond: &'a Expr<'a>,
        body: Block<'a>,
        else_body: Option<Block<'a>>,
    },
    /// `from start to end by unit as name { … };`
    From {
        start: &'a Expr<'a>,
        end: &'a Expr<'a>,
        unit: TimeUnit,
        unit_token: Token,
        iterator: Token,
        body: Block<'a>,
    },
    /// `print expr;`
    Print { expr: &'a Expr<'a> },
    /// `return;` or `return expr;`
    Return {
        token: Token,
        expr: Option<&'a Expr<'a>>,
    },
}

/// A whole script: its top-level statements in source order.
#[derive(Debug)]
pub struct Program<'a> {
    pub statements: Block<'a>,
}
