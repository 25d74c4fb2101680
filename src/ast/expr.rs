use crate::token::Token;
use crate::values::TimeUnit;

/// An expression node. Operator levels that did not see their operator
/// collapse to the operand, so a chain node always carries at least one
/// operation and a comparison node always carries its operator.
#[derive(Debug)]
pub enum Expr<'a> {
    /// `a | b | c`, left-associative.
    Or(Chain<'a>),
    /// `a & b & c`, left-associative.
    And(Chain<'a>),
    /// `a == b` / `a != b`; chaining is rejected by the parser.
    Equality(Comparison<'a>),
    /// `a < b` and friends; chaining is rejected by the parser.
    Relational(Comparison<'a>),
    /// `!a`.
    LogicNegation { op: Token, operand: &'a Expr<'a> },
    /// `a + b - c`, left-associative.
    Math(Chain<'a>),
    /// `a * b / c`, left-associative.
    Multiplicative(Chain<'a>),
    /// `-a`, applied after a trailing time-info access.
    MathNegation { op: Token, operand: &'a Expr<'a> },
    /// `a.days` and friends.
    TimeInfo {
        operand: &'a Expr<'a>,
        unit: TimeUnit,
        unit_token: Token,
    },
    /// `name(args…)`.
    Call(Call<'a>),
    /// A bare identifier reference.
    Variable(Token),
    /// Any literal token.
    Literal(Token),
}

/// First operand plus a non-empty run of `(operator, operand)` pairs at
/// one precedence level.
#[derive(Debug)]
pub struct Chain<'a> {
    pub first: &'a Expr<'a>,
    pub rest: &'a [(Token, &'a Expr<'a>)],
}

/// A single non-associative comparison.
#[derive(Debug)]
pub struct Comparison<'a> {
    pub left: &'a Expr<'a>,
    pub op: Token,
    pub right: &'a Expr<'a>,
}

#[derive(Debug)]
pub struct Call<'a> {
    pub name: Token,
    pub args: &'a [&'a Expr<'a>],
}

impl<'a> Expr<'a> {
    /// The token that positions this expression in diagnostics: its first
    /// token, or the operator for unary nodes.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Or(chain)
            | Expr::And(chain)
            | Expr::Math(chain)
            | Expr::Multiplicative(chain) => chain.first.token(),
            Expr::Equality(cmp) | Expr::Relational(cmp) => cmp.left.token(),
            Expr::LogicNegation { op, .. } | Expr::MathNegation { op, .. } => op,
            Expr::TimeInfo { operand, .. } => operand.token(),
            Expr::Call(call) => &call.name,
            Expr::Variable(token) | Expr::Literal(token) => token,
        }
    }
}
