//! Expression-level grammar rules, one method per precedence level.
//!
//! Levels that saw no operator hand their single operand straight up, so
//! `a + b * c` parses to a math chain whose right operand is the
//! multiplicative chain and nothing else.

use super::{Parser, FIRST_ATOM};
use crate::ast::{Call, Chain, Comparison, Expr};
use crate::error::{Error, SyntacticError};
use crate::token::TokenType;

type ExprResult<'a> = Result<&'a Expr<'a>, Error>;

impl<'i, 'a> Parser<'i, 'a> {
    /// Entry point: the `|` level.
    pub(super) fn expression(&mut self) -> ExprResult<'a> {
        self.left_chain(&[TokenType::LogicalOr], Self::and_expression, Expr::Or)
    }

    fn and_expression(&mut self) -> ExprResult<'a> {
        self.left_chain(&[TokenType::LogicalAnd], Self::equality_expression, Expr::And)
    }

    fn equality_expression(&mut self) -> ExprResult<'a> {
        self.comparison(
            &[TokenType::Equals, TokenType::NotEquals],
            Self::relational_expression,
            Expr::Equality,
        )
    }

    fn relational_expression(&mut self) -> ExprResult<'a> {
        self.comparison(
            &[
                TokenType::Greater,
                TokenType::GreaterOrEqual,
                TokenType::Less,
                TokenType::LessOrEqual,
            ],
            Self::logic_term,
            Expr::Relational,
        )
    }

    fn logic_term(&mut self) -> ExprResult<'a> {
        if let Some(op) = self.accept(TokenType::Not)? {
            let operand = self.math_expression()?;
            return Ok(self.arena.exprs.alloc(Expr::LogicNegation { op, operand }));
        }
        self.math_expression()
    }

    fn math_expression(&mut self) -> ExprResult<'a> {
        self.left_chain(
            &[TokenType::Plus, TokenType::Minus],
            Self::multiplicative_expression,
            Expr::Math,
        )
    }

    fn multiplicative_expression(&mut self) -> ExprResult<'a> {
        self.left_chain(
            &[TokenType::Multiplication, TokenType::Division],
            Self::term,
            Expr::Multiplicative,
        )
    }

    /// `"-"? atom ("." unit)?` — the access binds before the minus.
    fn term(&mut self) -> ExprResult<'a> {
        let negation = self.accept(TokenType::Minus)?;
        let mut value = self.atom()?;
        if self.accept(TokenType::Access)?.is_some() {
            let (unit_token, unit) = self.time_unit()?;
            value = self.arena.exprs.alloc(Expr::TimeInfo {
                operand: value,
                unit,
                unit_token,
            });
        }
        if let Some(op) = negation {
            value = self.arena.exprs.alloc(Expr::MathNegation { op, operand: value });
        }
        Ok(value)
    }

    fn atom(&mut self) -> ExprResult<'a> {
        let token = self.lexer.peek()?;
        match token.kind() {
            TokenType::NumberLiteral
            | TokenType::StringLiteral
            | TokenType::DateLiteral
            | TokenType::TimeLiteral
            | TokenType::DateTimeLiteral
            | TokenType::TimedeltaLiteral => {
                Ok(self.arena.exprs.alloc(Expr::Literal(self.lexer.get()?)))
            }
            TokenType::LeftParenthesis => {
                self.lexer.get()?;
                let inner = self.expression()?;
                self.expect(TokenType::RightParenthesis)?;
                // A parenthesised expression has exactly one meaningful
                // child and never appears in the tree itself.
                Ok(inner)
            }
            TokenType::Identifier => {
                let name = self.lexer.get()?;
                if self.peek_kind()? == TokenType::LeftParenthesis {
                    let args = self.call_arguments()?;
                    Ok(self.arena.exprs.alloc(Expr::Call(Call { name, args })))
                } else {
                    Ok(self.arena.exprs.alloc(Expr::Variable(name)))
                }
            }
            _ => Err(SyntacticError::unexpected(&token, FIRST_ATOM).into()),
        }
    }

    pub(super) fn call_arguments(&mut self) -> Result<&'a [&'a Expr<'a>], Error> {
        self.expect(TokenType::LeftParenthesis)?;
        let mut args = Vec::new();
        if super::FIRST_EXPRESSION.contains(&self.peek_kind()?) {
            args.push(self.expression()?);
            while self.accept(TokenType::Comma)?.is_some() {
                args.push(self.expression()?);
            }
        }
        self.expect(TokenType::RightParenthesis)?;
        Ok(self.arena.expr_refs.alloc_slice(args))
    }

    /// A left-associative run of binary operators at one precedence
    /// level. With no operator present the single operand is returned
    /// unwrapped.
    fn left_chain<F>(
        &mut self,
        operators: &'static [TokenType],
        mut operand: F,
        wrap: fn(Chain<'a>) -> Expr<'a>,
    ) -> ExprResult<'a>
    where
        F: FnMut(&mut Self) -> ExprResult<'a>,
    {
        let first = operand(self)?;
        let mut operations = Vec::new();
        while operators.contains(&self.peek_kind()?) {
            let op = self.lexer.get()?;
            operations.push((op, operand(self)?));
        }
        if operations.is_empty() {
            return Ok(first);
        }
        let rest = self.arena.links.alloc_slice(operations);
        Ok(self.arena.exprs.alloc(wrap(Chain { first, rest })))
    }

    /// A non-associative comparison level: at most one operator, and a
    /// second one right after is a syntax error.
    fn comparison<F>(
        &mut self,
        operators: &'static [TokenType],
        mut operand: F,
        wrap: fn(Comparison<'a>) -> Expr<'a>,
    ) -> ExprResult<'a>
    where
        F: FnMut(&mut Self) -> ExprResult<'a>,
    {
        let left = operand(self)?;
        if !operators.contains(&self.peek_kind()?) {
            return Ok(left);
        }
        let op = self.lexer.get()?;
        let right = operand(self)?;
        let next = self.lexer.peek()?;
        if operators.contains(&next.kind()) {
            return Err(SyntacticError::chained_comparison(&next).into());
        }
        Ok(self.arena.exprs.alloc(wrap(Comparison { left, op, right })))
    }
}
