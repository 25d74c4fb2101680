//! Recursive-descent syntax analysis.
//!
//! One method per grammar rule. Every rule drains exactly the tokens it
//! owns; on a mismatch it raises a [`SyntacticError`] carrying the
//! offending token and the set of kinds that would have been legal.
//! Constructs that start with an identifier are disambiguated by one
//! token of lookahead after the identifier has been read.

mod expr;
mod stmt;

#[cfg(test)]
mod tests;

use crate::ast::{AstArena, Program};
use crate::error::{Error, LexicalWarning, SyntacticError};
use crate::lexer::Lexer;
use crate::token::{Token, TokenType};

/// Token kinds that may open a top-level statement.
pub const FIRST_STATEMENT: &[TokenType] = &[
    TokenType::Fun,
    TokenType::Var,
    TokenType::If,
    TokenType::From,
    TokenType::Print,
    TokenType::Return,
    TokenType::Identifier,
];

/// Token kinds that may open a statement inside a body; function
/// definitions cannot nest.
pub const FIRST_NESTABLE_STATEMENT: &[TokenType] = &[
    TokenType::Var,
    TokenType::If,
    TokenType::From,
    TokenType::Print,
    TokenType::Return,
    TokenType::Identifier,
];

/// Token kinds that may open an expression.
pub const FIRST_EXPRESSION: &[TokenType] = &[
    TokenType::Not,
    TokenType::Minus,
    TokenType::NumberLiteral,
    TokenType::StringLiteral,
    TokenType::DateLiteral,
    TokenType::TimeLiteral,
    TokenType::DateTimeLiteral,
    TokenType::TimedeltaLiteral,
    TokenType::Identifier,
    TokenType::LeftParenthesis,
];

/// Token kinds that may open an atom: a literal, a parenthesised
/// expression, or an identifier (reference or call).
pub const FIRST_ATOM: &[TokenType] = &[
    TokenType::NumberLiteral,
    TokenType::StringLiteral,
    TokenType::DateLiteral,
    TokenType::TimeLiteral,
    TokenType::DateTimeLiteral,
    TokenType::TimedeltaLiteral,
    TokenType::Identifier,
    TokenType::LeftParenthesis,
];

pub const FIRST_TIME_UNIT: &[TokenType] = &[
    TokenType::Years,
    TokenType::Months,
    TokenType::Weeks,
    TokenType::Days,
    TokenType::Hours,
    TokenType::Minutes,
    TokenType::Seconds,
];

/// What may follow an identifier at statement position.
pub const AFTER_STATEMENT_IDENTIFIER: &[TokenType] =
    &[TokenType::LeftParenthesis, TokenType::Assign];

pub struct Parser<'i, 'a> {
    lexer: Lexer<'i>,
    arena: AstArena<'a>,
}

impl<'i, 'a> Parser<'i, 'a> {
    pub fn new(lexer: Lexer<'i>, arena: AstArena<'a>) -> Self {
        Parser { lexer, arena }
    }

    pub fn parse_program(&mut self) -> Result<Program<'a>, Error> {
        let mut statements = Vec::new();
        while self.peek_kind()? != TokenType::End {
            statements.push(self.statement()?);
        }
        Ok(Program {
            statements: self.arena.stmts.alloc_slice(statements),
        })
    }

    /// Warnings the lexer accumulated while this parser drained it.
    pub fn take_warnings(&mut self) -> Vec<LexicalWarning> {
        self.lexer.take_warnings()
    }

    fn peek_kind(&mut self) -> Result<TokenType, Error> {
        Ok(self.lexer.peek()?.kind())
    }

    /// Consumes the next token, which must be of `kind`.
    fn expect(&mut self, kind: TokenType) -> Result<Token, Error> {
        let token = self.lexer.peek()?;
        if token.kind() != kind {
            return Err(SyntacticError::unexpected(&token, &[kind]).into());
        }
        Ok(self.lexer.get()?)
    }

    /// Consumes the next token only when it is of `kind`.
    fn accept(&mut self, kind: TokenType) -> Result<Option<Token>, Error> {
        if self.peek_kind()? == kind {
            Ok(Some(self.lexer.get()?))
        } else {
            Ok(None)
        }
    }
}
