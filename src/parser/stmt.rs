//! Statement-level grammar rules.

use super::{
    Parser, AFTER_STATEMENT_IDENTIFIER, FIRST_EXPRESSION, FIRST_NESTABLE_STATEMENT,
    FIRST_STATEMENT, FIRST_TIME_UNIT,
};
use crate::ast::{Block, Call, Expr, FunctionDef, Stmt};
use crate::error::{Error, SyntacticError};
use crate::token::{Token, TokenType};
use crate::values::TimeUnit;

impl<'i, 'a> Parser<'i, 'a> {
    pub(super) fn statement(&mut self) -> Result<Stmt<'a>, Error> {
        let token = self.lexer.peek()?;
        match token.kind() {
            TokenType::Fun => self.function_definition(),
            TokenType::Var => self.variable_definition(),
            TokenType::If => self.if_statement(),
            TokenType::From => self.from_statement(),
            TokenType::Print => self.print_statement(),
            TokenType::Return => self.return_statement(),
            TokenType::Identifier => self.identifier_statement(),
            _ => Err(SyntacticError::unexpected(&token, FIRST_STATEMENT).into()),
        }
    }

    fn nestable_statement(&mut self) -> Result<Stmt<'a>, Error> {
        let token = self.lexer.peek()?;
        match token.kind() {
            TokenType::Var => self.variable_definition(),
            TokenType::If => self.if_statement(),
            TokenType::From => self.from_statement(),
            TokenType::Print => self.print_statement(),
            TokenType::Return => self.return_statement(),
            TokenType::Identifier => self.identifier_statement(),
            _ => Err(SyntacticError::unexpected(&token, FIRST_NESTABLE_STATEMENT).into()),
        }
    }

    /// `{ … }`. The statements only; scoping is the evaluator's business.
    pub(super) fn body(&mut self) -> Result<Block<'a>, Error> {
        self.expect(TokenType::LeftBracket)?;
        let mut statements = Vec::new();
        while FIRST_NESTABLE_STATEMENT.contains(&self.peek_kind()?) {
            statements.push(self.nestable_statement()?);
        }
        self.expect(TokenType::RightBracket)?;
        Ok(self.arena.stmts.alloc_slice(statements))
    }

    fn function_definition(&mut self) -> Result<Stmt<'a>, Error> {
        self.expect(TokenType::Fun)?;
        let name = self.expect(TokenType::Identifier)?;
        let params = self.parameters()?;
        let body = self.body()?;
        self.expect(TokenType::Semicolon)?;
        let def = self.arena.defs.alloc(FunctionDef { name, params, body });
        Ok(Stmt::FunctionDef(def))
    }

    fn parameters(&mut self) -> Result<&'a [Token], Error> {
        self.expect(TokenType::LeftParenthesis)?;
        let mut params = Vec::new();
        if self.peek_kind()? == TokenType::Identifier {
            params.push(self.lexer.get()?);
            while self.accept(TokenType::Comma)?.is_some() {
                params.push(self.expect(TokenType::Identifier)?);
            }
        }
        self.expect(TokenType::RightParenthesis)?;
        Ok(self.arena.tokens.alloc_slice(params))
    }

    fn variable_definition(&mut self) -> Result<Stmt<'a>, Error> {
        self.expect(TokenType::Var)?;
        let name = self.expect(TokenType::Identifier)?;
        let init = match self.lexer.peek()? {
            token if token.kind() == TokenType::Assign => {
                self.lexer.get()?;
                Some(self.expression()?)
            }
            token if token.kind() == TokenType::Semicolon => None,
            token => {
                return Err(SyntacticError::unexpected(
                    &token,
                    &[TokenType::Assign, TokenType::Semicolon],
                )
                .into())
            }
        };
        self.expect(TokenType::Semicolon)?;
        Ok(Stmt::VariableDef { name, init })
    }

    fn if_statement(&mut self) -> Result<Stmt<'a>, Error> {
        self.expect(TokenType::If)?;
        let cond = self.expression()?;
        let body = self.body()?;
        let else_body = if self.accept(TokenType::Else)?.is_some() {
            Some(self.body()?)
        } else {
            None
        };
        self.expect(TokenType::Semicolon)?;
        Ok(Stmt::If {
            cond,
            body,
            else_body,
        })
    }

    fn from_statement(&mut self) -> Result<Stmt<'a>, Error> {
        self.expect(TokenType::From)?;
        let start = self.expression()?;
        self.expect(TokenType::To)?;
        let end = self.expression()?;
        self.expect(TokenType::By)?;
        let (unit_token, unit) = self.time_unit()?;
        self.expect(TokenType::As)?;
        let iterator = self.expect(TokenType::Identifier)?;
        let body = self.body()?;
        self.expect(TokenType::Semicolon)?;
        Ok(Stmt::From {
            start,
            end,
            unit,
            unit_token,
            iterator,
            body,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt<'a>, Error> {
        self.expect(TokenType::Print)?;
        let expr = self.expression()?;
        self.expect(TokenType::Semicolon)?;
        Ok(Stmt::Print { expr })
    }

    fn return_statement(&mut self) -> Result<Stmt<'a>, Error> {
        let token = self.expect(TokenType::Return)?;
        let expr = if FIRST_EXPRESSION.contains(&self.peek_kind()?) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenType::Semicolon)?;
        Ok(Stmt::Return { token, expr })
    }

    /// An identifier at statement position is either a call or an
    /// assignment; the token after it decides.
    fn identifier_statement(&mut self) -> Result<Stmt<'a>, Error> {
        let name = self.expect(TokenType::Identifier)?;
        let next = self.lexer.peek()?;
        match next.kind() {
            TokenType::LeftParenthesis => {
                let args = self.call_arguments()?;
                let call = self.arena.exprs.alloc(Expr::Call(Call { name, args }));
                self.expect(TokenType::Semicolon)?;
                Ok(Stmt::Call(call))
            }
            TokenType::Assign => {
                self.lexer.get()?;
                let value = self.expression()?;
                self.expect(TokenType::Semicolon)?;
                Ok(Stmt::Assignment { name, value })
            }
            _ => Err(SyntacticError::unexpected(&next, AFTER_STATEMENT_IDENTIFIER).into()),
        }
    }

    pub(super) fn time_unit(&mut self) -> Result<(Token, TimeUnit), Error> {
        let token = self.lexer.peek()?;
        match TimeUnit::from_token(token.kind()) {
            Some(unit) => Ok((self.lexer.get()?, unit)),
            None => Err(SyntacticError::unexpected(&token, FIRST_TIME_UNIT).into()),
        }
    }
}
