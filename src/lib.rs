//! kairos — an interpreter for a small imperative scripting language
//! specialised in calendar and temporal arithmetic.
//!
//! The pipeline is linear: characters ([`source`]) become tokens
//! ([`lexer`]), tokens become a typed syntax tree ([`parser`], [`ast`]),
//! and walking the tree ([`interpreter`]) produces prints and an optional
//! top-level return value. Errors surface at the earliest stage that can
//! diagnose them, carrying a source position throughout.

pub mod arena;
pub mod ast;
pub mod cli;
pub mod env;
pub mod error;
pub mod intern;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod source;
pub mod token;
pub mod values;

use std::io::Write;

use tracing::debug;

pub use arena::Arena;
pub use error::Error;
pub use intern::{Interner, Symbol};
pub use lexer::Lexer;
pub use source::{Position, SourceReader};
pub use token::{Token, TokenType, TokenValue};
pub use values::{Date, DateTime, Time, TimeUnit, Timedelta, Value};

use ast::AstArena;
use error::LexicalWarning;
use parser::Parser;

/// Drains the reader into the full token stream, `END` included.
pub fn lex(
    reader: SourceReader,
) -> Result<(Vec<Token>, Vec<LexicalWarning>, Interner), Error> {
    let mut interner = Interner::new();
    let mut lexer = Lexer::new(reader, &mut interner);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.get()?;
        let done = token.kind() == TokenType::End;
        tokens.push(token);
        if done {
            break;
        }
    }
    let warnings = lexer.take_warnings();
    drop(lexer);
    debug!(tokens = tokens.len(), "lexical analysis finished");
    Ok((tokens, warnings, interner))
}

/// Parses the source and renders its syntax tree; the tree itself cannot
/// outlive its arenas, so the rendered form is returned.
pub fn render_syntax_tree(
    reader: SourceReader,
) -> Result<(String, Vec<LexicalWarning>), Error> {
    let mut interner = Interner::new();
    let lexer = Lexer::new(reader, &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = Parser::new(lexer, arena);
    let program = parser.parse_program()?;
    let warnings = parser.take_warnings();
    drop(parser);
    debug!(statements = program.statements.len(), "syntax analysis finished");

    Ok((ast::render_tree(&program, &interner), warnings))
}

/// Lexes, parses and executes the source, writing prints to `out`.
/// Returns the program's top-level return value, if any, and the lexical
/// warnings encountered on the way.
pub fn run<W: Write>(
    reader: SourceReader,
    out: &mut W,
) -> Result<(Option<Value>, Vec<LexicalWarning>), Error> {
    let mut interner = Interner::new();
    let lexer = Lexer::new(reader, &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = Parser::new(lexer, arena);
    let program = parser.parse_program()?;
    let warnings = parser.take_warnings();
    drop(parser);

    let mut interpreter = interpreter::Interpreter::new(&interner, out);
    let result = interpreter.run(&program)?;
    debug!(result = ?result, "execution finished");
    Ok((result, warnings))
}
