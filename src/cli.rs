//! Command-line driver: `kairos [--stage lexer|parser|execution] PATH`.
//!
//! The lexer stage prints a token table, the parser stage the syntax
//! tree, the execution stage runs the script. Diagnostics and warnings
//! render to stdout in their positional form; the process exits non-zero
//! on any error.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::arena::Arena;
use crate::ast::AstArena;
use crate::error::{Error, LexicalWarning};
use crate::intern::Interner;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser as SyntaxParser;
use crate::source::SourceReader;
use crate::token::Token;

#[derive(Parser)]
#[command(name = "kairos")]
#[command(about = "Interpreter for a calendar-arithmetic scripting language")]
#[command(version)]
pub struct Cli {
    /// Pipeline stage to stop after
    #[arg(long, value_enum, default_value = "execution")]
    pub stage: Stage,

    /// Path to the script file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Print the token table
    Lexer,
    /// Print the syntax tree
    Parser,
    /// Run the script
    Execution,
}

pub fn run_cli() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let cli = Cli::parse();
    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            print!("{}", error.report(&cli.path));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> Result<(), Error> {
    let reader = SourceReader::open(&cli.path)?;
    match cli.stage {
        Stage::Lexer => {
            let (tokens, warnings, interner) = crate::lex(reader)?;
            print_warnings(&cli.path, &warnings);
            display_tokens(&tokens, &interner);
            Ok(())
        }
        Stage::Parser => {
            let (tree, warnings) = crate::render_syntax_tree(reader)?;
            print_warnings(&cli.path, &warnings);
            print!("{tree}");
            Ok(())
        }
        Stage::Execution => execute(cli, reader),
    }
}

/// The execution stage assembles the pipeline by hand so that lexical
/// warnings reach stdout before the first program output line.
fn execute(cli: &Cli, reader: SourceReader) -> Result<(), Error> {
    let mut interner = Interner::new();
    let lexer = Lexer::new(reader, &mut interner);

    let exprs = Arena::new();
    let expr_refs = Arena::new();
    let links = Arena::new();
    let stmts = Arena::new();
    let defs = Arena::new();
    let anchor_tokens = Arena::new();
    let arena = AstArena::new(&exprs, &expr_refs, &links, &stmts, &defs, &anchor_tokens);

    let mut parser = SyntaxParser::new(lexer, arena);
    let program = parser.parse_program()?;
    let warnings = parser.take_warnings();
    drop(parser);
    print_warnings(&cli.path, &warnings);

    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(&interner, stdout.lock());
    let result = interpreter.run(&program)?;
    debug!(result = ?result, "program finished");
    Ok(())
}

fn print_warnings(path: &Path, warnings: &[LexicalWarning]) {
    for warning in warnings {
        print!("{}", warning.report(path));
    }
}

/// One row per token: text, type name and the three position columns.
fn display_tokens(tokens: &[Token], interner: &Interner) {
    println!(
        "{:<50} | {:<30} | {:<15} | {:<15} | {:<20}",
        "token", "type", "line number", "line position", "absolute position"
    );
    for token in tokens {
        let text: String = token.text(interner).chars().take(50).collect();
        println!(
            "{:<50} | {:<30} | {:<15} | {:<15} | {:<20}",
            text,
            token.kind().to_string(),
            token.pos().line,
            token.pos().column,
            token.pos().absolute
        );
    }
}
