//! Diagnostic types and their positional rendering.
//!
//! Each pipeline stage raises the richest error it can diagnose; nothing
//! is swallowed on the way up. The driver renders errors and warnings to
//! stdout as `file:LINE:COL: LEVEL KIND: message` followed by the
//! offending source line and a caret marker.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::source::{Position, SourceReader};
use crate::token::{Token, TokenType};
use crate::values::ValueError;

/// Characters of source shown on each side of a diagnostic position.
const SNIPPET_CONTEXT: usize = 30;

/// Any failure the interpreter can surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Lexical(#[from] LexicalError),
    #[error("{0}")]
    Syntactic(#[from] SyntacticError),
    #[error("{0}")]
    Execution(#[from] ExecutionError),
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write output: {0}")]
    Output(#[from] io::Error),
}

/// Input that cannot be processed into a token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct LexicalError {
    pub pos: Position,
    pub kind: LexicalErrorKind,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexicalErrorKind {
    #[error("unexpected character, not recognizable by any rule")]
    UnexpectedCharacter,
    #[error("identifier is too long, maximum is {max} characters")]
    IdentifierTooLong { max: usize },
    #[error("number is too long, maximum is {max} digits")]
    NumberTooLong { max: usize },
    #[error("number does not fit the integer range")]
    NumberOutOfRange,
    #[error("string literal is too long, maximum is {max} characters")]
    StringTooLong { max: usize },
    #[error("timedelta literal is too long, maximum is {max} characters")]
    TimedeltaTooLong { max: usize },
    #[error("comment is too long, maximum is {max} characters")]
    CommentTooLong { max: usize },
    #[error("too many skippable characters, maximum is {max}")]
    SkippableTooLong { max: usize },
    #[error("unexpected character, expected digit")]
    ExpectedDigit,
    #[error("unexpected digit")]
    UnexpectedDigit,
    #[error("unexpected character, expected '{0}'")]
    ExpectedCharacter(char),
    #[error("unknown time unit '{0}', expected one of Y M W D h m s")]
    UnknownTimeUnit(char),
    #[error("number inside timedelta bounds is missing its unit")]
    MissingTimeUnit,
    #[error("time unit '{0}' cannot be given twice")]
    DuplicateTimeUnit(char),
    #[error("unexpected character inside timedelta bounds")]
    BadTimedeltaCharacter,
    #[error("{0}")]
    InvalidValue(#[from] ValueError),
}

/// Well-formed tokens in an order the grammar does not allow.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct SyntacticError {
    pub pos: Position,
    pub kind: SyntacticErrorKind,
}

impl SyntacticError {
    pub fn unexpected(token: &Token, expected: &[TokenType]) -> SyntacticError {
        SyntacticError {
            pos: token.pos(),
            kind: SyntacticErrorKind::UnexpectedToken {
                expected: ExpectedSet(expected.to_vec()),
                found: token.kind(),
            },
        }
    }

    pub fn chained_comparison(token: &Token) -> SyntacticError {
        SyntacticError {
            pos: token.pos(),
            kind: SyntacticErrorKind::ChainedComparison {
                found: token.kind(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntacticErrorKind {
    #[error("expected one of {expected} but got {found}")]
    UnexpectedToken {
        expected: ExpectedSet,
        found: TokenType,
    },
    #[error("comparison operators are not associative, got another {found}")]
    ChainedComparison { found: TokenType },
}

/// Display wrapper for a FIRST set in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedSet(pub Vec<TokenType>);

impl fmt::Display for ExpectedSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", kind)?;
        }
        f.write_str("}")
    }
}

/// Failures raised while walking the tree.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ExecutionError {
    pub pos: Position,
    pub kind: ExecutionErrorKind,
}

impl ExecutionError {
    pub fn new(pos: Position, kind: ExecutionErrorKind) -> ExecutionError {
        ExecutionError { pos, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionErrorKind {
    #[error("variable '{0}' is not declared")]
    UndeclaredVariable(String),
    #[error("variable '{0}' has no value")]
    UninitializedVariable(String),
    #[error("function '{0}' is not declared")]
    UndeclaredFunction(String),
    #[error("function '{name}' takes {expected} arguments but {got} were given")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("{0}")]
    Value(#[from] ValueError),
}

/// Recoverable lexical oddity: the lexer reports it and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalWarning {
    pub pos: Position,
    pub kind: LexicalWarningKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexicalWarningKind {
    #[error("file ended before end of comment")]
    UnclosedComment,
    #[error("file ended before end of string bounds")]
    UnclosedString,
    #[error("file ended before end of timedelta bounds")]
    UnclosedTimedelta,
}

impl Error {
    /// Renders the diagnostic the way the driver prints it. Positional
    /// kinds re-read the source around the position; when that is not
    /// possible the header alone is returned.
    pub fn report(&self, path: &Path) -> String {
        match self {
            Error::Lexical(e) => positional_report(path, "Lexical", "error", e.pos, e, None),
            Error::Syntactic(e) => positional_report(path, "Syntactic", "error", e.pos, e, None),
            Error::Execution(e) => positional_report(path, "Execution", "error", e.pos, e, None),
            Error::Io { .. } | Error::Output(_) => format!("IO error: {}\n", self),
        }
    }
}

impl LexicalWarning {
    pub fn report(&self, path: &Path) -> String {
        positional_report(path, "Lexical", "warning", self.pos, &self.kind, Some("Ignoring"))
    }
}

fn positional_report(
    path: &Path,
    stage: &str,
    severity: &str,
    pos: Position,
    message: &dyn fmt::Display,
    action: Option<&str>,
) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let mut out = format!(
        "{}:{}:{}: {} {}: {}\n",
        file_name, pos.line, pos.column, stage, severity, message
    );
    if let Some(action) = action {
        out.push_str(action);
        out.push('\n');
    }
    if let Some((line, caret_offset)) = snippet(path, pos) {
        out.push_str(&line);
        out.push('\n');
        out.push_str(&" ".repeat(caret_offset));
        out.push_str("^\n");
    }
    out
}

/// The source line around `pos`, clipped to the context width, and the
/// caret offset within the clipped line.
fn snippet(path: &Path, pos: Position) -> Option<(String, usize)> {
    let reader = SourceReader::open(path).ok()?;
    let left_len = (pos.column as usize).min(SNIPPET_CONTEXT);
    let left = reader.peek_from(-(left_len as i64), pos.absolute).ok()?;
    let right = reader
        .peek_from(SNIPPET_CONTEXT as i64 + 1, pos.absolute)
        .ok()?;
    let mut combined = left;
    combined.push_str(&right);
    let line: String = combined.chars().take_while(|&c| c != '\n').collect();
    Some((line, left_len))
}
