//! Lexical tokens and the fixed character/keyword tables of the language.

use std::fmt;

use crate::intern::{Interner, Symbol};
use crate::source::Position;
use crate::values::{Date, DateTime, Time, Timedelta};

pub const COMMENT_BOUND: char = '#';
pub const STRING_BOUND: char = '"';
pub const TIMEDELTA_BOUND: char = '\'';
pub const DATE_SEPARATOR: char = '.';
pub const TIME_SEPARATOR: char = ':';
pub const DATETIME_SEPARATOR: char = '~';
pub const ESCAPE: char = '\\';

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Identifier,
    Fun,
    Var,
    If,
    Else,
    From,
    Print,
    Return,
    To,
    By,
    As,
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Semicolon,
    LeftParenthesis,
    RightParenthesis,
    Comma,
    LeftBracket,
    RightBracket,
    Assign,
    LogicalOr,
    LogicalAnd,
    Equals,
    NotEquals,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Not,
    Plus,
    Minus,
    Multiplication,
    Division,
    Access,
    End,
    StringLiteral,
    NumberLiteral,
    DateLiteral,
    DateTimeLiteral,
    TimeLiteral,
    TimedeltaLiteral,
}

impl TokenType {
    /// Keyword table; exact match only.
    pub fn keyword(lexeme: &str) -> Option<TokenType> {
        match lexeme {
            "fun" => Some(TokenType::Fun),
            "var" => Some(TokenType::Var),
            "if" => Some(TokenType::If),
            "else" => Some(TokenType::Else),
            "from" => Some(TokenType::From),
            "print" => Some(TokenType::Print),
            "return" => Some(TokenType::Return),
            "to" => Some(TokenType::To),
            "by" => Some(TokenType::By),
            "as" => Some(TokenType::As),
            "years" => Some(TokenType::Years),
            "months" => Some(TokenType::Months),
            "weeks" => Some(TokenType::Weeks),
            "days" => Some(TokenType::Days),
            "hours" => Some(TokenType::Hours),
            "minutes" => Some(TokenType::Minutes),
            "seconds" => Some(TokenType::Seconds),
            _ => None,
        }
    }

    /// Single characters that always form the same token.
    pub fn singular(character: char) -> Option<TokenType> {
        match character {
            ';' => Some(TokenType::Semicolon),
            '(' => Some(TokenType::LeftParenthesis),
            ')' => Some(TokenType::RightParenthesis),
            '{' => Some(TokenType::LeftBracket),
            '}' => Some(TokenType::RightBracket),
            '.' => Some(TokenType::Access),
            '|' => Some(TokenType::LogicalOr),
            '&' => Some(TokenType::LogicalAnd),
            '+' => Some(TokenType::Plus),
            '-' => Some(TokenType::Minus),
            '*' => Some(TokenType::Multiplication),
            '/' => Some(TokenType::Division),
            ',' => Some(TokenType::Comma),
            _ => None,
        }
    }

    /// Characters that form one token alone and another when followed by
    /// `=`. Returns `(alone, with_equals)`.
    pub fn ambiguous(character: char) -> Option<(TokenType, TokenType)> {
        match character {
            '=' => Some((TokenType::Assign, TokenType::Equals)),
            '!' => Some((TokenType::Not, TokenType::NotEquals)),
            '>' => Some((TokenType::Greater, TokenType::GreaterOrEqual)),
            '<' => Some((TokenType::Less, TokenType::LessOrEqual)),
            _ => None,
        }
    }

    /// Canonical spelling for kinds with a fixed one; literals,
    /// identifiers and END have none.
    pub fn spelling(self) -> Option<&'static str> {
        match self {
            TokenType::Fun => Some("fun"),
            TokenType::Var => Some("var"),
            TokenType::If => Some("if"),
            TokenType::Else => Some("else"),
            TokenType::From => Some("from"),
            TokenType::Print => Some("print"),
            TokenType::Return => Some("return"),
            TokenType::To => Some("to"),
            TokenType::By => Some("by"),
            TokenType::As => Some("as"),
            TokenType::Years => Some("years"),
            TokenType::Months => Some("months"),
            TokenType::Weeks => Some("weeks"),
            TokenType::Days => Some("days"),
            TokenType::Hours => Some("hours"),
            TokenType::Minutes => Some("minutes"),
            TokenType::Seconds => Some("seconds"),
            TokenType::Semicolon => Some(";"),
            TokenType::LeftParenthesis => Some("("),
            TokenType::RightParenthesis => Some(")"),
            TokenType::Comma => Some(","),
            TokenType::LeftBracket => Some("{"),
            TokenType::RightBracket => Some("}"),
            TokenType::Assign => Some("="),
            TokenType::LogicalOr => Some("|"),
            TokenType::LogicalAnd => Some("&"),
            TokenType::Equals => Some("=="),
            TokenType::NotEquals => Some("!="),
            TokenType::Greater => Some(">"),
            TokenType::GreaterOrEqual => Some(">="),
            TokenType::Less => Some("<"),
            TokenType::LessOrEqual => Some("<="),
            TokenType::Not => Some("!"),
            TokenType::Plus => Some("+"),
            TokenType::Minus => Some("-"),
            TokenType::Multiplication => Some("*"),
            TokenType::Division => Some("/"),
            TokenType::Access => Some("."),
            _ => None,
        }
    }

    pub fn is_time_unit(self) -> bool {
        matches!(
            self,
            TokenType::Years
                | TokenType::Months
                | TokenType::Weeks
                | TokenType::Days
                | TokenType::Hours
                | TokenType::Minutes
                | TokenType::Seconds
        )
    }

    fn name(self) -> &'static str {
        match self {
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Fun => "FUN",
            TokenType::Var => "VAR",
            TokenType::If => "IF",
            TokenType::Else => "ELSE",
            TokenType::From => "FROM",
            TokenType::Print => "PRINT",
            TokenType::Return => "RETURN",
            TokenType::To => "TO",
            TokenType::By => "BY",
            TokenType::As => "AS",
            TokenType::Years => "YEARS",
            TokenType::Months => "MONTHS",
            TokenType::Weeks => "WEEKS",
            TokenType::Days => "DAYS",
            TokenType::Hours => "HOURS",
            TokenType::Minutes => "MINUTES",
            TokenType::Seconds => "SECONDS",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::LeftParenthesis => "LEFT_PARENTHESIS",
            TokenType::RightParenthesis => "RIGHT_PARENTHESIS",
            TokenType::Comma => "COMMA",
            TokenType::LeftBracket => "LEFT_BRACKET",
            TokenType::RightBracket => "RIGHT_BRACKET",
            TokenType::Assign => "ASSIGN",
            TokenType::LogicalOr => "LOGICAL_OR",
            TokenType::LogicalAnd => "LOGICAL_AND",
            TokenType::Equals => "EQUALS",
            TokenType::NotEquals => "NOT_EQUALS",
            TokenType::Greater => "GREATER",
            TokenType::GreaterOrEqual => "GREATER_OR_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessOrEqual => "LESS_OR_EQUAL",
            TokenType::Not => "NOT",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Multiplication => "MULTIPLICATION",
            TokenType::Division => "DIVISION",
            TokenType::Access => "ACCESS",
            TokenType::End => "END",
            TokenType::StringLiteral => "STRING_LITERAL",
            TokenType::NumberLiteral => "NUMBER_LITERAL",
            TokenType::DateLiteral => "DATE_LITERAL",
            TokenType::DateTimeLiteral => "DATETIME_LITERAL",
            TokenType::TimeLiteral => "TIME_LITERAL",
            TokenType::TimedeltaLiteral => "TIMEDELTA_LITERAL",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload of a token; present for exactly the literal kinds and
/// identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    None,
    Identifier(Symbol),
    String(String),
    Number(i64),
    Date(Date),
    Time(Time),
    DateTime(DateTime),
    Timedelta(Timedelta),
}

fn payload_matches(kind: TokenType, value: &TokenValue) -> bool {
    match kind {
        TokenType::Identifier => matches!(value, TokenValue::Identifier(_)),
        TokenType::StringLiteral => matches!(value, TokenValue::String(_)),
        TokenType::NumberLiteral => matches!(value, TokenValue::Number(_)),
        TokenType::DateLiteral => matches!(value, TokenValue::Date(_)),
        TokenType::TimeLiteral => matches!(value, TokenValue::Time(_)),
        TokenType::DateTimeLiteral => matches!(value, TokenValue::DateTime(_)),
        TokenType::TimedeltaLiteral => matches!(value, TokenValue::Timedelta(_)),
        _ => matches!(value, TokenValue::None),
    }
}

/// A lexical token: kind, starting position and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenType,
    pos: Position,
    value: TokenValue,
}

impl Token {
    /// A token without payload. Panics when `kind` requires one; passing
    /// the wrong shape is a bug in the caller, not an input error.
    pub fn new(kind: TokenType, pos: Position) -> Token {
        Token::with_value(kind, pos, TokenValue::None)
    }

    pub fn with_value(kind: TokenType, pos: Position, value: TokenValue) -> Token {
        assert!(
            payload_matches(kind, &value),
            "token payload shape mismatch: {kind} with {value:?}"
        );
        Token { kind, pos, value }
    }

    pub fn kind(&self) -> TokenType {
        self.kind
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn value(&self) -> &TokenValue {
        &self.value
    }

    /// Interned name of an identifier token.
    pub fn symbol(&self) -> Symbol {
        match self.value {
            TokenValue::Identifier(sym) => sym,
            _ => panic!("token {} has no identifier payload", self.kind),
        }
    }

    /// The canonical text of the token as it appears in source: spelling
    /// for fixed kinds, formatted payload for literals, `END` at end of
    /// file.
    pub fn text(&self, interner: &Interner) -> String {
        if self.kind == TokenType::End {
            return "END".to_string();
        }
        if let Some(spelling) = self.kind.spelling() {
            return spelling.to_string();
        }
        match &self.value {
            TokenValue::Identifier(sym) => interner.resolve(*sym).to_string(),
            TokenValue::String(s) => format!("{STRING_BOUND}{s}{STRING_BOUND}"),
            TokenValue::Number(n) => n.to_string(),
            TokenValue::Date(d) => d.to_string(),
            TokenValue::Time(t) => t.to_string(),
            TokenValue::DateTime(dt) => dt.to_string(),
            TokenValue::Timedelta(td) => td.to_string(),
            TokenValue::None => unreachable!("payloadless kinds have a spelling"),
        }
    }
}
