//! Lexical analysis: characters in, tokens out.
//!
//! The lexer owns the [`SourceReader`] and hands out one token per call
//! to [`Lexer::get`]. A single token of lookahead is available through
//! [`Lexer::peek`], implemented with the reader's two-slot checkpoint:
//! the speculative read is rewound, and the following `get` jumps
//! forward again instead of re-lexing.
//!
//! Each literal family has its own sub-lexer with a hard length bound;
//! unclosed comments, strings and timedeltas at end of file are reported
//! as warnings and accepted.

use crate::error::{LexicalError, LexicalErrorKind, LexicalWarning, LexicalWarningKind};
use crate::intern::Interner;
use crate::source::{Position, SourceReader};
use crate::token::{
    self, Token, TokenType, TokenValue, COMMENT_BOUND, DATETIME_SEPARATOR, DATE_SEPARATOR,
    STRING_BOUND, TIMEDELTA_BOUND, TIME_SEPARATOR,
};
use crate::values::{Date, DateTime, Time, Timedelta};

pub const MAX_IDENTIFIER_LENGTH: usize = 256;
pub const MAX_NUMBER_LENGTH: usize = 256;
pub const MAX_STRING_LENGTH: usize = 4096;
pub const MAX_TIMEDELTA_LENGTH: usize = 7 * MAX_NUMBER_LENGTH;
pub const MAX_COMMENT_LENGTH: usize = 16384;
pub const MAX_SKIPPABLE_LENGTH: usize = 65536;

type LexResult = Result<Token, LexicalError>;

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_middle(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_skippable(c: char) -> bool {
    c.is_whitespace() || c == COMMENT_BOUND
}

fn digit_value(c: char) -> i64 {
    (c as u8 - b'0') as i64
}

/// Index into a timedelta's fields for its unit character.
fn unit_index(c: char) -> Option<usize> {
    "YMWDhms".find(c)
}

pub struct Lexer<'i> {
    reader: SourceReader,
    interner: &'i mut Interner,
    cached: Option<Token>,
    warnings: Vec<LexicalWarning>,
}

impl<'i> Lexer<'i> {
    pub fn new(reader: SourceReader, interner: &'i mut Interner) -> Self {
        Lexer {
            reader,
            interner,
            cached: None,
            warnings: Vec::new(),
        }
    }

    /// Next token without consuming it.
    pub fn peek(&mut self) -> LexResult {
        if let Some(tok) = &self.cached {
            return Ok(tok.clone());
        }
        self.reader.checkpoint();
        let tok = self.produce()?;
        self.reader.rewind_backward();
        self.cached = Some(tok.clone());
        Ok(tok)
    }

    /// Next token, consumed. At end of file this keeps returning `END`.
    pub fn get(&mut self) -> LexResult {
        if let Some(tok) = self.cached.take() {
            self.reader.rewind_forward();
            return Ok(tok);
        }
        self.produce()
    }

    /// Warnings reported so far, in source order.
    pub fn warnings(&self) -> &[LexicalWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<LexicalWarning> {
        std::mem::take(&mut self.warnings)
    }

    fn produce(&mut self) -> LexResult {
        self.skip_to_unskippable()?;
        self.tokenize()
    }

    fn warn(&mut self, pos: Position, kind: LexicalWarningKind) {
        self.warnings.push(LexicalWarning { pos, kind });
    }

    fn error_at(&self, pos: Position, kind: LexicalErrorKind) -> LexicalError {
        LexicalError { pos, kind }
    }

    fn skip_to_unskippable(&mut self) -> Result<(), LexicalError> {
        let start = self.reader.position();
        let mut count = 0usize;
        while let Some(c) = self.reader.peek() {
            if !is_skippable(c) {
                break;
            }
            if count >= MAX_SKIPPABLE_LENGTH {
                return Err(self.error_at(
                    start,
                    LexicalErrorKind::SkippableTooLong {
                        max: MAX_SKIPPABLE_LENGTH,
                    },
                ));
            }
            if c == COMMENT_BOUND {
                count += self.skip_comment()?;
            } else {
                self.reader.get();
                count += 1;
            }
        }
        Ok(())
    }

    /// Consumes a `#…#` comment and returns how many characters it spanned.
    fn skip_comment(&mut self) -> Result<usize, LexicalError> {
        let start = self.reader.position();
        self.reader.get();
        let mut count = 0usize;
        loop {
            match self.reader.peek() {
                None => {
                    self.warn(start, LexicalWarningKind::UnclosedComment);
                    return Ok(count + 1);
                }
                Some(COMMENT_BOUND) => {
                    self.reader.get();
                    return Ok(count + 2);
                }
                Some(_) => {
                    count += 1;
                    if count > MAX_COMMENT_LENGTH {
                        return Err(self.error_at(
                            start,
                            LexicalErrorKind::CommentTooLong {
                                max: MAX_COMMENT_LENGTH,
                            },
                        ));
                    }
                    self.reader.get();
                }
            }
        }
    }

    fn tokenize(&mut self) -> LexResult {
        let start = self.reader.position();
        let Some(c) = self.reader.peek() else {
            return Ok(Token::new(TokenType::End, start));
        };
        if is_identifier_start(c) {
            self.identifier(start)
        } else if c.is_ascii_digit() {
            self.numeric(start)
        } else if c == STRING_BOUND {
            self.string_literal(start)
        } else if c == TIMEDELTA_BOUND {
            self.timedelta_literal(start)
        } else if let Some((alone, with_equals)) = TokenType::ambiguous(c) {
            self.reader.get();
            if self.reader.peek() == Some('=') {
                self.reader.get();
                Ok(Token::new(with_equals, start))
            } else {
                Ok(Token::new(alone, start))
            }
        } else if let Some(kind) = TokenType::singular(c) {
            self.reader.get();
            Ok(Token::new(kind, start))
        } else {
            Err(self.error_at(start, LexicalErrorKind::UnexpectedCharacter))
        }
    }

    fn identifier(&mut self, start: Position) -> LexResult {
        let mut lexeme = String::new();
        lexeme.push(self.reader.get().expect("caller saw a character"));
        while let Some(c) = self.reader.peek() {
            if !is_identifier_middle(c) {
                break;
            }
            if lexeme.len() >= MAX_IDENTIFIER_LENGTH {
                return Err(self.error_at(
                    start,
                    LexicalErrorKind::IdentifierTooLong {
                        max: MAX_IDENTIFIER_LENGTH,
                    },
                ));
            }
            self.reader.get();
            lexeme.push(c);
        }
        if let Some(keyword) = TokenType::keyword(&lexeme) {
            return Ok(Token::new(keyword, start));
        }
        let sym = self.interner.intern(&lexeme);
        Ok(Token::with_value(
            TokenType::Identifier,
            start,
            TokenValue::Identifier(sym),
        ))
    }

    /// Reads a bare digit run. A single leading `0` terminates the number
    /// immediately; the caller decides what a following digit means.
    fn number(&mut self, start: Position) -> Result<i64, LexicalError> {
        let first = self.reader.get().expect("caller saw a digit");
        let mut value = digit_value(first);
        if value == 0 {
            return Ok(0);
        }
        let mut length = 1usize;
        while let Some(c) = self.reader.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            length += 1;
            if length > MAX_NUMBER_LENGTH {
                return Err(self.error_at(
                    start,
                    LexicalErrorKind::NumberTooLong {
                        max: MAX_NUMBER_LENGTH,
                    },
                ));
            }
            self.reader.get();
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit_value(c)))
                .ok_or_else(|| self.error_at(start, LexicalErrorKind::NumberOutOfRange))?;
        }
        Ok(value)
    }

    /// Dispatches a leading digit into a plain number or a date, time or
    /// datetime literal.
    ///
    /// A leading `0` followed by another digit starts a two-digit literal
    /// component (`05.06.2020`, `09:30:00`). The date separator is only
    /// consumed when the digits read so far form a possible day of month
    /// and the lookahead shows `.DD.`; otherwise the digits stay a plain
    /// number and the dot is left for the next token.
    fn numeric(&mut self, start: Position) -> LexResult {
        let base = self.number(start)?;
        let number_token = Token::with_value(
            TokenType::NumberLiteral,
            start,
            TokenValue::Number(base),
        );

        let first = match self.reader.peek() {
            Some(c) if base == 0 && c.is_ascii_digit() => {
                self.reader.get();
                digit_value(c)
            }
            _ if base < 10 => return Ok(number_token),
            _ => base,
        };

        match self.reader.peek() {
            Some(DATE_SEPARATOR) if (1..=31).contains(&first) && self.date_follows() => {
                self.date_or_datetime(start, first)
            }
            Some(TIME_SEPARATOR) => self.time_literal(start, first),
            Some(c) if c.is_ascii_digit() => {
                Err(self.error_at(start, LexicalErrorKind::UnexpectedDigit))
            }
            _ => Ok(number_token),
        }
    }

    /// True when the upcoming characters read `.DD.`, i.e. the dot opens
    /// a date literal rather than a time-info access.
    fn date_follows(&self) -> bool {
        let ahead: Vec<char> = self.reader.peek_many(4).chars().collect();
        ahead.len() == 4
            && ahead[0] == DATE_SEPARATOR
            && ahead[1].is_ascii_digit()
            && ahead[2].is_ascii_digit()
            && ahead[3] == DATE_SEPARATOR
    }

    fn two_digits(&mut self, start: Position) -> Result<i64, LexicalError> {
        let mut value = 0;
        for _ in 0..2 {
            match self.reader.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.reader.get();
                    value = value * 10 + digit_value(c);
                }
                _ => return Err(self.error_at(start, LexicalErrorKind::ExpectedDigit)),
            }
        }
        Ok(value)
    }

    fn expect_char(&mut self, start: Position, expected: char) -> Result<(), LexicalError> {
        if self.reader.peek() != Some(expected) {
            return Err(self.error_at(start, LexicalErrorKind::ExpectedCharacter(expected)));
        }
        self.reader.get();
        Ok(())
    }

    fn date_or_datetime(&mut self, start: Position, day: i64) -> LexResult {
        self.reader.get();
        let month = self.two_digits(start)?;
        self.expect_char(start, DATE_SEPARATOR)?;
        let year = self.two_digits(start)? * 100 + self.two_digits(start)?;

        if self.reader.peek() != Some(DATETIME_SEPARATOR) {
            let date = Date::new(day, month, year)
                .map_err(|e| self.error_at(start, e.into()))?;
            return Ok(Token::with_value(
                TokenType::DateLiteral,
                start,
                TokenValue::Date(date),
            ));
        }
        self.reader.get();

        let hour = self.two_digits(start)?;
        self.expect_char(start, TIME_SEPARATOR)?;
        let minute = self.two_digits(start)?;
        self.expect_char(start, TIME_SEPARATOR)?;
        let second = self.two_digits(start)?;

        let datetime = DateTime::new(day, month, year, hour, minute, second)
            .map_err(|e| self.error_at(start, e.into()))?;
        Ok(Token::with_value(
            TokenType::DateTimeLiteral,
            start,
            TokenValue::DateTime(datetime),
        ))
    }

    fn time_literal(&mut self, start: Position, hour: i64) -> LexResult {
        self.reader.get();
        let minute = self.two_digits(start)?;
        self.expect_char(start, TIME_SEPARATOR)?;
        let second = self.two_digits(start)?;

        let time = Time::new(hour, minute, second)
            .map_err(|e| self.error_at(start, e.into()))?;
        Ok(Token::with_value(
            TokenType::TimeLiteral,
            start,
            TokenValue::Time(time),
        ))
    }

    fn string_literal(&mut self, start: Position) -> LexResult {
        self.reader.get();
        let mut value = String::new();
        let mut length = 0usize;
        loop {
            let Some(c) = self.reader.peek() else {
                self.warn(start, LexicalWarningKind::UnclosedString);
                break;
            };
            if c == STRING_BOUND {
                self.reader.get();
                break;
            }
            length += 1;
            if length > MAX_STRING_LENGTH {
                return Err(self.error_at(
                    start,
                    LexicalErrorKind::StringTooLong {
                        max: MAX_STRING_LENGTH,
                    },
                ));
            }
            if c == token::ESCAPE {
                let ahead: Vec<char> = self.reader.peek_many(2).chars().collect();
                if ahead.get(1) == Some(&STRING_BOUND) {
                    self.reader.get();
                }
            }
            value.push(self.reader.get().expect("peeked a character"));
        }
        Ok(Token::with_value(
            TokenType::StringLiteral,
            start,
            TokenValue::String(value),
        ))
    }

    fn timedelta_literal(&mut self, start: Position) -> LexResult {
        self.reader.get();
        let mut fields: [Option<i64>; 7] = [None; 7];
        let mut components = 0usize;
        loop {
            let Some(c) = self.reader.peek() else {
                self.warn(start, LexicalWarningKind::UnclosedTimedelta);
                break;
            };
            if c == TIMEDELTA_BOUND {
                self.reader.get();
                break;
            }
            components += 1;
            if components > MAX_TIMEDELTA_LENGTH {
                return Err(self.error_at(
                    start,
                    LexicalErrorKind::TimedeltaTooLong {
                        max: MAX_TIMEDELTA_LENGTH,
                    },
                ));
            }
            if c.is_ascii_digit() {
                let number_start = self.reader.position();
                let value = self.number(number_start)?;
                let Some(unit) = self.reader.peek() else {
                    return Err(self.error_at(start, LexicalErrorKind::MissingTimeUnit));
                };
                let Some(index) = unit_index(unit) else {
                    return Err(self.error_at(start, LexicalErrorKind::UnknownTimeUnit(unit)));
                };
                if fields[index].is_some() {
                    return Err(self.error_at(start, LexicalErrorKind::DuplicateTimeUnit(unit)));
                }
                self.reader.get();
                fields[index] = Some(value);
            } else if c.is_whitespace() {
                self.reader.get();
            } else {
                return Err(self.error_at(start, LexicalErrorKind::BadTimedeltaCharacter));
            }
        }
        let delta = Timedelta::new(
            fields[0].unwrap_or(0),
            fields[1].unwrap_or(0),
            fields[2].unwrap_or(0),
            fields[3].unwrap_or(0),
            fields[4].unwrap_or(0),
            fields[5].unwrap_or(0),
            fields[6].unwrap_or(0),
        );
        Ok(Token::with_value(
            TokenType::TimedeltaLiteral,
            start,
            TokenValue::Timedelta(delta),
        ))
    }
}
