//! The character scanner.

use std::fmt;

use prim_diagnostic::{Diagnostic, ErrorCode};
use prim_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Lexical error: malformed literal or unexpected character.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct LexError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl LexError {
    fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        LexError {
            code,
            message: message.into(),
            span,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self.code, self.message).with_span(self.span)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.span)
    }
}

impl std::error::Error for LexError {}

/// Scan `source` into a token list ending with `Eof`.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let mut scanner = Scanner {
        source,
        pos: 0,
        interner,
        tokens: TokenList::with_capacity(source.len() / 4),
    };
    scanner.run()?;
    Ok(scanner.tokens)
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    interner: &'a StringInterner,
    tokens: TokenList,
}

impl Scanner<'_> {
    fn run(&mut self) -> Result<(), LexError> {
        while let Some(ch) = self.peek() {
            let start = self.pos;
            match ch {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                c if c.is_ascii_digit() => self.number(start)?,
                c if c == '_' || c.is_ascii_alphabetic() => self.ident_or_keyword(start),
                '\'' => self.char_literal(start)?,
                '"' => self.text_literal(start)?,
                _ => self.operator(start)?,
            }
        }
        let eof = Span::point(self.offset());
        self.tokens.push(Token::new(TokenKind::Eof, eof));
        Ok(())
    }

    fn number(&mut self, start: usize) -> Result<(), LexError> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        // A decimal point needs a digit after it; `1.abs()`-style member
        // access does not exist in Prim, so `.` + digit is unambiguous.
        let is_decimal = self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if is_decimal {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.bump();
            }
            let text = &self.source[start..self.pos];
            let value: f64 = text.parse().map_err(|_| {
                LexError::new(
                    ErrorCode::E1002,
                    format!("malformed decimal literal `{text}`"),
                    self.span_from(start),
                )
            })?;
            self.push(TokenKind::Decimal(value.to_bits()), start);
        } else {
            let text = &self.source[start..self.pos];
            let value: i64 = text.parse().map_err(|_| {
                LexError::new(
                    ErrorCode::E1002,
                    format!("integer literal `{text}` too large"),
                    self.span_from(start),
                )
            })?;
            self.push(TokenKind::Int(value), start);
        }
        Ok(())
    }

    fn ident_or_keyword(&mut self, start: usize) {
        while self
            .peek()
            .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric())
        {
            self.bump();
        }
        let text = &self.source[start..self.pos];
        let kind = match text {
            "const" => TokenKind::Const,
            "var" => TokenKind::Var,
            "func" => TokenKind::Func,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            _ => TokenKind::Ident(self.interner.intern(text)),
        };
        self.push(kind, start);
    }

    fn char_literal(&mut self, start: usize) -> Result<(), LexError> {
        self.bump(); // opening quote
        let ch = match self.peek() {
            Some('\\') => {
                self.bump();
                self.escape(start)?
            }
            Some('\'') | None => {
                return Err(LexError::new(
                    ErrorCode::E1002,
                    "empty character literal",
                    self.span_from(start),
                ));
            }
            Some(c) => {
                self.bump();
                c
            }
        };
        if self.peek() != Some('\'') {
            return Err(LexError::new(
                ErrorCode::E1002,
                "unterminated character literal",
                self.span_from(start),
            ));
        }
        self.bump(); // closing quote
        self.push(TokenKind::Char(ch), start);
        Ok(())
    }

    fn text_literal(&mut self, start: usize) -> Result<(), LexError> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    value.push(self.escape(start)?);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
                None => {
                    return Err(LexError::new(
                        ErrorCode::E1002,
                        "unterminated text literal",
                        self.span_from(start),
                    ));
                }
            }
        }
        self.push(TokenKind::Text(self.interner.intern(&value)), start);
        Ok(())
    }

    /// Consume the character after a backslash.
    fn escape(&mut self, literal_start: usize) -> Result<char, LexError> {
        let ch = self.peek().ok_or_else(|| {
            LexError::new(
                ErrorCode::E1002,
                "unterminated escape sequence",
                self.span_from(literal_start),
            )
        })?;
        self.bump();
        match ch {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '\\' => Ok('\\'),
            '\'' => Ok('\''),
            '"' => Ok('"'),
            other => Err(LexError::new(
                ErrorCode::E1002,
                format!("unknown escape sequence `\\{other}`"),
                self.span_from(literal_start),
            )),
        }
    }

    fn operator(&mut self, start: usize) -> Result<(), LexError> {
        let ch = self.peek().unwrap_or('\0');
        self.bump();
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::BangEq
                } else {
                    return Err(self.unexpected(start, '!'));
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpAmp
                } else {
                    return Err(self.unexpected(start, '&'));
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::PipePipe
                } else {
                    return Err(self.unexpected(start, '|'));
                }
            }
            other => return Err(self.unexpected(start, other)),
        };
        self.push(kind, start);
        Ok(())
    }

    fn unexpected(&self, start: usize, ch: char) -> LexError {
        LexError::new(
            ErrorCode::E1003,
            format!("unexpected character `{ch}`"),
            self.span_from(start),
        )
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    // Low-level cursor helpers

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, nth: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(nth)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn offset(&self) -> u32 {
        u32::try_from(self.pos).unwrap_or(u32::MAX)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(u32::try_from(start).unwrap_or(u32::MAX), self.offset())
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        let span = self.span_from(start);
        self.tokens.push(Token::new(kind, span));
    }
}
