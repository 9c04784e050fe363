//! Recursive descent parser for Prim.
//!
//! Consumes the token contract from `prim_lexer` and produces the flat
//! syntax tree from `prim_ir`. Binary expressions are parsed with a
//! precedence-level chain (one function per level, left-deep loops); no
//! semantic checks happen here. The first expected-token mismatch aborts
//! the parse with the offending token's offset.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use prim_ir::{Ast, Name, Program, Span, Token, TokenKind, TokenList};
use tracing::debug;

/// Result of a successful parse: the source unit plus the node arena its
/// ids point into.
pub struct ParseOutput {
    pub program: Program,
    pub ast: Ast,
}

/// Parse a token stream into a source unit.
pub fn parse(tokens: &TokenList) -> Result<ParseOutput, ParseError> {
    debug!(tokens = tokens.len(), "parsing source unit");
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    Ok(ParseOutput {
        program,
        ast: parser.ast,
    })
}

/// Parser state: a cursor over the tokens plus the arena being built.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    ast: Ast,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            ast: Ast::new(),
        }
    }

    // Cursor delegation

    #[inline]
    fn current_kind(&self) -> &TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn previous_span(&self) -> Span {
        self.cursor.previous_span()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn next_is_lparen(&self) -> bool {
        self.cursor.next_is_lparen()
    }

    #[inline]
    fn advance(&mut self) -> &Token {
        self.cursor.advance()
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<&Token, ParseError> {
        self.cursor.expect(kind)
    }

    #[inline]
    fn expect_ident(&mut self) -> Result<Name, ParseError> {
        self.cursor.expect_ident()
    }
}
