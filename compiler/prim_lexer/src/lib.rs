//! Hand-written lexer for Prim.
//!
//! Turns source text into a [`TokenList`] fulfilling the parser's token
//! contract: every token carries a kind and a byte span, and the list ends
//! with an `Eof` token. Whitespace and `//` comments are trivia and never
//! tokenized. The first lexical error aborts the scan.

mod scanner;

pub use scanner::{lex, LexError};
