//! Prim IR - shared representation types for the Prim front end.
//!
//! This crate contains the data structures every pass agrees on:
//! - `Span` for source locations
//! - `Name` and `StringInterner` for identifiers and text literals
//! - `Token`, `TokenKind`, `TokenList` for the lexer/parser contract
//! - The flat syntax tree (`Ast`, `Expr`, `Stmt`, `Program`) addressed by
//!   `ExprId`/`StmtId` indices
//! - `ScopeArena`, the nested-scope binding model shared in shape (not
//!   payload) by the analyzer and the interpreter
//!
//! # Design
//!
//! - Strings are interned to `Name(u32)` for O(1) equality
//! - Tree nodes live in contiguous arenas; children are indices, not boxes
//! - Passes never mutate the tree; resolved information goes into
//!   side-tables keyed by node id

pub mod ast;
mod ids;
mod interner;
mod name;
pub mod scope;
mod span;
mod token;

pub use ast::{
    Ast, BinaryOp, Expr, ExprKind, Field, Method, Param, Program, Stmt, StmtKind,
};
pub use ids::{ExprId, ExprRange, StmtId, StmtRange};
pub use interner::StringInterner;
pub use name::Name;
pub use scope::{AlreadyBound, ScopeArena, ScopeId};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};
