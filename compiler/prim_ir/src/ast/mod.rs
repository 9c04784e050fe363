//! Flat syntax tree for Prim.
//!
//! Nodes live in contiguous arenas owned by [`Ast`]; children are
//! `ExprId`/`StmtId` indices. The tree is immutable once parsed — the
//! analyzer records everything it resolves in side-tables keyed by node id,
//! never on the nodes themselves.

mod expr;
mod item;
mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind};
pub use item::{Field, Method, Param, Program};
pub use stmt::{Stmt, StmtKind};

use crate::{ExprId, ExprRange, StmtId, StmtRange};

/// Arena storage for expressions and statements.
///
/// Argument lists and statement bodies are flattened into side arrays and
/// referenced by `(start, len)` ranges.
#[derive(Debug, Default)]
pub struct Ast {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    /// Allocate an expression, returning its id.
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(expr);
        id
    }

    /// Allocate a statement, returning its id.
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX));
        self.stmts.push(stmt);
        id
    }

    /// Flatten an argument list into the arena.
    pub fn alloc_expr_list(&mut self, ids: Vec<ExprId>) -> ExprRange {
        let start = u32::try_from(self.expr_lists.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(ids.len()).unwrap_or(u32::MAX);
        self.expr_lists.extend(ids);
        ExprRange { start, len }
    }

    /// Flatten a statement body into the arena.
    pub fn alloc_stmt_list(&mut self, ids: Vec<StmtId>) -> StmtRange {
        let start = u32::try_from(self.stmt_lists.len()).unwrap_or(u32::MAX);
        let len = u32::try_from(ids.len()).unwrap_or(u32::MAX);
        self.stmt_lists.extend(ids);
        StmtRange { start, len }
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    /// Resolve an argument range to its expression ids.
    #[inline]
    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Resolve a body range to its statement ids.
    #[inline]
    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        let start = range.start as usize;
        &self.stmt_lists[start..start + range.len()]
    }

    /// Number of allocated expressions (side-tables size to this).
    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}
