//! Statement parsing.
//!
//! Statements dispatch on their leading keyword; anything else is parsed as
//! an expression and then classified by the token that follows: `=` makes
//! an assignment, `;` an expression statement.

use prim_ir::{Stmt, StmtId, StmtKind, StmtRange, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<StmtRange, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.ast.alloc_stmt_list(stmts))
    }

    fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        match self.current_kind() {
            TokenKind::Var => {
                let stmt = self.parse_declare()?;
                self.expect(&TokenKind::Semi)?;
                Ok(stmt)
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            _ => {
                let stmt = self.parse_expr_or_assign()?;
                self.expect(&TokenKind::Semi)?;
                Ok(stmt)
            }
        }
    }

    /// `var name: Type = init` (no trailing `;` — callers own the
    /// terminator, so `for` headers can reuse this rule).
    fn parse_declare(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::Var)?;
        let name = self.expect_ident()?;
        let ty = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.expect_ident()?)
        } else {
            None
        };
        let init = if self.check(&TokenKind::Assign) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        let span = start.merge(self.previous_span());
        Ok(self
            .ast
            .alloc_stmt(Stmt::new(StmtKind::Declare { name, ty, init }, span)))
    }

    /// An expression, upgraded to an assignment if `=` follows.
    fn parse_expr_or_assign(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        let expr = self.parse_expr()?;
        if self.check(&TokenKind::Assign) {
            self.advance();
            let value = self.parse_expr()?;
            let span = start.merge(self.previous_span());
            Ok(self.ast.alloc_stmt(Stmt::new(
                StmtKind::Assign {
                    target: expr,
                    value,
                },
                span,
            )))
        } else {
            let span = start.merge(self.previous_span());
            Ok(self.ast.alloc_stmt(Stmt::new(StmtKind::Expr(expr), span)))
        }
    }

    /// `if (cond) { then } else { else }`
    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_body = self.parse_block()?;
        let else_body = if self.check(&TokenKind::Else) {
            self.advance();
            self.parse_block()?
        } else {
            prim_ir::StmtRange::EMPTY
        };
        let span = start.merge(self.previous_span());
        Ok(self.ast.alloc_stmt(Stmt::new(
            StmtKind::If {
                cond,
                then_body,
                else_body,
            },
            span,
        )))
    }

    /// `for (init; cond; step) { body }` — init is a declaration or an
    /// assignment/expression, step an assignment/expression.
    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::For)?;
        self.expect(&TokenKind::LParen)?;
        let init = if self.check(&TokenKind::Var) {
            self.parse_declare()?
        } else {
            self.parse_expr_or_assign()?
        };
        self.expect(&TokenKind::Semi)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Semi)?;
        let step = self.parse_expr_or_assign()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Ok(self.ast.alloc_stmt(Stmt::new(
            StmtKind::For {
                init,
                cond,
                step,
                body,
            },
            span,
        )))
    }

    /// `while (cond) { body }`
    fn parse_while(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Ok(self
            .ast
            .alloc_stmt(Stmt::new(StmtKind::While { cond, body }, span)))
    }

    /// `return expr;` or `return;`
    fn parse_return(&mut self) -> Result<StmtId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semi)?;
        let span = start.merge(self.previous_span());
        Ok(self.ast.alloc_stmt(Stmt::new(StmtKind::Return(value), span)))
    }
}
