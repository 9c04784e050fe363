//! Expression parsing: the precedence chain and primaries.
//!
//! One function per precedence level, lowest binding first. Each level
//! parses one level down, then loops while the next token is an operator of
//! its own level, building a left-deep binary node — precedence climbing
//! without a table.

use prim_diagnostic::ErrorCode;
use prim_ir::{BinaryOp, Expr, ExprId, ExprKind, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.parse_logical()
    }

    /// `&&` and `||` (lowest level).
    fn parse_logical(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_logical_op() {
            self.advance();
            let right = self.parse_comparison()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// `==`, `!=`, `<`, `<=`, `>`, `>=`.
    fn parse_comparison(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_comparison_op() {
            self.advance();
            let right = self.parse_additive()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// `+` and `-`.
    fn parse_additive(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_additive_op() {
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// `*` and `/`.
    fn parse_multiplicative(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_power()?;
        while let Some(op) = self.match_multiplicative_op() {
            self.advance();
            let right = self.parse_power()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    /// `^` (tightest binary level).
    fn parse_power(&mut self) -> Result<ExprId, ParseError> {
        let mut left = self.parse_primary()?;
        while self.check(&TokenKind::Caret) {
            self.advance();
            let right = self.parse_primary()?;
            left = self.binary(BinaryOp::Pow, left, right);
        }
        Ok(left)
    }

    /// Literal, parenthesized group, or identifier chain; then dotted
    /// postfix continuation for receiver-qualified access and calls.
    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let span = self.current_span();
        let mut expr = match self.current_kind().clone() {
            TokenKind::Nil => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Nil, span))
            }
            TokenKind::True => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Bool(true), span))
            }
            TokenKind::False => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Bool(false), span))
            }
            TokenKind::Int(value) => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Int(value), span))
            }
            TokenKind::Decimal(bits) => {
                self.advance();
                self.ast
                    .alloc_expr(Expr::new(ExprKind::Decimal(bits), span))
            }
            TokenKind::Char(value) => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Char(value), span))
            }
            TokenKind::Text(value) => {
                self.advance();
                self.ast.alloc_expr(Expr::new(ExprKind::Text(value), span))
            }
            TokenKind::LParen => self.parse_group()?,
            TokenKind::Ident(name) => {
                // One-token lookahead: `name(` is a call, bare `name` an access.
                if self.next_is_lparen() {
                    self.advance();
                    let args = self.parse_args()?;
                    let span = span.merge(self.previous_span());
                    self.ast.alloc_expr(Expr::new(
                        ExprKind::Call {
                            receiver: None,
                            name,
                            args,
                        },
                        span,
                    ))
                } else {
                    self.advance();
                    self.ast.alloc_expr(Expr::new(
                        ExprKind::Access {
                            receiver: None,
                            name,
                        },
                        span,
                    ))
                }
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    format!("expected expression, found {}", other.display_name()),
                    span,
                ));
            }
        };

        // Dotted continuation: `recv.name` and `recv.name(args)`.
        while self.check(&TokenKind::Dot) {
            self.advance();
            let name = self.expect_ident()?;
            if self.check(&TokenKind::LParen) {
                let args = self.parse_args()?;
                let span = span.merge(self.previous_span());
                expr = self.ast.alloc_expr(Expr::new(
                    ExprKind::Call {
                        receiver: Some(expr),
                        name,
                        args,
                    },
                    span,
                ));
            } else {
                let span = span.merge(self.previous_span());
                expr = self.ast.alloc_expr(Expr::new(
                    ExprKind::Access {
                        receiver: Some(expr),
                        name,
                    },
                    span,
                ));
            }
        }

        Ok(expr)
    }

    /// `( expr )` — a group node wraps a binary expression; parentheses
    /// around anything else are transparent.
    fn parse_group(&mut self) -> Result<ExprId, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LParen)?;
        let inner = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        if matches!(self.ast.expr(inner).kind, ExprKind::Binary { .. }) {
            let span = start.merge(self.previous_span());
            Ok(self.ast.alloc_expr(Expr::new(ExprKind::Group(inner), span)))
        } else {
            Ok(inner)
        }
    }

    /// `( expr, expr, ... )` — comma separated, no trailing comma.
    fn parse_args(&mut self) -> Result<prim_ir::ExprRange, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(self.ast.alloc_expr_list(args))
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.ast.expr(left).span.merge(self.ast.expr(right).span);
        self.ast
            .alloc_expr(Expr::new(ExprKind::Binary { op, left, right }, span))
    }

    // Operator matching helpers

    fn match_logical_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::AmpAmp => Some(BinaryOp::And),
            TokenKind::PipePipe => Some(BinaryOp::Or),
            _ => None,
        }
    }

    fn match_comparison_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::BangEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }
    }

    fn match_additive_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        }
    }

    fn match_multiplicative_op(&self) -> Option<BinaryOp> {
        match self.current_kind() {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }
}
