//! Grammar rules.
//!
//! - `mod.rs`: source unit, fields, methods
//! - `stmt.rs`: statement dispatch and blocks
//! - `expr.rs`: precedence chain and primaries

mod expr;
mod stmt;

use prim_diagnostic::ErrorCode;
use prim_ir::{Field, Method, Param, Program, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a whole source unit: fields, then methods, in any order.
    pub(crate) fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::default();
        while !self.is_at_end() {
            match self.current_kind() {
                TokenKind::Const | TokenKind::Var => {
                    let field = self.parse_field()?;
                    program.fields.push(field);
                }
                TokenKind::Func => {
                    let method = self.parse_method()?;
                    program.methods.push(method);
                }
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "expected `const`, `var` or `func`, found {}",
                            other.display_name()
                        ),
                        self.current_span(),
                    ));
                }
            }
        }
        Ok(program)
    }

    /// `const name: Type = init;` or `var name = init;`
    ///
    /// Type annotation and initializer are each optional here; the analyzer
    /// rejects a field with neither.
    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let start = self.current_span();
        let constant = self.check(&TokenKind::Const);
        self.advance();

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
        self.expect(&TokenKind::Semi)?;

        Ok(Field {
            name,
            ty,
            constant,
            init,
            span: start.merge(self.previous_span()),
        })
    }

    /// `func name(a: T, b: U): R { body }`
    fn parse_method(&mut self) -> Result<Method, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::Func)?;
        let name = self.expect_ident()?;

        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        let ret = if self.check(&TokenKind::Colon) {
            self.advance();
            Some(self.expect_ident()?)
        } else {
            None
        };

        let body = self.parse_block()?;
        Ok(Method {
            name,
            params,
            ret,
            body,
            span: start.merge(self.previous_span()),
        })
    }

    /// `name: Type` — parameter types are mandatory.
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.current_span();
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Colon)?;
        let ty = self.expect_ident()?;
        Ok(Param {
            name,
            ty,
            span: start.merge(self.previous_span()),
        })
    }
}
