//! Plain-text tree dump for the `parse` command.

use std::fmt::Write as _;

use prim_ir::{Ast, ExprId, ExprKind, Name, StmtId, StmtRange, StringInterner};
use prim_parse::ParseOutput;

/// Render a parsed source unit as an indented tree, one node per line.
pub fn dump_program(out: &ParseOutput, interner: &StringInterner) -> String {
    let mut dumper = Dumper {
        ast: &out.ast,
        interner,
        buf: String::new(),
    };
    for field in &out.program.fields {
        let keyword = if field.constant { "const" } else { "var" };
        let name = interner.lookup(field.name);
        match field.ty {
            Some(ty) => {
                let ty = interner.lookup(ty);
                dumper.line(0, &format!("{keyword} {name}: {ty}"));
            }
            None => dumper.line(0, &format!("{keyword} {name}")),
        }
        if let Some(init) = field.init {
            dumper.expr(init, 1);
        }
    }
    for method in &out.program.methods {
        let name = interner.lookup(method.name);
        let params: Vec<String> = method
            .params
            .iter()
            .map(|p| format!("{}: {}", interner.lookup(p.name), interner.lookup(p.ty)))
            .collect();
        let ret = match method.ret {
            Some(ty) => format!(": {}", interner.lookup(ty)),
            None => String::new(),
        };
        dumper.line(0, &format!("func {name}({}){ret}", params.join(", ")));
        dumper.block(method.body, 1);
    }
    dumper.buf
}

struct Dumper<'a> {
    ast: &'a Ast,
    interner: &'a StringInterner,
    buf: String,
}

impl Dumper<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    fn name(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    fn block(&mut self, body: StmtRange, depth: usize) {
        for &stmt in self.ast.stmt_list(body) {
            self.stmt(stmt, depth);
        }
    }

    fn stmt(&mut self, id: StmtId, depth: usize) {
        use prim_ir::StmtKind;
        match self.ast.stmt(id).kind.clone() {
            StmtKind::Expr(expr) => {
                self.line(depth, "expr");
                self.expr(expr, depth + 1);
            }
            StmtKind::Declare { name, ty, init } => {
                let name = self.name(name);
                match ty {
                    Some(ty) => {
                        let ty = self.name(ty);
                        self.line(depth, &format!("var {name}: {ty}"));
                    }
                    None => self.line(depth, &format!("var {name}")),
                }
                if let Some(init) = init {
                    self.expr(init, depth + 1);
                }
            }
            StmtKind::Assign { target, value } => {
                self.line(depth, "assign");
                self.expr(target, depth + 1);
                self.expr(value, depth + 1);
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.line(depth, "if");
                self.expr(cond, depth + 1);
                self.line(depth, "then");
                self.block(then_body, depth + 1);
                if !else_body.is_empty() {
                    self.line(depth, "else");
                    self.block(else_body, depth + 1);
                }
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                self.line(depth, "for");
                self.stmt(init, depth + 1);
                self.expr(cond, depth + 1);
                self.stmt(step, depth + 1);
                self.block(body, depth + 1);
            }
            StmtKind::While { cond, body } => {
                self.line(depth, "while");
                self.expr(cond, depth + 1);
                self.block(body, depth + 1);
            }
            StmtKind::Return(value) => {
                self.line(depth, "return");
                if let Some(value) = value {
                    self.expr(value, depth + 1);
                }
            }
        }
    }

    fn expr(&mut self, id: ExprId, depth: usize) {
        match self.ast.expr(id).kind.clone() {
            ExprKind::Nil => self.line(depth, "nil"),
            ExprKind::Bool(value) => self.line(depth, &format!("bool {value}")),
            ExprKind::Int(value) => self.line(depth, &format!("int {value}")),
            ExprKind::Decimal(bits) => {
                let value = f64::from_bits(bits);
                self.line(depth, &format!("decimal {value}"));
            }
            ExprKind::Char(value) => self.line(depth, &format!("char '{value}'")),
            ExprKind::Text(name) => {
                let text = self.name(name);
                let mut line = String::new();
                let _ = write!(line, "text {text:?}");
                self.line(depth, &line);
            }
            ExprKind::Group(inner) => {
                self.line(depth, "group");
                self.expr(inner, depth + 1);
            }
            ExprKind::Binary { op, left, right } => {
                self.line(depth, &format!("binary {op}"));
                self.expr(left, depth + 1);
                self.expr(right, depth + 1);
            }
            ExprKind::Access { receiver, name } => {
                let name = self.name(name);
                self.line(depth, &format!("access {name}"));
                if let Some(recv) = receiver {
                    self.expr(recv, depth + 1);
                }
            }
            ExprKind::Call {
                receiver,
                name,
                args,
            } => {
                let name = self.name(name);
                self.line(depth, &format!("call {name}/{}", args.len()));
                if let Some(recv) = receiver {
                    self.expr(recv, depth + 1);
                }
                for &arg in self.ast.expr_list(args) {
                    self.expr(arg, depth + 1);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prim_ir::StringInterner;

    #[test]
    fn dump_shows_structure() {
        let interner = StringInterner::new();
        let tokens = prim_lexer::lex(
            "var num = 1;\nfunc main(): Integer { return num + 1; }",
            &interner,
        )
        .unwrap_or_else(|e| panic!("lex failed: {e}"));
        let out = prim_parse::parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let dump = dump_program(&out, &interner);
        assert_eq!(
            dump,
            "var num\n  int 1\nfunc main(): Integer\n  return\n    binary +\n      access num\n      int 1\n"
        );
    }
}
