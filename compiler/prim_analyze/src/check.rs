//! The analysis pass itself.
//!
//! Two passes over the source unit, following the checker architecture of
//! registering every signature before any body is checked so forward and
//! mutually-recursive calls resolve:
//!
//! 1. Register all method signatures in the root scope.
//! 2. Analyze field initializers in order, binding each field.
//! 3. Analyze method bodies, each in a child scope holding its parameters.
//! 4. Require a zero-parameter `main` returning Integer.

use prim_ir::{
    Ast, BinaryOp, ExprId, ExprKind, Field, Method, Name, Program, ScopeArena, ScopeId, StmtId,
    StmtKind, StmtRange, StringInterner,
};
use tracing::debug;

use crate::{
    require_assignable, Analysis, AnalyzeError, FnId, FnInfo, TypeId, TypePool, VarId, VarInfo,
};

/// Context carried through the recursive visit: the current scope and the
/// enclosing method's declared return type.
#[derive(Copy, Clone, Debug)]
pub struct Ctx {
    pub scope: ScopeId,
    pub ret: TypeId,
}

/// Analyze a parsed source unit.
pub fn analyze(
    program: &Program,
    ast: &Ast,
    interner: &StringInterner,
) -> Result<Analysis, AnalyzeError> {
    debug!(
        fields = program.fields.len(),
        methods = program.methods.len(),
        "analyzing source unit"
    );
    let types = TypePool::new(interner);
    let mut analyzer = Analyzer {
        program,
        ast,
        interner,
        scopes: ScopeArena::new(),
        out: Analysis::new(ast.expr_count(), types),
    };
    analyzer.run()?;
    Ok(analyzer.out)
}

struct Analyzer<'a> {
    program: &'a Program,
    ast: &'a Ast,
    interner: &'a StringInterner,
    scopes: ScopeArena<VarId, FnId>,
    out: Analysis,
}

impl Analyzer<'_> {
    fn run(&mut self) -> Result<(), AnalyzeError> {
        let root = self.scopes.root();
        self.register_builtins(root);

        // Pass 1: signatures, so bodies can call methods declared later.
        for method in &self.program.methods {
            let id = self.register_method(root, method)?;
            self.out.method_sigs.push(id);
        }

        // Pass 2: fields, bound in declaration order.
        let field_ctx = Ctx {
            scope: root,
            ret: self.out.types.nil,
        };
        for field in &self.program.fields {
            self.check_field(field, field_ctx)?;
        }

        // Pass 3: bodies.
        for method in &self.program.methods {
            self.check_method_body(root, method)?;
        }

        // Pass 4: the entry point must exist.
        self.require_main(root)
    }

    /// Mirror the interpreter's root-scope builtins: `print/1` takes
    /// anything and yields Nil.
    fn register_builtins(&mut self, root: ScopeId) {
        let name = self.interner.intern("print");
        let id = FnId::new(self.out.funcs.len());
        self.out.funcs.push(FnInfo {
            name,
            emit_name: format!("print_f{}", id.index()),
            params: vec![self.out.types.any],
            ret: self.out.types.nil,
        });
        // The root scope is empty here; the define cannot collide.
        let _ = self.scopes.define_func(root, name, 1, id);
    }

    fn register_method(&mut self, root: ScopeId, method: &Method) -> Result<FnId, AnalyzeError> {
        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            params.push(self.resolve_type(param.ty)?);
        }
        let ret = match method.ret {
            Some(name) => self.resolve_type(name)?,
            None => self.out.types.nil,
        };

        let id = FnId::new(self.out.funcs.len());
        let source = self.interner.lookup(method.name);
        self.out.funcs.push(FnInfo {
            name: method.name,
            emit_name: format!("{source}_f{}", id.index()),
            params,
            ret,
        });

        self.scopes
            .define_func(root, method.name, method.arity(), id)
            .map_err(|_| AnalyzeError::Redefinition {
                name: source.to_string(),
            })?;
        Ok(id)
    }

    fn check_field(&mut self, field: &Field, ctx: Ctx) -> Result<(), AnalyzeError> {
        let ty = self.declared_or_inferred(field.name, field.ty, field.init, ctx)?;
        self.declare_var(ctx.scope, field.name, ty, field.constant)?;
        Ok(())
    }

    fn check_method_body(&mut self, root: ScopeId, method: &Method) -> Result<(), AnalyzeError> {
        let mark = self.scopes.checkpoint();
        let scope = self.scopes.child(root);
        let result = self.check_method_body_in(scope, method);
        self.scopes.truncate(mark);
        result
    }

    fn check_method_body_in(
        &mut self,
        scope: ScopeId,
        method: &Method,
    ) -> Result<(), AnalyzeError> {
        for param in &method.params {
            let ty = self.resolve_type(param.ty)?;
            self.declare_var(scope, param.name, ty, false)?;
        }
        let ret = match method.ret {
            Some(name) => self.resolve_type(name)?,
            None => self.out.types.nil,
        };
        let ctx = Ctx { scope, ret };
        self.check_block_in(method.body, ctx)
    }

    fn require_main(&self, root: ScopeId) -> Result<(), AnalyzeError> {
        let main = self.interner.intern("main");
        let Some(&id) = self.scopes.lookup_func(root, main, 0) else {
            return Err(AnalyzeError::MainMissing);
        };
        if self.out.funcs[id.index()].ret != self.out.types.integer {
            return Err(AnalyzeError::MainMissing);
        }
        Ok(())
    }

    // Statements

    fn check_stmt(&mut self, id: StmtId, ctx: Ctx) -> Result<(), AnalyzeError> {
        match self.ast.stmt(id).kind.clone() {
            StmtKind::Expr(expr) => {
                self.visit_expr(expr, ctx)?;
                Ok(())
            }
            StmtKind::Declare { name, ty, init } => {
                let ty = self.declared_or_inferred(name, ty, init, ctx)?;
                self.declare_var(ctx.scope, name, ty, false)?;
                Ok(())
            }
            StmtKind::Assign { target, value } => self.check_assign(target, value, ctx),
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                self.require_boolean(cond, "if condition", ctx)?;
                if then_body.is_empty() {
                    return Err(AnalyzeError::TypeMismatch {
                        message: "if statement requires a non-empty then branch".to_string(),
                    });
                }
                self.check_block(then_body, ctx)?;
                self.check_block(else_body, ctx)
            }
            StmtKind::While { cond, body } => {
                self.require_boolean(cond, "while condition", ctx)?;
                self.check_block(body, ctx)
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                // The header declaration is visible to cond, step and body.
                let mark = self.scopes.checkpoint();
                let header = Ctx {
                    scope: self.scopes.child(ctx.scope),
                    ..ctx
                };
                let result = self
                    .check_stmt(init, header)
                    .and_then(|()| self.require_boolean(cond, "for condition", header))
                    .and_then(|()| self.check_stmt(step, header))
                    .and_then(|()| self.check_block(body, header));
                self.scopes.truncate(mark);
                result
            }
            StmtKind::Return(value) => {
                let actual = match value {
                    Some(expr) => self.visit_expr(expr, ctx)?,
                    None => self.out.types.nil,
                };
                require_assignable(&self.out.types, ctx.ret, actual, self.interner)
            }
        }
    }

    /// Analyze a statement list in a fresh child scope, discarded on exit.
    fn check_block(&mut self, body: StmtRange, ctx: Ctx) -> Result<(), AnalyzeError> {
        let mark = self.scopes.checkpoint();
        let inner = Ctx {
            scope: self.scopes.child(ctx.scope),
            ..ctx
        };
        let result = self.check_block_in(body, inner);
        self.scopes.truncate(mark);
        result
    }

    /// Analyze a statement list in the given scope.
    fn check_block_in(&mut self, body: StmtRange, ctx: Ctx) -> Result<(), AnalyzeError> {
        for &stmt in self.ast.stmt_list(body) {
            self.check_stmt(stmt, ctx)?;
        }
        Ok(())
    }

    fn check_assign(&mut self, target: ExprId, value: ExprId, ctx: Ctx) -> Result<(), AnalyzeError> {
        if !matches!(self.ast.expr(target).kind, ExprKind::Access { .. }) {
            return Err(AnalyzeError::TypeMismatch {
                message: "left side of assignment must be a variable or field".to_string(),
            });
        }
        let target_ty = self.visit_expr(target, ctx)?;
        if let Some(binding) = self.out.access_binding(target) {
            if binding.constant {
                let name = self.interner.lookup(binding.name);
                return Err(AnalyzeError::TypeMismatch {
                    message: format!("cannot assign to constant `{name}`"),
                });
            }
        }
        let value_ty = self.visit_expr(value, ctx)?;
        require_assignable(&self.out.types, target_ty, value_ty, self.interner)
    }

    // Expressions

    fn visit_expr(&mut self, id: ExprId, ctx: Ctx) -> Result<TypeId, AnalyzeError> {
        let ty = match self.ast.expr(id).kind.clone() {
            ExprKind::Nil => self.out.types.nil,
            ExprKind::Bool(_) => self.out.types.boolean,
            ExprKind::Int(value) => {
                if i32::try_from(value).is_err() {
                    return Err(AnalyzeError::LiteralRange {
                        message: format!("integer literal {value} does not fit 32 bits"),
                    });
                }
                self.out.types.integer
            }
            ExprKind::Decimal(bits) => {
                if f64::from_bits(bits).is_infinite() {
                    return Err(AnalyzeError::LiteralRange {
                        message: "decimal literal overflows to infinity".to_string(),
                    });
                }
                self.out.types.decimal
            }
            ExprKind::Char(_) => self.out.types.character,
            ExprKind::Text(_) => self.out.types.text,
            ExprKind::Group(inner) => self.visit_expr(inner, ctx)?,
            ExprKind::Binary { op, left, right } => self.visit_binary(op, left, right, ctx)?,
            ExprKind::Access { receiver, name } => self.visit_access(id, receiver, name, ctx)?,
            ExprKind::Call {
                receiver,
                name,
                args,
            } => {
                let args = self.ast.expr_list(args).to_vec();
                self.visit_call(id, receiver, name, &args, ctx)?
            }
        };
        self.out.set_expr_type(id, ty);
        Ok(ty)
    }

    fn visit_binary(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        ctx: Ctx,
    ) -> Result<TypeId, AnalyzeError> {
        let lhs = self.visit_expr(left, ctx)?;
        let rhs = self.visit_expr(right, ctx)?;
        let types = &self.out.types;

        if op.is_logical() {
            if lhs != types.boolean || rhs != types.boolean {
                return Err(self.operand_mismatch(op, lhs, rhs));
            }
            return Ok(types.boolean);
        }

        if op.is_comparison() {
            require_assignable(types, types.comparable, lhs, self.interner)?;
            require_assignable(types, types.comparable, rhs, self.interner)?;
            if lhs != rhs {
                return Err(AnalyzeError::TypeMismatch {
                    message: format!(
                        "cannot compare {} with {}",
                        types.display(lhs, self.interner),
                        types.display(rhs, self.interner)
                    ),
                });
            }
            return Ok(types.boolean);
        }

        match op {
            // Text concatenation wins over the numeric rule.
            BinaryOp::Add if lhs == types.text || rhs == types.text => Ok(types.text),
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                if lhs == types.integer && rhs == types.integer {
                    Ok(types.integer)
                } else if lhs == types.decimal && rhs == types.decimal {
                    Ok(types.decimal)
                } else {
                    Err(self.operand_mismatch(op, lhs, rhs))
                }
            }
            BinaryOp::Pow => {
                let base_numeric = lhs == types.integer || lhs == types.decimal;
                if base_numeric && rhs == types.integer {
                    Ok(lhs)
                } else {
                    Err(self.operand_mismatch(op, lhs, rhs))
                }
            }
            // Logical and comparison operators are handled above.
            _ => Err(self.operand_mismatch(op, lhs, rhs)),
        }
    }

    fn visit_access(
        &mut self,
        id: ExprId,
        receiver: Option<ExprId>,
        name: Name,
        ctx: Ctx,
    ) -> Result<TypeId, AnalyzeError> {
        let var = match receiver {
            None => self.scopes.lookup_var(ctx.scope, name).copied(),
            // A qualified access resolves against the receiver type's
            // members, and no built-in type exposes any; the receiver is
            // still visited for its own errors and annotations.
            Some(recv) => {
                self.visit_expr(recv, ctx)?;
                None
            }
        };
        let Some(var) = var else {
            return Err(AnalyzeError::UndefinedBinding {
                name: self.interner.lookup(name).to_string(),
                arity: None,
            });
        };
        self.out.set_access_binding(id, var);
        Ok(self.out.vars[var.index()].ty)
    }

    fn visit_call(
        &mut self,
        id: ExprId,
        receiver: Option<ExprId>,
        name: Name,
        args: &[ExprId],
        ctx: Ctx,
    ) -> Result<TypeId, AnalyzeError> {
        let mut arg_types = Vec::with_capacity(args.len());
        for &arg in args {
            arg_types.push(self.visit_expr(arg, ctx)?);
        }

        let func = match receiver {
            None => self.scopes.lookup_func(ctx.scope, name, args.len()).copied(),
            // As with access: no built-in type exposes member methods.
            Some(recv) => {
                self.visit_expr(recv, ctx)?;
                None
            }
        };
        let Some(func) = func else {
            return Err(AnalyzeError::UndefinedBinding {
                name: self.interner.lookup(name).to_string(),
                arity: Some(args.len()),
            });
        };

        let params = self.out.funcs[func.index()].params.clone();
        for (param, actual) in params.into_iter().zip(arg_types) {
            require_assignable(&self.out.types, param, actual, self.interner)?;
        }
        self.out.set_call_binding(id, func);
        Ok(self.out.funcs[func.index()].ret)
    }

    // Helpers

    /// Resolve a field or declaration's type: the declared type when given
    /// (initializer must be assignable to it), otherwise the initializer's
    /// type. A declaration with neither cannot be typed.
    fn declared_or_inferred(
        &mut self,
        name: Name,
        declared: Option<Name>,
        init: Option<ExprId>,
        ctx: Ctx,
    ) -> Result<TypeId, AnalyzeError> {
        // The initializer is analyzed before the name is bound, so a
        // declaration can never reference itself.
        let init_ty = match init {
            Some(expr) => Some(self.visit_expr(expr, ctx)?),
            None => None,
        };
        match (declared, init_ty) {
            (Some(declared), Some(init_ty)) => {
                let declared = self.resolve_type(declared)?;
                require_assignable(&self.out.types, declared, init_ty, self.interner)?;
                Ok(declared)
            }
            (Some(declared), None) => self.resolve_type(declared),
            (None, Some(init_ty)) => Ok(init_ty),
            (None, None) => Err(AnalyzeError::TypeMismatch {
                message: format!(
                    "cannot discern type of `{}`: no declared type and no initializer",
                    self.interner.lookup(name)
                ),
            }),
        }
    }

    fn declare_var(
        &mut self,
        scope: ScopeId,
        name: Name,
        ty: TypeId,
        constant: bool,
    ) -> Result<VarId, AnalyzeError> {
        let id = VarId::new(self.out.vars.len());
        let source = self.interner.lookup(name);
        self.out.vars.push(VarInfo {
            name,
            emit_name: format!("{source}_v{}", id.index()),
            ty,
            constant,
        });
        self.scopes
            .define_var(scope, name, id)
            .map_err(|_| AnalyzeError::Redefinition {
                name: source.to_string(),
            })?;
        Ok(id)
    }

    fn resolve_type(&mut self, name: Name) -> Result<TypeId, AnalyzeError> {
        self.out
            .types
            .resolve(name)
            .ok_or_else(|| AnalyzeError::UndefinedBinding {
                name: self.interner.lookup(name).to_string(),
                arity: None,
            })
    }

    fn require_boolean(
        &mut self,
        cond: ExprId,
        what: &str,
        ctx: Ctx,
    ) -> Result<(), AnalyzeError> {
        let ty = self.visit_expr(cond, ctx)?;
        if ty != self.out.types.boolean {
            return Err(AnalyzeError::TypeMismatch {
                message: format!(
                    "{what} must be Boolean, found {}",
                    self.out.types.display(ty, self.interner)
                ),
            });
        }
        Ok(())
    }

    fn operand_mismatch(&self, op: BinaryOp, lhs: TypeId, rhs: TypeId) -> AnalyzeError {
        AnalyzeError::TypeMismatch {
            message: format!(
                "operator `{op}` cannot combine {} and {}",
                self.out.types.display(lhs, self.interner),
                self.out.types.display(rhs, self.interner)
            ),
        }
    }
}

#[cfg(test)]
mod tests;
