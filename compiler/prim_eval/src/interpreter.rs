//! The evaluator itself.
//!
//! Statement execution threads a [`Flow`] outcome through every block: a
//! `return` switches to `Flow::Return`, which unwinds through enclosing
//! if/while/for bodies without touching the error channel until the nearest
//! method invocation absorbs it. Errors unwind the same way but nothing
//! absorbs them short of the top-level caller.

use prim_ir::{
    Ast, BinaryOp, ExprId, ExprKind, Name, Program, ScopeArena, ScopeId, StmtId, StmtKind,
    StmtRange, StringInterner,
};

use crate::{
    assign_to_constant, cannot_access_member, evaluate_binary, invalid_assignment_target,
    no_such_member, redefined, type_mismatch, undefined_function, undefined_variable, EvalError,
    EvalResult, FunctionValue, PrintHandler, Slot, Value,
};

/// Outcome of executing a statement.
///
/// `Return` carries the value up to the nearest enclosing method invocation,
/// which converts it back into a normal result.
#[derive(Clone, PartialEq, Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Tree-walking evaluator over a parsed source unit.
///
/// Owns its runtime scope chain; the root scope is created at construction
/// and seeded with the builtin `print/1`.
pub struct Interpreter<'a> {
    program: &'a Program,
    ast: &'a Ast,
    interner: &'a StringInterner,
    print: &'a dyn PrintHandler,
    scopes: ScopeArena<Slot, FunctionValue>,
    root: ScopeId,
}

impl<'a> Interpreter<'a> {
    pub fn new(
        program: &'a Program,
        ast: &'a Ast,
        interner: &'a StringInterner,
        print: &'a dyn PrintHandler,
    ) -> Self {
        let mut scopes = ScopeArena::new();
        let root = scopes.root();
        let mut interpreter = Interpreter {
            program,
            ast,
            interner,
            print,
            scopes,
            root,
        };
        interpreter.seed_builtins();
        interpreter
    }

    /// The root scope is empty at construction; the define cannot collide.
    fn seed_builtins(&mut self) {
        let name = self.interner.intern("print");
        let _ = self
            .scopes
            .define_func(self.root, name, 1, FunctionValue::Builtin(builtin_print));
    }

    /// Bind a host-provided value in the root scope, before [`Self::run`].
    ///
    /// This is how structured values enter a program: the host builds an
    /// [`crate::Object`], binds it here, and the program reaches its fields
    /// and methods by dotted access.
    pub fn define_global(&mut self, name: &str, value: Value) -> Result<(), EvalError> {
        let name = self.interner.intern(name);
        self.scopes
            .define_var(self.root, name, Slot::new(value))
            .map_err(|_| redefined(self.interner.lookup(name)))
    }

    /// Run the source unit: register every method, bind every field, then
    /// invoke `main/0` and return its result.
    pub fn run(&mut self) -> EvalResult {
        tracing::debug!(
            fields = self.program.fields.len(),
            methods = self.program.methods.len(),
            "running source unit"
        );
        let program = self.program;

        // Methods first, so field initializers can call any of them.
        for (index, method) in program.methods.iter().enumerate() {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            self.scopes
                .define_func(
                    self.root,
                    method.name,
                    method.arity(),
                    FunctionValue::Method(index),
                )
                .map_err(|_| redefined(self.interner.lookup(method.name)))?;
        }

        for field in &program.fields {
            let value = match field.init {
                Some(expr) => self.eval_expr(expr, self.root)?,
                None => Value::Nil,
            };
            let slot = if field.constant {
                Slot::constant(value)
            } else {
                Slot::new(value)
            };
            self.scopes
                .define_var(self.root, field.name, slot)
                .map_err(|_| redefined(self.interner.lookup(field.name)))?;
        }

        let main = self.interner.intern("main");
        let func = self
            .scopes
            .lookup_func(self.root, main, 0)
            .cloned()
            .ok_or_else(|| undefined_function("main", 0))?;
        self.invoke(func, Vec::new())
    }

    // Invocation

    fn invoke(&mut self, func: FunctionValue, args: Vec<Value>) -> EvalResult {
        match func {
            FunctionValue::Builtin(builtin) => builtin(args, self.print),
            FunctionValue::Method(index) => self.invoke_method(index as usize, args),
        }
    }

    /// Invoke a user method: child scope, positional parameter binding,
    /// body statements in order. `Flow::Return` is absorbed here; a body
    /// that falls off the end yields Nil.
    fn invoke_method(&mut self, index: usize, args: Vec<Value>) -> EvalResult {
        let method = &self.program.methods[index];
        let params: Vec<Name> = method.params.iter().map(|p| p.name).collect();
        let body = method.body;

        // Methods are lexically scoped in the source unit: the call scope
        // hangs off the root, not the caller's scope.
        let mark = self.scopes.checkpoint();
        let scope = self.scopes.child(self.root);
        let result = self.invoke_method_in(scope, &params, args, body);
        self.scopes.truncate(mark);
        result
    }

    fn invoke_method_in(
        &mut self,
        scope: ScopeId,
        params: &[Name],
        args: Vec<Value>,
        body: StmtRange,
    ) -> EvalResult {
        for (&name, value) in params.iter().zip(args) {
            self.scopes
                .define_var(scope, name, Slot::new(value))
                .map_err(|_| redefined(self.interner.lookup(name)))?;
        }
        match self.exec_stmts(body, scope)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }

    // Statements

    fn exec_stmts(&mut self, body: StmtRange, scope: ScopeId) -> Result<Flow, EvalError> {
        for &stmt in self.ast.stmt_list(body) {
            match self.exec_stmt(stmt, scope)? {
                Flow::Normal => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Execute a statement list in a fresh child scope, discarded on exit.
    fn exec_block(&mut self, body: StmtRange, scope: ScopeId) -> Result<Flow, EvalError> {
        let mark = self.scopes.checkpoint();
        let inner = self.scopes.child(scope);
        let result = self.exec_stmts(body, inner);
        self.scopes.truncate(mark);
        result
    }

    fn exec_stmt(&mut self, id: StmtId, scope: ScopeId) -> Result<Flow, EvalError> {
        match self.ast.stmt(id).kind.clone() {
            StmtKind::Expr(expr) => {
                self.eval_expr(expr, scope)?;
                Ok(Flow::Normal)
            }
            StmtKind::Declare { name, init, .. } => {
                // The initializer runs before the name is bound, so a
                // declaration can never read itself.
                let value = match init {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Nil,
                };
                self.scopes
                    .define_var(scope, name, Slot::new(value))
                    .map_err(|_| redefined(self.interner.lookup(name)))?;
                Ok(Flow::Normal)
            }
            StmtKind::Assign { target, value } => {
                self.exec_assign(target, value, scope)?;
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                if self.eval_condition(cond, scope)? {
                    self.exec_block(then_body, scope)
                } else {
                    self.exec_block(else_body, scope)
                }
            }
            StmtKind::While { cond, body } => {
                // Fresh child scope every iteration, same as if branches.
                while self.eval_condition(cond, scope)? {
                    match self.exec_block(body, scope)? {
                        Flow::Normal => {}
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::For {
                init,
                cond,
                step,
                body,
            } => {
                // The header declaration lives in its own scope, visible to
                // cond, step and body.
                let mark = self.scopes.checkpoint();
                let header = self.scopes.child(scope);
                let result = self.exec_for(init, cond, step, body, header);
                self.scopes.truncate(mark);
                result
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    fn exec_for(
        &mut self,
        init: StmtId,
        cond: ExprId,
        step: StmtId,
        body: StmtRange,
        header: ScopeId,
    ) -> Result<Flow, EvalError> {
        match self.exec_stmt(init, header)? {
            Flow::Normal => {}
            flow @ Flow::Return(_) => return Ok(flow),
        }
        while self.eval_condition(cond, header)? {
            match self.exec_block(body, header)? {
                Flow::Normal => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
            // The step runs after every body pass.
            match self.exec_stmt(step, header)? {
                Flow::Normal => {}
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_assign(
        &mut self,
        target: ExprId,
        value: ExprId,
        scope: ScopeId,
    ) -> Result<(), EvalError> {
        let ExprKind::Access { receiver, name } = self.ast.expr(target).kind else {
            return Err(invalid_assignment_target());
        };
        match receiver {
            None => {
                let value = self.eval_expr(value, scope)?;
                let source = self.interner.lookup(name);
                let Some(slot) = self.scopes.lookup_var_mut(scope, name) else {
                    return Err(undefined_variable(source));
                };
                if slot.constant {
                    return Err(assign_to_constant(source));
                }
                slot.value = value;
                Ok(())
            }
            Some(recv) => {
                let recv_value = self.eval_expr(recv, scope)?;
                let value = self.eval_expr(value, scope)?;
                match &recv_value {
                    // Assignment writes an existing member slot; it never
                    // grows the object.
                    Value::Object(object) => {
                        if object.has_field(name) {
                            object.set_field(name, value);
                            Ok(())
                        } else {
                            Err(no_such_member(
                                self.interner.lookup(object.type_name()),
                                self.interner.lookup(name),
                            ))
                        }
                    }
                    _ => Err(cannot_access_member(
                        &recv_value,
                        self.interner.lookup(name),
                    )),
                }
            }
        }
    }

    // Expressions

    fn eval_expr(&mut self, id: ExprId, scope: ScopeId) -> EvalResult {
        match self.ast.expr(id).kind.clone() {
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Bool(value) => Ok(Value::Bool(value)),
            ExprKind::Int(value) => Ok(Value::Int(value)),
            ExprKind::Decimal(bits) => Ok(Value::Decimal(f64::from_bits(bits))),
            ExprKind::Char(value) => Ok(Value::Char(value)),
            ExprKind::Text(name) => Ok(Value::text(self.interner.lookup(name))),
            ExprKind::Group(inner) => self.eval_expr(inner, scope),
            ExprKind::Binary { op, left, right } if op.is_logical() => {
                self.eval_logical(op, left, right, scope)
            }
            ExprKind::Binary { op, left, right } => {
                let lhs = self.eval_expr(left, scope)?;
                let rhs = self.eval_expr(right, scope)?;
                evaluate_binary(lhs, rhs, op)
            }
            ExprKind::Access { receiver, name } => self.eval_access(receiver, name, scope),
            ExprKind::Call {
                receiver,
                name,
                args,
            } => {
                let args = self.ast.expr_list(args).to_vec();
                self.eval_call(receiver, name, &args, scope)
            }
        }
    }

    /// `&&`/`||`: the right operand is evaluated only when the left does
    /// not already determine the result.
    fn eval_logical(
        &mut self,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        scope: ScopeId,
    ) -> EvalResult {
        let lhs = match self.eval_expr(left, scope)? {
            Value::Bool(value) => value,
            other => return Err(type_mismatch("Boolean", other.kind_name())),
        };
        match (op, lhs) {
            (BinaryOp::And, false) => Ok(Value::Bool(false)),
            (BinaryOp::Or, true) => Ok(Value::Bool(true)),
            _ => match self.eval_expr(right, scope)? {
                Value::Bool(value) => Ok(Value::Bool(value)),
                other => Err(type_mismatch("Boolean", other.kind_name())),
            },
        }
    }

    fn eval_access(
        &mut self,
        receiver: Option<ExprId>,
        name: Name,
        scope: ScopeId,
    ) -> EvalResult {
        match receiver {
            None => match self.scopes.lookup_var(scope, name) {
                Some(slot) => Ok(slot.value.clone()),
                None => Err(undefined_variable(self.interner.lookup(name))),
            },
            Some(recv) => {
                let value = self.eval_expr(recv, scope)?;
                match &value {
                    Value::Object(object) => object.get_field(name).ok_or_else(|| {
                        no_such_member(
                            self.interner.lookup(object.type_name()),
                            self.interner.lookup(name),
                        )
                    }),
                    _ => Err(cannot_access_member(&value, self.interner.lookup(name))),
                }
            }
        }
    }

    fn eval_call(
        &mut self,
        receiver: Option<ExprId>,
        name: Name,
        args: &[ExprId],
        scope: ScopeId,
    ) -> EvalResult {
        let func = match receiver {
            None => self
                .scopes
                .lookup_func(scope, name, args.len())
                .cloned()
                .ok_or_else(|| undefined_function(self.interner.lookup(name), args.len()))?,
            Some(recv) => {
                let value = self.eval_expr(recv, scope)?;
                let method = match &value {
                    Value::Object(object) => object.get_method(name, args.len()),
                    _ => None,
                };
                method.ok_or_else(|| {
                    undefined_function(self.interner.lookup(name), args.len())
                })?
            }
        };
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            values.push(self.eval_expr(arg, scope)?);
        }
        self.invoke(func, values)
    }

    fn eval_condition(&mut self, cond: ExprId, scope: ScopeId) -> Result<bool, EvalError> {
        match self.eval_expr(cond, scope)? {
            Value::Bool(value) => Ok(value),
            other => Err(type_mismatch("Boolean", other.kind_name())),
        }
    }
}

/// The builtin `print/1`: writes its argument's textual form and yields Nil.
fn builtin_print(mut args: Vec<Value>, print: &dyn PrintHandler) -> EvalResult {
    // Arity is enforced by the `(name, arity)` binding key.
    let value = args.pop().unwrap_or(Value::Nil);
    print.println(&value.to_string());
    Ok(Value::Nil)
}
