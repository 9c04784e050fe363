//! Analyzer output: resolved bindings and types as side-tables.
//!
//! Each table is keyed by node id and populated exactly once, by the
//! analyzer, before anything reads it. The interpreter never looks at these
//! tables; they exist for the source emitter.

use std::fmt;

use prim_ir::{ExprId, Name};

use crate::{TypeId, TypePool};

/// Handle to a resolved variable record.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        VarId(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

/// Handle to a resolved function signature.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FnId(u32);

impl FnId {
    #[inline]
    pub(crate) const fn new(index: usize) -> Self {
        FnId(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for FnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FnId({})", self.0)
    }
}

/// A resolved variable: source name, emission name, type, constness.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct VarInfo {
    pub name: Name,
    /// Name to use in emitted source, distinct from the source name.
    pub emit_name: String,
    pub ty: TypeId,
    pub constant: bool,
}

/// A resolved function signature.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FnInfo {
    pub name: Name,
    /// Name to use in emitted source, distinct from the source name.
    pub emit_name: String,
    pub params: Vec<TypeId>,
    pub ret: TypeId,
}

impl FnInfo {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The analyzer's complete output.
#[derive(Debug, PartialEq)]
pub struct Analysis {
    /// Resolved type per typed expression, by `ExprId`.
    expr_types: Vec<Option<TypeId>>,
    /// Resolved variable binding per access expression, by `ExprId`.
    access_bindings: Vec<Option<VarId>>,
    /// Resolved function binding per call expression, by `ExprId`.
    call_bindings: Vec<Option<FnId>>,
    /// Resolved signature per method, by declaration order.
    pub method_sigs: Vec<FnId>,
    pub vars: Vec<VarInfo>,
    pub funcs: Vec<FnInfo>,
    pub types: TypePool,
}

impl Analysis {
    pub(crate) fn new(expr_count: usize, types: TypePool) -> Self {
        Analysis {
            expr_types: vec![None; expr_count],
            access_bindings: vec![None; expr_count],
            call_bindings: vec![None; expr_count],
            method_sigs: Vec::new(),
            vars: Vec::new(),
            funcs: Vec::new(),
            types,
        }
    }

    pub(crate) fn set_expr_type(&mut self, id: ExprId, ty: TypeId) {
        let slot = &mut self.expr_types[id.index()];
        debug_assert!(slot.is_none(), "type slot for {id:?} populated twice");
        *slot = Some(ty);
    }

    pub(crate) fn set_access_binding(&mut self, id: ExprId, var: VarId) {
        let slot = &mut self.access_bindings[id.index()];
        debug_assert!(slot.is_none(), "binding slot for {id:?} populated twice");
        *slot = Some(var);
    }

    pub(crate) fn set_call_binding(&mut self, id: ExprId, func: FnId) {
        let slot = &mut self.call_bindings[id.index()];
        debug_assert!(slot.is_none(), "call slot for {id:?} populated twice");
        *slot = Some(func);
    }

    /// Resolved type of an expression.
    pub fn expr_type(&self, id: ExprId) -> Option<TypeId> {
        self.expr_types[id.index()]
    }

    /// Resolved variable binding of an access expression.
    pub fn access_binding(&self, id: ExprId) -> Option<&VarInfo> {
        self.access_bindings[id.index()].map(|v| &self.vars[v.index()])
    }

    /// Resolved function binding of a call expression.
    pub fn call_binding(&self, id: ExprId) -> Option<&FnInfo> {
        self.call_bindings[id.index()].map(|f| &self.funcs[f.index()])
    }

    /// Resolved signature of a method, by declaration index.
    pub fn method_sig(&self, method_index: usize) -> Option<&FnInfo> {
        self.method_sigs
            .get(method_index)
            .map(|f| &self.funcs[f.index()])
    }
}
