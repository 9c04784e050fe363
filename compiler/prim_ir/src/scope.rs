//! Nested-scope binding model.
//!
//! One arena of scope records, addressed by [`ScopeId`] handles; each record
//! maps names to variable payloads and `(name, arity)` pairs to function
//! payloads, plus a parent handle. The analyzer and the interpreter each
//! instantiate their own arena with different payload types; the
//! chain-walking lookup algorithm is identical.
//!
//! Scopes are created and discarded stack-like: callers take a
//! [`ScopeArena::checkpoint`] on entering a construct and
//! [`ScopeArena::truncate`] back to it on exit, so a scope never outlives
//! the block or call that created it.

use rustc_hash::FxHashMap;
use std::fmt;

use crate::Name;

/// Handle to a scope record in a [`ScopeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ScopeId(u32);

impl ScopeId {
    #[inline]
    const fn new(index: usize) -> Self {
        ScopeId(index as u32)
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// Error returned when defining a name already bound in the same scope.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AlreadyBound;

impl fmt::Display for AlreadyBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("name already bound in this scope")
    }
}

impl std::error::Error for AlreadyBound {}

struct ScopeRecord<V, F> {
    vars: FxHashMap<Name, V>,
    funcs: FxHashMap<(Name, usize), F>,
    parent: Option<ScopeId>,
}

impl<V, F> ScopeRecord<V, F> {
    fn new(parent: Option<ScopeId>) -> Self {
        ScopeRecord {
            vars: FxHashMap::default(),
            funcs: FxHashMap::default(),
            parent,
        }
    }
}

/// Arena of nested scopes.
pub struct ScopeArena<V, F> {
    scopes: Vec<ScopeRecord<V, F>>,
}

impl<V, F> ScopeArena<V, F> {
    pub fn new() -> Self {
        ScopeArena { scopes: Vec::new() }
    }

    /// Allocate a scope with no parent.
    pub fn root(&mut self) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(ScopeRecord::new(None));
        id
    }

    /// Allocate a scope nested inside `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId::new(self.scopes.len());
        self.scopes.push(ScopeRecord::new(Some(parent)));
        id
    }

    /// Bind a variable in `scope`.
    ///
    /// Fails if `name` is already bound as a variable *in this scope*;
    /// shadowing a binding from an enclosing scope is allowed.
    pub fn define_var(
        &mut self,
        scope: ScopeId,
        name: Name,
        payload: V,
    ) -> Result<(), AlreadyBound> {
        let record = &mut self.scopes[scope.index()];
        if record.vars.contains_key(&name) {
            return Err(AlreadyBound);
        }
        record.vars.insert(name, payload);
        Ok(())
    }

    /// Bind a function in `scope`, keyed by `(name, arity)`.
    ///
    /// Overloading by argument count is allowed; a duplicate
    /// `(name, arity)` pair in the same scope is not.
    pub fn define_func(
        &mut self,
        scope: ScopeId,
        name: Name,
        arity: usize,
        payload: F,
    ) -> Result<(), AlreadyBound> {
        let record = &mut self.scopes[scope.index()];
        if record.funcs.contains_key(&(name, arity)) {
            return Err(AlreadyBound);
        }
        record.funcs.insert((name, arity), payload);
        Ok(())
    }

    /// Look up a variable, walking the parent chain.
    pub fn lookup_var(&self, scope: ScopeId, name: Name) -> Option<&V> {
        let holder = self.find_var_scope(scope, name)?;
        self.scopes[holder.index()].vars.get(&name)
    }

    /// Look up a variable for mutation, walking the parent chain.
    pub fn lookup_var_mut(&mut self, scope: ScopeId, name: Name) -> Option<&mut V> {
        let holder = self.find_var_scope(scope, name)?;
        self.scopes[holder.index()].vars.get_mut(&name)
    }

    /// Look up a function by `(name, arity)`, walking the parent chain.
    pub fn lookup_func(&self, scope: ScopeId, name: Name, arity: usize) -> Option<&F> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = &self.scopes[id.index()];
            if let Some(payload) = record.funcs.get(&(name, arity)) {
                return Some(payload);
            }
            current = record.parent;
        }
        None
    }

    /// Current arena length, for [`ScopeArena::truncate`].
    pub fn checkpoint(&self) -> usize {
        self.scopes.len()
    }

    /// Discard every scope allocated since `mark`.
    ///
    /// Callers pair this with [`ScopeArena::checkpoint`] around block and
    /// call evaluation so exited scopes are not retained.
    pub fn truncate(&mut self, mark: usize) {
        self.scopes.truncate(mark);
    }

    fn find_var_scope(&self, scope: ScopeId, name: Name) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let record = &self.scopes[id.index()];
            if record.vars.contains_key(&name) {
                return Some(id);
            }
            current = record.parent;
        }
        None
    }
}

impl<V, F> Default for ScopeArena<V, F> {
    fn default() -> Self {
        Self::new()
    }
}
