//! The static type model.
//!
//! Types are interned by name in a [`TypePool`] and addressed by [`TypeId`]
//! handles; two types are equal iff they have the same name, so `TypeId`
//! equality is type equality.

use rustc_hash::FxHashMap;
use std::fmt;

use prim_ir::{Name, StringInterner};

use crate::AnalyzeError;

/// Handle to a type in a [`TypePool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    const fn new(index: usize) -> Self {
        TypeId(index as u32)
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Interned type storage plus the well-known built-in ids.
#[derive(Debug, PartialEq)]
pub struct TypePool {
    names: Vec<Name>,
    by_name: FxHashMap<Name, TypeId>,

    pub any: TypeId,
    pub comparable: TypeId,
    pub nil: TypeId,
    pub boolean: TypeId,
    pub integer: TypeId,
    pub decimal: TypeId,
    pub character: TypeId,
    pub text: TypeId,
}

impl TypePool {
    /// Create a pool with the built-in types registered.
    pub fn new(interner: &StringInterner) -> Self {
        let mut pool = TypePool {
            names: Vec::with_capacity(8),
            by_name: FxHashMap::default(),
            any: TypeId::new(0),
            comparable: TypeId::new(0),
            nil: TypeId::new(0),
            boolean: TypeId::new(0),
            integer: TypeId::new(0),
            decimal: TypeId::new(0),
            character: TypeId::new(0),
            text: TypeId::new(0),
        };
        pool.any = pool.register(interner.intern("Any"));
        pool.comparable = pool.register(interner.intern("Comparable"));
        pool.nil = pool.register(interner.intern("Nil"));
        pool.boolean = pool.register(interner.intern("Boolean"));
        pool.integer = pool.register(interner.intern("Integer"));
        pool.decimal = pool.register(interner.intern("Decimal"));
        pool.character = pool.register(interner.intern("Character"));
        pool.text = pool.register(interner.intern("Text"));
        pool
    }

    /// Register a type by name, returning the existing id if known.
    pub fn register(&mut self, name: Name) -> TypeId {
        if let Some(&id) = self.by_name.get(&name) {
            return id;
        }
        let id = TypeId::new(self.names.len());
        self.names.push(name);
        self.by_name.insert(name, id);
        id
    }

    /// Resolve a declared type name.
    pub fn resolve(&self, name: Name) -> Option<TypeId> {
        self.by_name.get(&name).copied()
    }

    pub fn name_of(&self, id: TypeId) -> Name {
        self.names[id.index()]
    }

    /// Is `id` one of the closed Comparable set {Integer, Decimal,
    /// Character, Text}?
    pub fn is_comparable(&self, id: TypeId) -> bool {
        id == self.integer || id == self.decimal || id == self.character || id == self.text
    }

    /// Render a type name for an error message.
    pub fn display(&self, id: TypeId, interner: &StringInterner) -> &'static str {
        interner.lookup(self.name_of(id))
    }
}

/// The assignability rule.
///
/// `target` accepts `actual` iff they are the same type, `target` is `Any`,
/// or `target` is `Comparable` and `actual` is exactly one of {Integer,
/// Decimal, Character, Text}. `Comparable` is a closed structural set, not
/// a hierarchy: `Any` itself is not assignable to it.
pub fn require_assignable(
    pool: &TypePool,
    target: TypeId,
    actual: TypeId,
    interner: &StringInterner,
) -> Result<(), AnalyzeError> {
    if target == actual || target == pool.any {
        return Ok(());
    }
    if target == pool.comparable && pool.is_comparable(actual) {
        return Ok(());
    }
    Err(AnalyzeError::TypeMismatch {
        message: format!(
            "expected {}, found {}",
            pool.display(target, interner),
            pool.display(actual, interner)
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use prim_ir::StringInterner;

    #[test]
    fn every_type_is_assignable_to_itself() {
        let interner = StringInterner::new();
        let pool = TypePool::new(&interner);
        for id in [
            pool.any,
            pool.comparable,
            pool.nil,
            pool.boolean,
            pool.integer,
            pool.decimal,
            pool.character,
            pool.text,
        ] {
            assert!(require_assignable(&pool, id, id, &interner).is_ok());
        }
    }

    #[test]
    fn any_accepts_everything() {
        let interner = StringInterner::new();
        let pool = TypePool::new(&interner);
        for id in [pool.nil, pool.boolean, pool.integer, pool.text] {
            assert!(require_assignable(&pool, pool.any, id, &interner).is_ok());
        }
    }

    #[test]
    fn comparable_accepts_exactly_the_closed_set() {
        let interner = StringInterner::new();
        let pool = TypePool::new(&interner);
        for id in [pool.integer, pool.decimal, pool.character, pool.text] {
            assert!(require_assignable(&pool, pool.comparable, id, &interner).is_ok());
        }
        for id in [pool.boolean, pool.nil, pool.any] {
            assert!(require_assignable(&pool, pool.comparable, id, &interner).is_err());
        }
    }

    #[test]
    fn integer_does_not_accept_any() {
        let interner = StringInterner::new();
        let pool = TypePool::new(&interner);
        assert!(require_assignable(&pool, pool.integer, pool.any, &interner).is_err());
    }

    #[test]
    fn types_are_equal_iff_same_name() {
        let interner = StringInterner::new();
        let mut pool = TypePool::new(&interner);
        let again = pool.register(interner.intern("Integer"));
        assert_eq!(again, pool.integer);
    }
}
