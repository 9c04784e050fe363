//! Top-level declarations: the source unit, its fields and methods.

use crate::{Name, Span, StmtRange};

/// A parsed source unit: field declarations followed by methods.
#[derive(Debug, Default)]
pub struct Program {
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
}

/// Top-level binding: `const name: Type = init;` or `var name = init;`.
///
/// Either the declared type or the initializer may be absent; the analyzer
/// rejects a field with neither.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Field {
    pub name: Name,
    pub ty: Option<Name>,
    pub constant: bool,
    pub init: Option<crate::ExprId>,
    pub span: Span,
}

/// Method declaration: `func name(a: T, b: U): R { body }`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Method {
    pub name: Name,
    pub params: Vec<Param>,
    /// Declared return type; `None` means Nil.
    pub ret: Option<Name>,
    pub body: StmtRange,
    pub span: Span,
}

impl Method {
    /// Parameter count, the arity half of the method's binding key.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// A single method parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Name,
    pub span: Span,
}
