//! Runtime values.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use prim_ir::Name;

use crate::{EvalError, PrintHandler};

/// A concrete runtime value.
///
/// Scalars carry their raw value directly; structured values carry an
/// [`Object`] whose member scope is reachable by dotted access.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Decimal(f64),
    Char(char),
    Text(Rc<str>),
    Object(Object),
}

impl Value {
    pub fn text(content: &str) -> Self {
        Value::Text(Rc::from(content))
    }

    /// Runtime kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Boolean",
            Value::Int(_) => "Integer",
            Value::Decimal(_) => "Decimal",
            Value::Char(_) => "Character",
            Value::Text(_) => "Text",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }
}

// Value equality, not identity: scalars compare by value, objects compare
// structurally (same type name, equal fields).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// Textual form, as `print` writes it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Text(t) => f.write_str(t),
            Value::Object(o) => write!(f, "{o:?}"),
        }
    }
}

/// A mutable variable cell in the runtime scope chain.
#[derive(Clone, Debug)]
pub struct Slot {
    pub value: Value,
    pub constant: bool,
}

impl Slot {
    pub fn new(value: Value) -> Self {
        Slot {
            value,
            constant: false,
        }
    }

    pub fn constant(value: Value) -> Self {
        Slot {
            value,
            constant: true,
        }
    }
}

/// A callable bound in the runtime scope chain, keyed by `(name, arity)`.
#[derive(Clone)]
pub enum FunctionValue {
    /// Host-provided builtin taking its evaluated arguments.
    Builtin(fn(Vec<Value>, &dyn PrintHandler) -> Result<Value, EvalError>),
    /// User method, by index into the source unit's method list.
    Method(u32),
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionValue::Builtin(_) => f.write_str("FunctionValue::Builtin"),
            FunctionValue::Method(idx) => write!(f, "FunctionValue::Method({idx})"),
        }
    }
}

/// A structured value: a member scope of fields and methods reachable by
/// dotted access. Cloning shares the underlying storage.
#[derive(Clone)]
pub struct Object(Rc<RefCell<ObjectData>>);

struct ObjectData {
    type_name: Name,
    fields: FxHashMap<Name, Value>,
    methods: FxHashMap<(Name, usize), FunctionValue>,
}

impl Object {
    pub fn new(type_name: Name) -> Self {
        Object(Rc::new(RefCell::new(ObjectData {
            type_name,
            fields: FxHashMap::default(),
            methods: FxHashMap::default(),
        })))
    }

    pub fn type_name(&self) -> Name {
        self.0.borrow().type_name
    }

    pub fn get_field(&self, name: Name) -> Option<Value> {
        self.0.borrow().fields.get(&name).cloned()
    }

    pub fn set_field(&self, name: Name, value: Value) {
        self.0.borrow_mut().fields.insert(name, value);
    }

    pub fn has_field(&self, name: Name) -> bool {
        self.0.borrow().fields.contains_key(&name)
    }

    pub fn get_method(&self, name: Name, arity: usize) -> Option<FunctionValue> {
        self.0.borrow().methods.get(&(name, arity)).cloned()
    }

    pub fn define_method(&self, name: Name, arity: usize, func: FunctionValue) {
        self.0.borrow_mut().methods.insert((name, arity), func);
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        let a = self.0.borrow();
        let b = other.0.borrow();
        a.type_name == b.type_name && a.fields == b.fields
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<object {:?}>", self.0.borrow().type_name)
    }
}
