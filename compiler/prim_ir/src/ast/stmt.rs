//! Statement nodes.

use std::fmt;

use crate::{ExprId, Name, Span, StmtId, StmtRange};

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement variants.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression evaluated for its effect: `print(x);`
    Expr(ExprId),

    /// Local declaration: `var name: Type = init;`
    Declare {
        name: Name,
        ty: Option<Name>,
        init: Option<ExprId>,
    },

    /// Assignment: `target = value;` — the target must resolve to an
    /// access expression, which the analyzer enforces.
    Assign { target: ExprId, value: ExprId },

    /// `if (cond) { then } else { else }`
    If {
        cond: ExprId,
        then_body: StmtRange,
        else_body: StmtRange,
    },

    /// `for (init; cond; step) { body }`
    For {
        init: StmtId,
        cond: ExprId,
        step: StmtId,
        body: StmtRange,
    },

    /// `while (cond) { body }`
    While { cond: ExprId, body: StmtRange },

    /// `return value;` — `None` returns nil.
    Return(Option<ExprId>),
}
