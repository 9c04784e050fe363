//! Diagnostic value and terminal rendering.

use std::fmt;

use prim_ir::Span;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A single reported problem.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub message: String,
    /// Source location, when the raising pass has one (parse always does).
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message: message.into(),
            span: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Render for the terminal, including the line/column the span's start
    /// offset falls on when the source text is available.
    pub fn render(&self, source: Option<&str>) -> String {
        let mut out = format!("{}[{}]: {}", self.severity, self.code, self.message);
        if let Some(span) = self.span {
            match source.map(|text| line_column(text, span.start)) {
                Some((line, column)) => {
                    out.push_str(&format!(" ({line}:{column})"));
                }
                None => {
                    out.push_str(&format!(" (offset {})", span.start));
                }
            }
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: u32) -> (u32, u32) {
    let offset = (offset as usize).min(text.len());
    let mut line = 1;
    let mut column = 1;
    for ch in text[..offset].chars() {
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn render_without_span() {
        let diag = Diagnostic::error(ErrorCode::E2005, "no `main` method");
        assert_eq!(diag.render(None), "error[E2005]: no `main` method");
    }

    #[test]
    fn render_with_span_and_source() {
        let diag =
            Diagnostic::error(ErrorCode::E1001, "expected `;`").with_span(Span::new(10, 11));
        let source = "var x = 1\nvar y = 2;";
        assert_eq!(diag.render(Some(source)), "error[E1001]: expected `;` (2:1)");
    }

    #[test]
    fn render_with_span_no_source() {
        let diag = Diagnostic::error(ErrorCode::E1001, "expected `)`").with_span(Span::point(4));
        assert_eq!(diag.render(None), "error[E1001]: expected `)` (offset 4)");
    }
}
