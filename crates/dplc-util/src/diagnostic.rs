//! Diagnostic collection.
//!
//! Each compiler stage owns a [`Handler`] and appends to it; the driver
//! drains the buffers in stage order. Severities follow the compiler's
//! contract: an `Error` makes the output unusable at the site, a `Warning`
//! marks unusual but tolerable input, and `Info` is advisory.

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use dplc_util::Severity;
///
/// assert_eq!(format!("{}", Severity::Error), "error");
/// assert_eq!(format!("{}", Severity::Warning), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The output is unusable at this site.
    Error,
    /// Unusual but tolerable; compilation proceeds.
    Warning,
    /// Advisory only.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with severity and source location.
///
/// Lines and columns are 1-based, columns measured at token start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Main diagnostic message.
    pub message: String,
    /// Source line (1-based).
    pub line: u32,
    /// Source column (1-based).
    pub col: u32,
}

impl Diagnostic {
    /// Create a new diagnostic at the given span.
    pub fn new(severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            severity,
            message: message.into(),
            line: span.line,
            col: span.column,
        }
    }

    /// Create an error diagnostic.
    ///
    /// # Examples
    ///
    /// ```
    /// use dplc_util::{Diagnostic, Severity, Span};
    ///
    /// let diag = Diagnostic::error("unexpected token", Span::DUMMY);
    /// assert_eq!(diag.severity, Severity::Error);
    /// ```
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, message, span)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Warning, message, span)
    }

    /// Create an info diagnostic.
    pub fn info(message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Info, message, span)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({}:{})",
            self.severity, self.message, self.line, self.col
        )
    }
}

/// Handler for collecting diagnostics during one compiler stage.
///
/// Reporting methods take `&self`; the buffer lives behind a `RefCell` so
/// parse methods holding shared borrows of the handler can still report.
///
/// # Examples
///
/// ```
/// use dplc_util::{Handler, Span};
///
/// let handler = Handler::new();
/// handler.error("unexpected character", Span::DUMMY);
/// assert!(handler.has_errors());
/// assert_eq!(handler.error_count(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    /// Create a new, empty handler.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Report an error at the given span.
    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::error(message, span));
    }

    /// Report a warning at the given span.
    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::warning(message, span));
    }

    /// Report an info diagnostic at the given span.
    pub fn info(&self, message: impl Into<String>, span: Span) {
        self.emit(Diagnostic::info(message, span));
    }

    /// Emit a pre-built diagnostic.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Check whether any errors have been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Number of warnings reported so far.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Clone out all diagnostics, leaving the buffer intact.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Drain all diagnostics out of the handler.
    ///
    /// The driver uses this to concatenate stage buffers in order.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    #[test]
    fn test_diagnostic_position_from_span() {
        let diag = Diagnostic::error("bad", Span::new(4, 5, 3, 7));
        assert_eq!(diag.line, 3);
        assert_eq!(diag.col, 7);
    }

    #[test]
    fn test_handler_counts() {
        let handler = Handler::new();
        handler.error("e", Span::DUMMY);
        handler.warning("w", Span::DUMMY);
        handler.warning("w2", Span::DUMMY);
        handler.info("i", Span::DUMMY);

        assert!(handler.has_errors());
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.warning_count(), 2);
        assert_eq!(handler.diagnostics().len(), 4);
    }

    #[test]
    fn test_handler_take_drains() {
        let handler = Handler::new();
        handler.error("e", Span::DUMMY);
        let drained = handler.take();
        assert_eq!(drained.len(), 1);
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning("odd input", Span::new(0, 1, 2, 9));
        assert_eq!(format!("{}", diag), "warning: odd input (2:9)");
    }
}
