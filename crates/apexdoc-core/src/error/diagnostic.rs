//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single parse error with an optional
//! error code, the position it refers to, labeled source spans, a bounded
//! snapshot of the token stream, and help text.

use std::fmt;

use crate::{
    error::{ErrorCode, Label},
    position::{Position, Span},
};

/// A diagnostic message with source location information.
///
/// Renderers that only know about files and lines use [`line`](Self::line),
/// [`offset`](Self::offset) and [`message`](Self::message); the CLI also uses
/// the labels to draw source snippets.
///
/// # Example
///
/// ```text
/// error[E101]: Unexpected end of input while parsing class body
///   --> Foo.cls:1:18
///    |
///  1 | public class Foo {
///    |                  ^ input ends here
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    position: Option<Position>,
    labels: Vec<Label>,
    snapshot: Option<String>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use apexdoc_core::error::{Diagnostic, ErrorCode};
    /// # use apexdoc_core::Position;
    ///
    /// let diag = Diagnostic::error("No leading `}` found")
    ///     .with_code(ErrorCode::E100)
    ///     .with_position(Position::new(4, 0, 51));
    /// assert_eq!(diag.to_string(), "error[E100]: No leading `}` found");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the position this diagnostic refers to, if known.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Get the 1-based line, or `0` when the position is unknown.
    pub fn line(&self) -> u32 {
        self.position.map_or(0, |pos| pos.line())
    }

    /// Get the 0-based column, or `0` when the position is unknown.
    pub fn offset(&self) -> u32 {
        self.position.map_or(0, |pos| pos.offset())
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the token-stream snapshot taken where the problem was found.
    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the token-stream snapshot.
    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            position: None,
            labels: Vec::new(),
            snapshot: None,
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
