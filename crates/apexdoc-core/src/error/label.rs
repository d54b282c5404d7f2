//! Labeled source spans for diagnostic messages.

use crate::position::Span;

/// A message attached to a region of the source.
///
/// The parser attaches one primary label covering the offending token. A
/// class body that runs into the end of input also gets a secondary label on
/// the class name.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if this is the primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}
