//! Diagnostic system for Apexdoc.
//!
//! This module provides the error vocabulary shared by every stage:
//! - Error codes for documentation and searchability
//! - Labeled spans for rich error context
//!
//! # Overview
//!
//! The system is built around the [`Diagnostic`] type, which represents a
//! single parse error with an optional error code, the source
//! [`Position`](crate::Position) it refers to, a token-stream snapshot, and
//! help text. Parsed IR nodes carry their diagnostics directly, so a node is
//! valid exactly when it carries none.
//!
//! # Example
//!
//! ```
//! # use apexdoc_core::error::{Diagnostic, ErrorCode};
//! # use apexdoc_core::{Position, Span};
//!
//! let diag = Diagnostic::error("Unable to understand structure in class body")
//!     .with_code(ErrorCode::E100)
//!     .with_position(Position::new(12, 4, 310))
//!     .with_label(Span::new(310..315), "unexpected token")
//!     .with_help("check for a missing `;` or `}` above this line");
//!
//! assert_eq!(diag.line(), 12);
//! ```

mod diagnostic;
mod error_code;
mod label;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
