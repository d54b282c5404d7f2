//! Error codes for the Apexdoc diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer and source errors
//! - `E1xx` - Parser errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unrecognized comment content.
    ///
    /// Inside a block comment, no comment pattern matched the input.
    E001,

    /// Unrecognized input.
    ///
    /// No token pattern matched the text at the current position.
    E002,

    /// Runaway end of input.
    ///
    /// The end-of-input token was requested more times than the lexer
    /// tolerates, which means a production loops on end of input.
    E003,

    /// Source read failure.
    ///
    /// The character source reported an I/O error while it was being read.
    E004,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Malformed structure.
    ///
    /// The parser committed to a construct and then met a token it did not
    /// expect.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before a construct was complete, typically a missing
    /// closing `}`.
    E101,

    /// Unrecognized unit.
    ///
    /// The file does not start with a class, interface, enum or trigger
    /// declaration.
    E102,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unrecognized comment content",
            ErrorCode::E002 => "unrecognized input",
            ErrorCode::E003 => "runaway end of input",
            ErrorCode::E004 => "source read failure",
            // Parser errors
            ErrorCode::E100 => "malformed structure",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "unrecognized unit",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
