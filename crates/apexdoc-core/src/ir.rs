//! Intermediate representation of parsed Apex units.
//!
//! # Pipeline Position
//!
//! ```text
//! .cls / .trigger file
//!     ↓ lexer
//! Tokens
//!     ↓ grammar (speculative attempts, rollback)
//! IR nodes (these types) - one per unit, each carrying its own diagnostics
//!     ↓ caller
//! Registry - cross-file lookups such as class hierarchies
//! ```
//!
//! # Organization
//!
//! - [`types`] - Type references, annotation applications and parameters
//! - [`comment`] - Plain and documentation comments
//! - [`member`] - Class members: methods, static blocks, attributes, enum values
//! - [`unit`] - Top-level constructs: classes, interfaces, enums, triggers
//! - [`node`] - The tagged [`IrNode`] wrapper and its [`Nature`] tag

pub mod comment;
pub mod member;
pub mod node;
pub mod types;
pub mod unit;

pub use comment::*;
pub use member::*;
pub use node::*;
pub use types::*;
pub use unit::*;

/// Number of lines covered by an inclusive `start..=end` line range.
///
/// Ranges that were never filled in (`end < start`) count as zero lines.
pub(crate) fn line_span(start_line: u32, end_line: u32) -> u32 {
    (end_line + 1).saturating_sub(start_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_span() {
        assert_eq!(line_span(3, 3), 1);
        assert_eq!(line_span(3, 10), 8);
        assert_eq!(line_span(5, 0), 0);
    }
}
