//! Outcome of a grammar production.
//!
//! A production either matches, does not match, or fails fatally. A
//! [`Failure::NoMatch`] is ordinary control flow for backtracking and is
//! absorbed by [`TokenStream::attempt`](crate::stream::TokenStream::attempt);
//! a [`Failure::Fatal`] carries the diagnostic that ends the parse.

use apexdoc_core::{Span, error::Diagnostic};

use crate::lexer::LexError;

#[derive(Debug)]
pub(crate) enum Failure {
    /// The input does not start with this production.
    NoMatch,
    /// The input started with this production but is malformed, or the
    /// lexer failed.
    Fatal(Box<Diagnostic>),
}

impl Failure {
    /// Point a fatal failure at related context, e.g. where the construct
    /// that could not be finished starts. `NoMatch` passes through.
    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        match self {
            Failure::Fatal(diagnostic) => {
                Failure::Fatal(Box::new(diagnostic.with_secondary_label(span, message)))
            }
            no_match => no_match,
        }
    }
}

impl From<LexError> for Failure {
    fn from(err: LexError) -> Self {
        Failure::Fatal(Box::new(err.to_diagnostic()))
    }
}

impl From<Diagnostic> for Failure {
    fn from(diagnostic: Diagnostic) -> Self {
        Failure::Fatal(Box::new(diagnostic))
    }
}

/// A type alias for `Result<T, Failure>`
pub(crate) type PResult<T> = Result<T, Failure>;
