//! Error adapter for converting ApexdocError to miette diagnostics.
//!
//! This module provides the bridge between the library's error types and
//! miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! [`ApexdocError::Parse`] lists one failure per broken unit. Each failure
//! is rendered independently, with a snippet of its own file.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use apexdoc::{ApexdocError, ParseFailure, Span};

/// Adapter for a single unit that failed to parse.
pub struct DiagnosticAdapter<'a> {
    failure: &'a ParseFailure,
    /// Source code for displaying snippets
    src: &'a str,
    /// Append the token snapshot to the help text.
    show_snapshot: bool,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(failure: &'a ParseFailure, show_snapshot: bool) -> Self {
        Self {
            failure,
            src: failure.src(),
            show_snapshot,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", self.failure.diagnostic())
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.failure.diagnostic().message(),
            self.failure.path().display()
        )
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.failure
            .diagnostic()
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let diag = self.failure.diagnostic();
        let snapshot = diag.snapshot().filter(|_| self.show_snapshot);
        let help = match (diag.help(), snapshot) {
            (None, None) => return None,
            (Some(help), None) => help.to_string(),
            (None, Some(snapshot)) => format!("snapshot: {snapshot}"),
            (Some(help), Some(snapshot)) => format!("{help}\nsnapshot: {snapshot}"),
        };
        Some(Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.failure.diagnostic().labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(self.src, label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`ApexdocError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a ApexdocError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ApexdocError::Io(_) => "apexdoc::io",
            ApexdocError::Config(_) => "apexdoc::config",
            ApexdocError::Parse(_) => "apexdoc::parse",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parse failure with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a character-index [`Span`] into a byte-offset [`SourceSpan`]
/// within `src`. Indices past the end clamp to the end of the text.
fn span_to_miette(src: &str, span: Span) -> SourceSpan {
    let byte_offset = |index: usize| {
        src.char_indices()
            .nth(index)
            .map_or(src.len(), |(offset, _)| offset)
    };
    let start = byte_offset(span.start());
    let end = byte_offset(span.end());
    SourceSpan::new(start.into(), end - start)
}

/// Convert an [`ApexdocError`] into a list of reportable errors.
///
/// For [`ApexdocError::Parse`], this returns one [`Reportable`] per failed
/// unit. For other error variants, this returns a single [`Reportable`].
pub fn to_reportables(err: &ApexdocError, show_snapshot: bool) -> Vec<Reportable<'_>> {
    match err {
        ApexdocError::Parse(failures) => failures
            .iter()
            .map(|failure| Reportable::Diagnostic(DiagnosticAdapter::new(failure, show_snapshot)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use apexdoc::{
        Position,
        diagnostics::{Diagnostic, ErrorCode},
    };

    use super::*;

    fn failure(message: &str, src: &str, span: Span) -> ParseFailure {
        let diag = Diagnostic::error(message)
            .with_code(ErrorCode::E100)
            .with_position(Position::new(1, 0, span.start()))
            .with_label(span, "here")
            .with_snapshot("///1:0 - x - 1:1///")
            .with_help("while parsing class body");
        ParseFailure::new("Foo.cls", "Foo", diag, src)
    }

    #[test]
    fn test_one_reportable_per_failure() {
        let err = ApexdocError::Parse(vec![
            failure("first", "class A {", Span::new(0..5)),
            failure("second", "class B {", Span::new(6..7)),
        ]);

        let reportables = to_reportables(&err, false);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first (Foo.cls)");
        assert_eq!(reportables[1].to_string(), "second (Foo.cls)");
    }

    #[test]
    fn test_non_parse_error() {
        let err = ApexdocError::Config("bad value".to_string());

        let reportables = to_reportables(&err, false);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_snapshot_in_help_when_enabled() {
        let failure = failure("broken", "x", Span::new(0..1));

        let plain = DiagnosticAdapter::new(&failure, false);
        assert_eq!(
            plain.help().map(|h| h.to_string()),
            Some("while parsing class body".to_string())
        );

        let detailed = DiagnosticAdapter::new(&failure, true);
        let help = detailed.help().map(|h| h.to_string()).unwrap();
        assert!(help.ends_with("snapshot: ///1:0 - x - 1:1///"));
    }

    #[test]
    fn test_span_uses_byte_offsets() {
        // `é` takes two bytes, so character 2 starts at byte 3.
        let span = span_to_miette("aéb c", Span::new(2..3));

        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 1);
    }

    #[test]
    fn test_span_past_end_is_clamped() {
        let span = span_to_miette("abc", Span::new(3..4));

        assert_eq!(span.offset(), 3);
        assert_eq!(span.len(), 0);
    }

    #[test]
    fn test_labels_are_primary() {
        let failure = failure("broken", "public class", Span::new(7..12));
        let adapter = DiagnosticAdapter::new(&failure, false);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].label(), Some("here"));
        assert_eq!(labels[0].offset(), 7);
    }

    #[test]
    fn test_secondary_label_is_not_primary() {
        let diag = Diagnostic::error("Unexpected end of input in body of Foo")
            .with_code(ErrorCode::E101)
            .with_label(Span::new(18..18), "input ends here")
            .with_secondary_label(Span::new(13..16), "class starts here");
        let failure = ParseFailure::new("Foo.cls", "Foo", diag, "public class Foo {");
        let adapter = DiagnosticAdapter::new(&failure, false);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("class starts here"));
        assert_eq!(labels[1].offset(), 13);
        assert_eq!(labels[1].len(), 3);
    }
}
