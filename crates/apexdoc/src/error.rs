//! Error types for Apexdoc operations.
//!
//! [`ApexdocError`] covers everything that stops a run. Problems inside a
//! single Apex file are not errors while parsing: they are collected on the
//! parsed nodes and only turned into [`ApexdocError::Parse`] by
//! [`Workspace::check`](crate::Workspace::check).

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use apexdoc_core::error::Diagnostic;

/// The main error type for Apexdoc operations.
#[derive(Debug, Error)]
pub enum ApexdocError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{} file(s) could not be parsed", .0.len())]
    Parse(Vec<ParseFailure>),
}

/// A unit that failed to parse, with the text of its file for rendering.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    path: PathBuf,
    unit: String,
    diagnostic: Diagnostic,
    src: String,
}

impl ParseFailure {
    pub fn new(
        path: impl Into<PathBuf>,
        unit: impl Into<String>,
        diagnostic: Diagnostic,
        src: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            unit: unit.into(),
            diagnostic,
            src: src.into(),
        }
    }

    /// The file the unit came from.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Name of the placeholder unit.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Full text of the file.
    pub fn src(&self) -> &str {
        &self.src
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path.display(),
            self.diagnostic.line(),
            self.diagnostic.offset(),
            self.diagnostic
        )
    }
}
