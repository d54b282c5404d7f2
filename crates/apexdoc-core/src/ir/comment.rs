//! Plain and documentation comments.

use std::fmt;

/// A line comment (`// ...`) or block comment (`/* ... */`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comment {
    pub text: String,
    /// `true` for block comments.
    pub multiline: bool,
}

impl Comment {
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            multiline: false,
        }
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            multiline: true,
        }
    }
}

/// An `@tag [param] explanation` entry inside a documentation comment.
///
/// The name keeps its leading `@`, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocAnnotation {
    pub name: String,
    pub param: Option<String>,
    pub explanation: String,
}

impl DocAnnotation {
    pub fn is(&self, name: &str) -> bool {
        self.name
            .trim_start_matches('@')
            .eq_ignore_ascii_case(name.trim_start_matches('@'))
    }
}

impl fmt::Display for DocAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(param) = &self.param {
            write!(f, " ({param})")?;
        }
        write!(f, " -> {}", self.explanation)
    }
}

/// A documentation comment (`/** ... */`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocComment {
    /// Free text with continuation `*` markers removed.
    pub text: String,
    pub multiline: bool,
    pub annotations: Vec<DocAnnotation>,
}

impl DocComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            multiline: true,
            annotations: Vec::new(),
        }
    }

    /// Iterate over the annotations with the given tag, e.g. `param`.
    pub fn annotations_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a DocAnnotation> + 'a {
        self.annotations.iter().filter(move |a| a.is(name))
    }

    /// Iterate over the annotations, keeping only those listed in `include`
    /// (when given) and dropping those listed in `exclude`.
    pub fn filter_annotations<'a>(
        &'a self,
        include: Option<&'a [&'a str]>,
        exclude: &'a [&'a str],
    ) -> impl Iterator<Item = &'a DocAnnotation> + 'a {
        self.annotations.iter().filter(move |annotation| {
            let included = include.is_none_or(|names| names.iter().any(|n| annotation.is(n)));
            included && !exclude.iter().any(|n| annotation.is(n))
        })
    }
}

impl fmt::Display for DocComment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.text)?;
        for annotation in &self.annotations {
            write!(f, "\n  {annotation}")?;
        }
        Ok(())
    }
}
