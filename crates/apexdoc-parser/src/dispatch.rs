//! Selecting a grammar for a file.

use std::{fmt, path::Path};

use apexdoc_core::{
    error::Diagnostic,
    ir::{ClassUnit, IrKind, IrNode, Nature, Trigger},
};

/// The grammars the parser knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Classes, interfaces and enums in `.cls` files.
    Unit,
    /// Triggers in `.trigger` files.
    Trigger,
}

impl Grammar {
    /// Pick the grammar for `path` by its extension, compared
    /// case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// # use apexdoc_parser::Grammar;
    /// assert_eq!(Grammar::for_path("src/Invoice.CLS"), Some(Grammar::Unit));
    /// assert_eq!(Grammar::for_path("AccountTrigger.trigger"), Some(Grammar::Trigger));
    /// assert_eq!(Grammar::for_path("notes.txt"), None);
    /// ```
    pub fn for_path(path: impl AsRef<Path>) -> Option<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("cls") => Some(Grammar::Unit),
            Some("trigger") => Some(Grammar::Trigger),
            _ => None,
        }
    }

    /// Nature of the node a placeholder for this grammar carries.
    pub fn nature(&self) -> Nature {
        match self {
            Grammar::Unit => Nature::Class,
            Grammar::Trigger => Nature::Trigger,
        }
    }

    /// An invalid node named `name` carrying `diagnostic`, returned when a
    /// parse fails.
    pub(crate) fn placeholder(&self, name: &str, diagnostic: Diagnostic) -> IrNode {
        let kind = match self {
            Grammar::Unit => IrKind::Class(ClassUnit::new(name, Vec::new())),
            Grammar::Trigger => IrKind::Trigger(Trigger {
                name: name.to_string(),
                ..Trigger::default()
            }),
        };
        IrNode::placeholder(kind, diagnostic)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Unit => f.write_str("unit"),
            Grammar::Trigger => f.write_str("trigger"),
        }
    }
}

/// Name a placeholder node after the file it came from: the file name up to
/// its first `.`.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('.').next())
        .unwrap_or_default()
        .to_string()
}
