//! The top-level IR node returned by every parse.

use std::fmt;

use crate::{
    error::Diagnostic,
    ir::{ClassUnit, EnumUnit, Trigger},
};

/// Tag identifying the concrete kind of a top-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nature {
    Class,
    Enum,
    Trigger,
}

impl Nature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nature::Class => "ApexClass",
            Nature::Enum => "ApexEnum",
            Nature::Trigger => "ApexTrigger",
        }
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The construct a top-level node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrKind {
    /// A class or interface.
    Class(ClassUnit),
    Enum(EnumUnit),
    Trigger(Trigger),
}

impl IrKind {
    pub fn name(&self) -> &str {
        match self {
            IrKind::Class(unit) => &unit.name,
            IrKind::Enum(unit) => &unit.name,
            IrKind::Trigger(trigger) => &trigger.name,
        }
    }

    pub fn nature(&self) -> Nature {
        match self {
            IrKind::Class(_) => Nature::Class,
            IrKind::Enum(_) => Nature::Enum,
            IrKind::Trigger(_) => Nature::Trigger,
        }
    }
}

/// A parsed unit together with the problems found while parsing it.
///
/// A node is valid exactly when it carries no diagnostics. Nodes produced
/// after a failed parse are placeholders: their construct is empty apart
/// from its name, and they carry the single diagnostic that stopped the
/// parse.
#[derive(Debug, Clone)]
pub struct IrNode {
    kind: IrKind,
    diagnostics: Vec<Diagnostic>,
}

impl IrNode {
    /// Create a valid node.
    pub fn new(kind: IrKind) -> Self {
        Self {
            kind,
            diagnostics: Vec::new(),
        }
    }

    /// Create a placeholder node carrying one diagnostic.
    ///
    /// # Arguments
    ///
    /// * `kind` - An empty construct of the grammar's primary kind, named after the file
    /// * `diagnostic` - The problem that stopped the parse
    pub fn placeholder(kind: IrKind, diagnostic: Diagnostic) -> Self {
        Self {
            kind,
            diagnostics: vec![diagnostic],
        }
    }

    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn nature(&self) -> Nature {
        self.kind.nature()
    }

    pub fn kind(&self) -> &IrKind {
        &self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a problem, which makes the node invalid.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn as_class(&self) -> Option<&ClassUnit> {
        match &self.kind {
            IrKind::Class(unit) => Some(unit),
            _ => None,
        }
    }

    pub fn as_trigger(&self) -> Option<&Trigger> {
        match &self.kind {
            IrKind::Trigger(trigger) => Some(trigger),
            _ => None,
        }
    }

    /// The name registries index this node under: the dotted name for
    /// classes, the plain name otherwise.
    pub fn qualified_name(&self) -> String {
        match &self.kind {
            IrKind::Class(unit) => unit.qualified_name(),
            kind => kind.name().to_string(),
        }
    }

    /// Human-readable kind, e.g. "Apex Interface".
    pub fn label(&self) -> &'static str {
        match &self.kind {
            IrKind::Class(unit) if unit.is_class => "Apex Class",
            IrKind::Class(_) => "Apex Interface",
            IrKind::Enum(_) => "Apex Enum",
            IrKind::Trigger(_) => "Apex Trigger",
        }
    }
}

impl fmt::Display for IrNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label(), self.qualified_name())?;
        if !self.is_valid() {
            write!(f, " ({} problem(s))", self.diagnostics.len())?;
        }
        Ok(())
    }
}
