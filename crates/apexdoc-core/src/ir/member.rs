//! Class members: methods, static blocks, attributes and enum values.

use std::{fmt, str::FromStr};

use crate::ir::{Annotation, Comment, DocComment, Parameter, TypeRef, line_span};

/// Visibility of a unit or member.
///
/// Declarations without an explicit modifier get [`AccessModifier::Package`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
    Global,
    #[default]
    Package,
}

impl AccessModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessModifier::Public => "public",
            AccessModifier::Private => "private",
            AccessModifier::Protected => "protected",
            AccessModifier::Global => "global",
            AccessModifier::Package => "package",
        }
    }
}

impl FromStr for AccessModifier {
    type Err = &'static str;

    /// Parse an explicit modifier keyword, case-insensitively.
    ///
    /// `package` is not a keyword and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(AccessModifier::Public),
            "private" => Ok(AccessModifier::Private),
            "protected" => Ok(AccessModifier::Protected),
            "global" => Ok(AccessModifier::Global),
            _ => Err("Invalid access modifier"),
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Method {
    pub name: String,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_test_method: bool,
    pub is_override: bool,
    pub is_constructor: bool,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    pub annotations: Vec<Annotation>,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
    pub start_line: u32,
    pub end_line: u32,
    /// Deepest brace nesting in the body, the body's own braces being depth 1.
    /// Zero for methods declared without a body.
    pub max_nest_depth: u32,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn length(&self) -> u32 {
        line_span(self.start_line, self.end_line)
    }

    /// `true` for methods declared with `;` instead of a body.
    pub fn is_declaration(&self) -> bool {
        self.max_nest_depth == 0
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(
            f,
            "):({}-{}:{},{})",
            self.start_line,
            self.end_line,
            self.length(),
            self.max_nest_depth
        )
    }
}

/// A `static { ... }` initializer block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticBlock {
    pub start_line: u32,
    pub end_line: u32,
    pub max_nest_depth: u32,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
}

impl StaticBlock {
    /// Static blocks have no name of their own; this is what they report.
    pub const NAME: &'static str = "staticBlock";

    pub fn length(&self) -> u32 {
        line_span(self.start_line, self.end_line)
    }
}

impl fmt::Display for StaticBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "static({}-{})", self.start_line, self.end_line)
    }
}

/// A field or property.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attribute {
    pub name: String,
    pub type_ref: TypeRef,
    pub access: AccessModifier,
    pub is_static: bool,
    pub is_final: bool,
    pub annotations: Vec<Annotation>,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
    /// Line of the attribute name.
    pub line: u32,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.access, self.type_ref)?;
        write!(f, " {} [{}]", self.name, self.line)
    }
}

/// A single value of an enum.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumValue {
    pub name: String,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
