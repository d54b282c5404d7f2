//! Type references, annotation applications and parameters.

use std::fmt;

/// A reference to a type as written in the source.
///
/// `Map<String, List<Outer.Inner>>[]` is a `TypeRef` named `Map` with two
/// generic arguments and one array dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeRef {
    /// Dotted name, e.g. `Outer.Inner`.
    pub name: String,
    pub generics: Vec<TypeRef>,
    pub array_dims: u32,
}

impl TypeRef {
    /// Create a plain, non-generic, non-array type reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
            array_dims: 0,
        }
    }

    /// Returns the last segment of the dotted name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn is_generic(&self) -> bool {
        !self.generics.is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.generics.is_empty() {
            write!(f, "<")?;
            for (i, generic) in self.generics.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{generic}")?;
            }
            write!(f, ">")?;
        }
        for _ in 0..self.array_dims {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// A single `name` or `name=value` entry of an annotation application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationParam {
    pub name: String,
    pub value: Option<String>,
}

impl fmt::Display for AnnotationParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An annotation applied to a class or member, e.g. `@isTest(SeeAllData=true)`.
///
/// The name is stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: String,
    pub params: Vec<AnnotationParam>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Case-insensitive name comparison, matching how Apex resolves annotations.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Look up a parameter value by case-insensitive name.
    pub fn param(&self, name: &str) -> Option<&AnnotationParam> {
        self.params
            .iter()
            .find(|param| param.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "(")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeRef,
    pub is_final: bool,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_final {
            write!(f, "final ")?;
        }
        write!(f, "{} {}", self.type_ref, self.name)
    }
}
