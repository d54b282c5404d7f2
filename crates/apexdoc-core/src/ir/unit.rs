//! Top-level constructs: classes, interfaces, enums and triggers.

use std::{fmt, str::FromStr};

use crate::ir::{
    AccessModifier, Annotation, Attribute, Comment, DocComment, EnumValue, Method, StaticBlock,
    TypeRef, line_span,
};

/// A class or interface, top-level or nested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassUnit {
    pub name: String,
    /// Names of the enclosing units, outermost first. Empty for top-level units.
    pub outer: Vec<String>,
    pub access: AccessModifier,
    pub with_sharing: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    /// `false` for interfaces.
    pub is_class: bool,
    pub base: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub annotations: Vec<Annotation>,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
    pub constructor: Option<Method>,
    /// Every method, constructors included.
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
    pub static_blocks: Vec<StaticBlock>,
    pub enums: Vec<EnumUnit>,
    pub inner_classes: Vec<ClassUnit>,
    pub start_line: u32,
    pub end_line: u32,
}

impl ClassUnit {
    pub fn new(name: impl Into<String>, outer: Vec<String>) -> Self {
        Self {
            name: name.into(),
            outer,
            is_class: true,
            ..Self::default()
        }
    }

    /// The dotted name including enclosing units, e.g. `Outer.Inner`.
    pub fn qualified_name(&self) -> String {
        let mut qualified = self.outer.join(".");
        if !qualified.is_empty() {
            qualified.push('.');
        }
        qualified.push_str(&self.name);
        qualified
    }

    pub fn is_inner(&self) -> bool {
        !self.outer.is_empty()
    }

    pub fn length(&self) -> u32 {
        line_span(self.start_line, self.end_line)
    }

    pub fn is_test(&self) -> bool {
        self.annotations.iter().any(|a| a.is("isTest"))
    }

    pub fn test_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_test_method)
    }
}

impl fmt::Display for ClassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_class { "class" } else { "interface" };
        write!(f, "{} {} {}", self.access, kind, self.qualified_name())?;
        if let Some(base) = &self.base {
            write!(f, " extends {base}")?;
        }
        if !self.interfaces.is_empty() {
            write!(f, " implements ")?;
            for (i, interface) in self.interfaces.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{interface}")?;
            }
        }
        Ok(())
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumUnit {
    pub name: String,
    pub access: AccessModifier,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
}

impl EnumUnit {
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name.as_str())
    }
}

impl fmt::Display for EnumUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

/// `before` or `after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerTiming {
    Before,
    After,
}

impl FromStr for TriggerTiming {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(TriggerTiming::Before),
            "after" => Ok(TriggerTiming::After),
            _ => Err("Invalid trigger timing"),
        }
    }
}

/// The DML operation a trigger fires on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerOperation {
    Insert,
    Update,
    Delete,
    Undelete,
}

impl FromStr for TriggerOperation {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "insert" => Ok(TriggerOperation::Insert),
            "update" => Ok(TriggerOperation::Update),
            "delete" => Ok(TriggerOperation::Delete),
            "undelete" => Ok(TriggerOperation::Undelete),
            _ => Err("Invalid trigger operation"),
        }
    }
}

/// A trigger declaration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Trigger {
    pub name: String,
    /// The sObject the trigger is declared on.
    pub on_object: String,
    pub before_insert: bool,
    pub before_update: bool,
    pub before_delete: bool,
    pub before_undelete: bool,
    pub after_insert: bool,
    pub after_update: bool,
    pub after_delete: bool,
    pub after_undelete: bool,
    pub doc_comment: Option<DocComment>,
    pub comments: Vec<Comment>,
    pub start_line: u32,
    pub end_line: u32,
    pub max_nest_depth: u32,
}

impl Trigger {
    fn flag_mut(&mut self, timing: TriggerTiming, operation: TriggerOperation) -> &mut bool {
        use TriggerOperation::*;
        use TriggerTiming::*;

        match (timing, operation) {
            (Before, Insert) => &mut self.before_insert,
            (Before, Update) => &mut self.before_update,
            (Before, Delete) => &mut self.before_delete,
            (Before, Undelete) => &mut self.before_undelete,
            (After, Insert) => &mut self.after_insert,
            (After, Update) => &mut self.after_update,
            (After, Delete) => &mut self.after_delete,
            (After, Undelete) => &mut self.after_undelete,
        }
    }

    /// Mark the trigger as firing on `timing operation`. Setting a flag twice
    /// is not an error.
    pub fn set_event(&mut self, timing: TriggerTiming, operation: TriggerOperation) {
        *self.flag_mut(timing, operation) = true;
    }

    pub fn fires_on(&self, timing: TriggerTiming, operation: TriggerOperation) -> bool {
        use TriggerOperation::*;
        use TriggerTiming::*;

        match (timing, operation) {
            (Before, Insert) => self.before_insert,
            (Before, Update) => self.before_update,
            (Before, Delete) => self.before_delete,
            (Before, Undelete) => self.before_undelete,
            (After, Insert) => self.after_insert,
            (After, Update) => self.after_update,
            (After, Delete) => self.after_delete,
            (After, Undelete) => self.after_undelete,
        }
    }

    pub fn length(&self) -> u32 {
        line_span(self.start_line, self.end_line)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger {} on {}", self.name, self.on_object)
    }
}
