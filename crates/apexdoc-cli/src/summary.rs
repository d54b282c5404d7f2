//! Plain-text summary of a parsed workspace.

use std::fmt;

use apexdoc::{
    ir::{ClassUnit, EnumUnit, IrKind, IrNode, Trigger, TriggerOperation, TriggerTiming},
    registry::{HierarchyStep, Registry},
};

const EVENTS: [(TriggerTiming, TriggerOperation, &str); 8] = [
    (TriggerTiming::Before, TriggerOperation::Insert, "before insert"),
    (TriggerTiming::Before, TriggerOperation::Update, "before update"),
    (TriggerTiming::Before, TriggerOperation::Delete, "before delete"),
    (TriggerTiming::Before, TriggerOperation::Undelete, "before undelete"),
    (TriggerTiming::After, TriggerOperation::Insert, "after insert"),
    (TriggerTiming::After, TriggerOperation::Update, "after update"),
    (TriggerTiming::After, TriggerOperation::Delete, "after delete"),
    (TriggerTiming::After, TriggerOperation::Undelete, "after undelete"),
];

/// Summary of every registered unit, one header line per unit followed by
/// its members.
///
/// ```text
/// Apex Class Circle [valid]
///   extends Shape
///   method area():(2-2:1,1)
///     @param (radius) -> the radius
///   hierarchy: Circle > Shape > Base Apex Object
/// Apex Class Bad [1 problem(s)]
/// ```
pub struct Summary<'a> {
    registry: &'a Registry,
    show_hierarchy: bool,
}

impl<'a> Summary<'a> {
    pub fn new(registry: &'a Registry, show_hierarchy: bool) -> Self {
        Self {
            registry,
            show_hierarchy,
        }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, name: &str, node: &IrNode) -> fmt::Result {
        write!(f, "{} {name} ", node.label())?;
        if node.is_valid() {
            writeln!(f, "[valid]")?;
        } else {
            writeln!(f, "[{} problem(s)]", node.diagnostics().len())?;
        }

        match node.kind() {
            IrKind::Class(unit) => {
                write_class(f, unit)?;
                if !self.show_hierarchy {
                    return Ok(());
                }
                if unit.is_class {
                    self.write_hierarchy(f, name)
                } else {
                    self.write_implementors(f, name)
                }
            }
            IrKind::Enum(unit) => write_enum(f, "  ", unit),
            IrKind::Trigger(trigger) => write_trigger(f, trigger),
        }
    }

    fn write_hierarchy(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        write!(f, "  hierarchy: ")?;
        for (i, step) in self.registry.hierarchy(name).iter().enumerate() {
            if i > 0 {
                write!(f, " > ")?;
            }
            match step {
                HierarchyStep::Unit {
                    name,
                    documented: false,
                } => write!(f, "{name} (undocumented)")?,
                step => write!(f, "{step}")?,
            }
        }
        writeln!(f)
    }

    fn write_implementors(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
        let implementors: Vec<_> = self
            .registry
            .implementors_of(name)
            .map(IrNode::qualified_name)
            .collect();
        if implementors.is_empty() {
            return Ok(());
        }
        writeln!(f, "  implemented by: {}", implementors.join(", "))
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, node, _) in self.registry.iter() {
            self.write_node(f, name, node)?;
        }
        Ok(())
    }
}

fn write_class(f: &mut fmt::Formatter<'_>, unit: &ClassUnit) -> fmt::Result {
    if let Some(base) = &unit.base {
        writeln!(f, "  extends {base}")?;
    }
    for interface in &unit.interfaces {
        writeln!(f, "  implements {interface}")?;
    }
    if unit.is_test() {
        let tests: Vec<_> = unit.test_methods().map(|m| m.name.as_str()).collect();
        writeln!(f, "  test methods: {}", tests.join(", "))?;
    }
    for attribute in &unit.attributes {
        writeln!(f, "  attribute {attribute}")?;
    }
    for method in &unit.methods {
        writeln!(f, "  method {method}")?;
        let params = method
            .doc_comment
            .iter()
            .flat_map(|doc| doc.annotations_named("param"));
        for param in params {
            writeln!(f, "    {param}")?;
        }
    }
    for block in &unit.static_blocks {
        writeln!(f, "  {block}")?;
    }
    for inner in &unit.enums {
        write!(f, "  enum ")?;
        write_enum(f, "", inner)?;
    }
    Ok(())
}

fn write_enum(f: &mut fmt::Formatter<'_>, indent: &str, unit: &EnumUnit) -> fmt::Result {
    let values: Vec<_> = unit.value_names().collect();
    writeln!(f, "{indent}{}: {}", unit.name, values.join(", "))
}

fn write_trigger(f: &mut fmt::Formatter<'_>, trigger: &Trigger) -> fmt::Result {
    let events: Vec<_> = EVENTS
        .iter()
        .filter(|(timing, operation, _)| trigger.fires_on(*timing, *operation))
        .map(|(_, _, label)| *label)
        .collect();
    writeln!(f, "  on {}: {}", trigger.on_object, events.join(", "))
}
