//! Cross-file store of parsed units.
//!
//! The [`Registry`] maps unit names to the [`IrNode`] parsed for them and
//! the file they came from. It is filled by the caller after each parse and
//! answers lookups that span files, such as walking a class hierarchy.
//! Names are compared case-insensitively when an exact match is missing,
//! since Apex identifiers are case-insensitive.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::ir::{ClassUnit, IrNode};

#[derive(Debug, Clone)]
struct Entry {
    node: IrNode,
    source_path: PathBuf,
}

/// A keyed store of IR nodes and their source paths.
///
/// Re-registering a name replaces the earlier entry.
#[derive(Debug, Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` under `name`. Returns the entry it replaced, if any.
    pub fn put(
        &mut self,
        name: impl Into<String>,
        node: IrNode,
        source_path: impl Into<PathBuf>,
    ) -> Option<IrNode> {
        let name = name.into();
        let source_path = source_path.into();
        debug!(name = name.as_str(), path = source_path.display().to_string(); "Registering unit");

        self.entries
            .insert(name, Entry { node, source_path })
            .map(|previous| previous.node)
    }

    pub fn get(&self, name: &str) -> Option<&IrNode> {
        self.entry(name).map(|entry| &entry.node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Iterate over all registered nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &IrNode> {
        self.entries.values().map(|entry| &entry.node)
    }

    /// Iterate over `(name, node, source path)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IrNode, &Path)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), &entry.node, entry.source_path.as_path()))
    }

    /// Find the source path of a node.
    ///
    /// `node` is matched by identity first, so references obtained from this
    /// registry always resolve; other nodes are looked up by qualified name.
    pub fn source_path_of(&self, node: &IrNode) -> Option<&Path> {
        self.entries
            .values()
            .find(|entry| std::ptr::eq(&entry.node, node))
            .or_else(|| self.entry(&node.qualified_name()))
            .map(|entry| entry.source_path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk the `extends` chain starting at `name`.
    ///
    /// The first step is `name` itself. Each base class is followed while it
    /// is registered; an unregistered base is reported as undocumented and
    /// followed by [`HierarchyStep::Elided`]. The chain always ends with
    /// [`HierarchyStep::BaseObject`]. Cycles stop the walk at the first
    /// repeated name.
    pub fn hierarchy(&self, name: &str) -> Vec<HierarchyStep> {
        let mut steps = vec![HierarchyStep::Unit {
            name: name.to_string(),
            documented: self.contains(name),
        }];
        let mut visited = HashSet::from([name.to_ascii_lowercase()]);
        let mut current = name.to_string();

        loop {
            let Some(node) = self.get(&current) else {
                steps.push(HierarchyStep::Elided);
                break;
            };
            let Some(base) = node.as_class().and_then(|unit| unit.base.as_ref()) else {
                break;
            };

            let base_name = self.resolve_type_name(&base.name, node.as_class());
            trace!(unit = current.as_str(), base = base_name.as_str(); "Following base class");
            if !visited.insert(base_name.to_ascii_lowercase()) {
                debug!(name = base_name.as_str(); "Cycle detected in class hierarchy");
                break;
            }

            steps.push(HierarchyStep::Unit {
                name: base_name.clone(),
                documented: self.contains(&base_name),
            });
            current = base_name;
        }

        steps.push(HierarchyStep::BaseObject);
        steps
    }

    /// Iterate over the classes whose `extends` clause names `name`.
    pub fn subclasses_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IrNode> + 'a {
        self.nodes().filter(move |node| {
            node.as_class()
                .and_then(|unit| unit.base.as_ref())
                .is_some_and(|base| type_names_match(&base.name, name))
        })
    }

    /// Iterate over the classes and interfaces that list `name` in their
    /// `implements` clause.
    pub fn implementors_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IrNode> + 'a {
        self.nodes().filter(move |node| {
            node.as_class().is_some_and(|unit| {
                unit.interfaces
                    .iter()
                    .any(|interface| type_names_match(&interface.name, name))
            })
        })
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name).or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, entry)| entry)
        })
    }

    /// Resolve a base type written inside `unit` to a registered name.
    ///
    /// A bare `Inner` written inside `Outer` refers to `Outer.Inner` when
    /// that is registered.
    fn resolve_type_name(&self, written: &str, unit: Option<&ClassUnit>) -> String {
        if let Some(unit) = unit {
            let mut chain = unit.outer.clone();
            chain.push(unit.name.clone());
            for depth in (1..=chain.len()).rev() {
                let candidate = format!("{}.{}", chain[..depth].join("."), written);
                if self.contains(&candidate) {
                    return candidate;
                }
            }
        }
        written.to_string()
    }
}

/// `true` when `written` names `target`, either fully or by its last segment.
fn type_names_match(written: &str, target: &str) -> bool {
    written.eq_ignore_ascii_case(target)
        || target
            .rsplit('.')
            .next()
            .is_some_and(|simple| written.eq_ignore_ascii_case(simple))
}

/// One step of a class hierarchy, from the class itself towards the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyStep {
    Unit { name: String, documented: bool },
    /// Unknown ancestors between the last known class and the root.
    Elided,
    /// The implicit root of every Apex class.
    BaseObject,
}

impl fmt::Display for HierarchyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HierarchyStep::Unit { name, .. } => f.write_str(name),
            HierarchyStep::Elided => f.write_str("..."),
            HierarchyStep::BaseObject => f.write_str("Base Apex Object"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrKind, TypeRef};

    fn class_node(name: &str, outer: &[&str], base: Option<&str>) -> IrNode {
        let mut unit = ClassUnit::new(name, outer.iter().map(|s| s.to_string()).collect());
        unit.base = base.map(TypeRef::new);
        IrNode::new(IrKind::Class(unit))
    }

    fn unit(name: &str, documented: bool) -> HierarchyStep {
        HierarchyStep::Unit {
            name: name.to_string(),
            documented,
        }
    }

    #[test]
    fn test_put_get_and_replace() {
        let mut registry = Registry::new();
        assert!(registry.put("Foo", class_node("Foo", &[], None), "a/Foo.cls").is_none());
        let replaced = registry.put("Foo", class_node("Foo", &[], Some("Bar")), "b/Foo.cls");

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        let node = registry.get("foo").unwrap();
        assert_eq!(registry.source_path_of(node), Some(Path::new("b/Foo.cls")));
    }

    #[test]
    fn test_source_path_of_by_name() {
        let mut registry = Registry::new();
        registry.put("Foo", class_node("Foo", &[], None), "Foo.cls");

        let detached = class_node("Foo", &[], None);
        assert_eq!(registry.source_path_of(&detached), Some(Path::new("Foo.cls")));
        assert!(registry.source_path_of(&class_node("Nope", &[], None)).is_none());
    }

    #[test]
    fn test_hierarchy_fully_documented() {
        let mut registry = Registry::new();
        registry.put("C", class_node("C", &[], Some("B")), "C.cls");
        registry.put("B", class_node("B", &[], Some("A")), "B.cls");
        registry.put("A", class_node("A", &[], None), "A.cls");

        assert_eq!(
            registry.hierarchy("C"),
            vec![
                unit("C", true),
                unit("B", true),
                unit("A", true),
                HierarchyStep::BaseObject
            ]
        );
    }

    #[test]
    fn test_hierarchy_with_unknown_base() {
        let mut registry = Registry::new();
        registry.put("C", class_node("C", &[], Some("Vendor")), "C.cls");

        assert_eq!(
            registry.hierarchy("C"),
            vec![
                unit("C", true),
                unit("Vendor", false),
                HierarchyStep::Elided,
                HierarchyStep::BaseObject
            ]
        );
    }

    #[test]
    fn test_hierarchy_cycle_terminates() {
        let mut registry = Registry::new();
        registry.put("A", class_node("A", &[], Some("B")), "A.cls");
        registry.put("B", class_node("B", &[], Some("A")), "B.cls");

        let steps = registry.hierarchy("A");
        assert_eq!(steps.len(), 3);
        assert_eq!(steps.last(), Some(&HierarchyStep::BaseObject));
    }

    #[test]
    fn test_hierarchy_resolves_sibling_inner_class() {
        let mut registry = Registry::new();
        registry.put("Outer", class_node("Outer", &[], None), "Outer.cls");
        registry.put("Outer.Base", class_node("Base", &["Outer"], None), "Outer.cls");
        registry.put(
            "Outer.Child",
            class_node("Child", &["Outer"], Some("Base")),
            "Outer.cls",
        );

        assert_eq!(
            registry.hierarchy("Outer.Child"),
            vec![
                unit("Outer.Child", true),
                unit("Outer.Base", true),
                HierarchyStep::BaseObject
            ]
        );
    }

    #[test]
    fn test_subclasses_and_implementors() {
        let mut registry = Registry::new();
        registry.put("Base", class_node("Base", &[], None), "Base.cls");
        registry.put("Left", class_node("Left", &[], Some("Base")), "Left.cls");
        registry.put("Right", class_node("Right", &[], Some("base")), "Right.cls");

        let mut queueable = ClassUnit::new("Job", Vec::new());
        queueable.interfaces.push(TypeRef::new("Queueable"));
        registry.put("Job", IrNode::new(IrKind::Class(queueable)), "Job.cls");

        let names: Vec<_> = registry.subclasses_of("Base").map(|n| n.name()).collect();
        assert_eq!(names, vec!["Left", "Right"]);

        let names: Vec<_> = registry.implementors_of("Queueable").map(|n| n.name()).collect();
        assert_eq!(names, vec!["Job"]);
    }

    #[test]
    fn test_hierarchy_step_display() {
        assert_eq!(unit("Foo", true).to_string(), "Foo");
        assert_eq!(HierarchyStep::Elided.to_string(), "...");
        assert_eq!(HierarchyStep::BaseObject.to_string(), "Base Apex Object");
    }
}
