//! Integration tests for the Workspace API

use std::{fs, path::Path};

use apexdoc::{
    ApexdocError, Workspace,
    config::{AppConfig, ParserConfig, ReportConfig},
    diagnostics::ErrorCode,
    registry::HierarchyStep,
};
use tempfile::tempdir;

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(path, contents).expect("Failed to write file");
}

#[test]
fn test_workspace_registers_every_unit() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(
        dir.path(),
        "classes/Shape.cls",
        "public abstract class Shape {\n    public abstract Double area();\n    public class Point { }\n}",
    );
    write(
        dir.path(),
        "classes/Circle.cls",
        "public class Circle extends Shape {\n    public override Double area() { return 3.14; }\n}",
    );
    write(dir.path(), "classes/Circle.cls-meta.xml", "<ApexClass/>");
    write(
        dir.path(),
        "triggers/ShapeTrigger.trigger",
        "trigger ShapeTrigger on Shape__c (after insert) { }",
    );

    let mut workspace = Workspace::new(AppConfig::default()).expect("Default config is valid");
    let files = workspace.add_path(dir.path()).expect("Failed to add directory");

    assert_eq!(files, 3);
    let registry = workspace.registry();
    assert_eq!(registry.len(), 4);
    assert!(registry.contains("Shape.Point"));
    assert!(registry.contains("ShapeTrigger"));
    assert_eq!(workspace.invalid_nodes().count(), 0);
    assert!(workspace.check().is_ok());

    assert_eq!(
        registry.hierarchy("Circle"),
        vec![
            HierarchyStep::Unit {
                name: "Circle".to_string(),
                documented: true
            },
            HierarchyStep::Unit {
                name: "Shape".to_string(),
                documented: true
            },
            HierarchyStep::BaseObject,
        ]
    );
    let subclasses: Vec<_> = registry.subclasses_of("Shape").map(|n| n.name()).collect();
    assert_eq!(subclasses, vec!["Circle"]);
}

#[test]
fn test_add_file_returns_names() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(dir.path(), "Outer.cls", "class Outer { class Inner { } }");
    write(dir.path(), "README.md", "# not apex");

    let mut workspace = Workspace::new(AppConfig::default()).expect("Default config is valid");

    let names = workspace
        .add_file(dir.path().join("Outer.cls"))
        .expect("Failed to parse");
    assert_eq!(names, Some(vec!["Outer".to_string(), "Outer.Inner".to_string()]));

    let skipped = workspace
        .add_file(dir.path().join("README.md"))
        .expect("Unknown files are skipped");
    assert_eq!(skipped, None);
}

#[test]
fn test_check_reports_failures_with_source() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(dir.path(), "Good.cls", "public class Good { }");
    write(dir.path(), "Bad.cls", "public class Bad {\n    public void m() { }\n");

    let mut workspace = Workspace::new(AppConfig::default()).expect("Default config is valid");
    workspace.add_path(dir.path()).expect("Failed to add directory");

    let Err(ApexdocError::Parse(failures)) = workspace.check() else {
        panic!("Expected a parse error");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].unit(), "Bad");
    assert_eq!(failures[0].diagnostic().code(), Some(ErrorCode::E101));
    assert!(failures[0].src().starts_with("public class Bad"));
    assert!(failures[0].to_string().contains("Bad.cls:3:0"));
}

#[test]
fn test_invalid_parser_config() {
    let config = AppConfig::new(
        ParserConfig::new(None, None, Some(0)),
        ReportConfig::default(),
    );

    let err = Workspace::new(config).expect_err("Zero snapshot is rejected");
    assert!(matches!(err, ApexdocError::Config(_)));
}

#[test]
fn test_missing_path_is_io_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut workspace = Workspace::new(AppConfig::default()).expect("Default config is valid");

    let err = workspace
        .add_path(dir.path().join("Missing.cls"))
        .expect_err("Missing file");
    assert!(matches!(err, ApexdocError::Io(_)));
}
