//! Tests for the unit and trigger grammars, run through the public parse
//! entry points.

use apexdoc_core::{
    Span,
    error::ErrorCode,
    ir::{AccessModifier, ClassUnit, EnumUnit, IrKind, IrNode, Nature, Trigger},
};

use crate::{Grammar, ParseConfig, parse_str};

fn parse_unit(source: &str) -> Vec<IrNode> {
    parse_str(Grammar::Unit, "Fallback", source, &ParseConfig::default())
}

fn parse_trigger(source: &str) -> Vec<IrNode> {
    parse_str(Grammar::Trigger, "Fallback", source, &ParseConfig::default())
}

/// Parse `source` and return the single valid class it declares.
fn single_class(source: &str) -> ClassUnit {
    let nodes = parse_unit(source);
    assert_eq!(nodes.len(), 1, "expected one node, got {nodes:?}");
    assert!(
        nodes[0].is_valid(),
        "expected a valid node, got {:?}",
        nodes[0].diagnostics()
    );
    nodes[0].as_class().cloned().expect("node should be a class")
}

fn single_enum(source: &str) -> EnumUnit {
    let nodes = parse_unit(source);
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].is_valid(), "{:?}", nodes[0].diagnostics());
    match nodes[0].kind() {
        IrKind::Enum(unit) => unit.clone(),
        other => panic!("node should be an enum, got {other:?}"),
    }
}

fn single_trigger(source: &str) -> Trigger {
    let nodes = parse_trigger(source);
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].is_valid(), "{:?}", nodes[0].diagnostics());
    nodes[0].as_trigger().cloned().expect("node should be a trigger")
}

/// Parse `source` and return the code of the one diagnostic on the one
/// placeholder node.
fn failure_code(grammar: Grammar, source: &str) -> ErrorCode {
    let nodes = parse_str(grammar, "Broken", source, &ParseConfig::default());
    assert_eq!(nodes.len(), 1, "expected a single placeholder");
    let node = &nodes[0];
    assert!(!node.is_valid());
    assert_eq!(node.name(), "Broken");
    assert_eq!(node.nature(), grammar.nature());
    assert_eq!(node.diagnostics().len(), 1);
    node.diagnostics()[0].code().expect("diagnostic should carry a code")
}

mod class_tests {
    use super::*;

    #[test]
    fn test_empty_public_class() {
        let unit = single_class("public class Foo { }");

        assert_eq!(unit.name, "Foo");
        assert!(unit.is_class);
        assert_eq!(unit.access, AccessModifier::Public);
        assert!(unit.methods.is_empty());
        assert_eq!(unit.start_line, 1);
        assert_eq!(unit.end_line, 1);
    }

    #[test]
    fn test_class_modifiers_and_inheritance() {
        let unit = single_class(
            "global with sharing abstract class InvoiceService extends BaseService implements Queueable, Database.Batchable<SObject> {\n}",
        );

        assert_eq!(unit.access, AccessModifier::Global);
        assert!(unit.with_sharing);
        assert!(unit.is_abstract);
        assert!(!unit.is_virtual);
        assert_eq!(unit.base.as_ref().map(|b| b.name.as_str()), Some("BaseService"));
        assert_eq!(unit.interfaces.len(), 2);
        assert_eq!(unit.interfaces[1].to_string(), "Database.Batchable<SObject>");
        assert_eq!(unit.end_line, 2);
    }

    #[test]
    fn test_without_sharing_and_virtual() {
        let unit = single_class("public without sharing virtual class Base {}");

        assert!(!unit.with_sharing);
        assert!(unit.is_virtual);
    }

    #[test]
    fn test_annotation_values_keep_dotted_and_signed_forms() {
        let unit = single_class("@Foo(limit=-1, label=System.Label.Greeting) public class A { }");

        let annotation = &unit.annotations[0];
        assert_eq!(annotation.params.len(), 2);
        assert_eq!(
            annotation.param("limit").and_then(|p| p.value.as_deref()),
            Some("-1")
        );
        assert_eq!(
            annotation.param("label").and_then(|p| p.value.as_deref()),
            Some("System.Label.Greeting")
        );
    }

    #[test]
    fn test_stray_annotation_token_is_malformed() {
        assert_eq!(
            failure_code(Grammar::Unit, "@Foo(limit=1; x) public class A { }"),
            ErrorCode::E100
        );
    }

    #[test]
    fn test_class_without_access_modifier() {
        let unit = single_class("class Hidden {}");

        assert_eq!(unit.access, AccessModifier::Package);
    }

    #[test]
    fn test_doc_comment_and_annotations_before_class() {
        let unit = single_class(
            "/**\n * Runs the nightly sync.\n * @author ops\n */\n@isTest\nprivate class SyncTest {\n}",
        );

        let doc = unit.doc_comment.as_ref().expect("class should be documented");
        assert_eq!(doc.text, "Runs the nightly sync.");
        assert_eq!(doc.annotations[0].name, "@author");
        assert!(unit.is_test());
        // The declaration starts after its doc comment and annotations.
        assert_eq!(unit.start_line, 6);
        assert_eq!(unit.end_line, 7);
    }

    #[test]
    fn test_interface_methods_end_with_semicolon() {
        let unit = single_class(
            "public interface Shape {\n    Double area();\n    String describe(Integer precision);\n}",
        );

        assert!(!unit.is_class);
        assert_eq!(unit.methods.len(), 2);
        assert!(unit.methods.iter().all(|m| m.is_declaration()));
        assert_eq!(unit.methods[1].parameters[0].name, "precision");
        assert_eq!(unit.methods[1].start_line, 3);
        assert_eq!(unit.methods[1].end_line, 3);
    }

    #[test]
    fn test_abstract_method_without_body() {
        let unit = single_class(
            "public abstract class Job {\n    protected abstract void run(Id recordId);\n    public virtual String label() { return 'job'; }\n}",
        );

        assert!(unit.methods[0].is_abstract);
        assert_eq!(unit.methods[0].access, AccessModifier::Protected);
        assert!(unit.methods[1].is_virtual);
        assert_eq!(unit.methods[1].max_nest_depth, 1);
    }

    #[test]
    fn test_concrete_method_needs_body() {
        assert_eq!(
            failure_code(Grammar::Unit, "public class A {\n    public void run();\n}"),
            ErrorCode::E100
        );
    }
}

mod member_tests {
    use super::*;

    #[test]
    fn test_method_nesting_and_lines() {
        let unit = single_class("public class A { public void m() { if (x) { y(); } } }");

        let method = &unit.methods[0];
        assert_eq!(method.name, "m");
        assert_eq!(method.return_type.as_ref().map(|t| t.name.as_str()), Some("void"));
        assert_eq!(method.max_nest_depth, 2);
        assert_eq!(method.start_line, 1);
        assert_eq!(method.end_line, 1);
    }

    #[test]
    fn test_method_lines_span_body() {
        let unit = single_class(
            "public class A {\n    // counts things\n    public static Integer count(List<Account> accounts) {\n        for (Account a : accounts) {\n            if (a.Name != null) {\n                n++;\n            }\n        }\n        return n;\n    }\n}",
        );

        let method = &unit.methods[0];
        assert!(method.is_static);
        assert_eq!(method.comments.len(), 1);
        assert_eq!(method.comments[0].text, "counts things");
        assert_eq!(method.start_line, 3);
        assert_eq!(method.end_line, 10);
        assert_eq!(method.length(), 8);
        assert_eq!(method.max_nest_depth, 3);
        assert_eq!(unit.end_line, 11);
    }

    #[test]
    fn test_test_methods() {
        let unit = single_class(
            "@isTest\nprivate class AccountTest {\n    @isTest static void annotated() {}\n    static testMethod void legacy() {}\n    static void helper() {}\n}",
        );

        let names: Vec<_> = unit.test_methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["annotated", "legacy"]);
    }

    #[test]
    fn test_method_doc_comment_params() {
        let unit = single_class(
            "public class Mailer {\n    /**\n     * Sends a message.\n     * @param to recipient address\n     */\n    public void send(String to) {}\n}",
        );

        let doc = unit.methods[0].doc_comment.as_ref().expect("documented");
        let params: Vec<_> = doc.annotations_named("@param").collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].param.as_deref(), Some("to"));
        assert_eq!(params[0].explanation, "recipient address");
    }

    #[test]
    fn test_constructors() {
        let unit = single_class(
            "public class Point {\n    public Point() { this(0, 0); }\n    public Point(Integer x, Integer y) { this.x = x; }\n}",
        );

        let constructor = unit.constructor.as_ref().expect("constructor");
        assert!(constructor.is_constructor);
        assert!(constructor.parameters.is_empty());
        assert_eq!(constructor.start_line, 2);
        assert_eq!(unit.methods.len(), 2);
        assert!(unit.methods.iter().all(|m| m.is_constructor));
        assert_eq!(unit.methods[1].parameters.len(), 2);
    }

    #[test]
    fn test_properties_and_fields() {
        let unit = single_class(
            "public class Settings {\n    public String name { get; set; }\n    private static final Integer MAX = 10;\n    public transient Map<String, Object> cache;\n    public Integer a, b;\n    public Boolean ready { get { return true; } }\n}",
        );

        let names: Vec<_> = unit.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["name", "MAX", "cache", "a", "ready"]);
        let max = &unit.attributes[1];
        assert!(max.is_static);
        assert!(max.is_final);
        assert_eq!(max.access, AccessModifier::Private);
        assert_eq!(max.line, 3);
        assert_eq!(unit.attributes[2].type_ref.to_string(), "Map<String, Object>");
    }

    #[test]
    fn test_static_block() {
        let unit = single_class(
            "public class Registry {\n    static Map<String, Integer> codes;\n    static {\n        codes = new Map<String, Integer>();\n    }\n}",
        );

        assert_eq!(unit.attributes.len(), 1);
        assert_eq!(unit.static_blocks.len(), 1);
        assert_eq!(unit.static_blocks[0].start_line, 3);
        assert_eq!(unit.static_blocks[0].end_line, 5);
    }

    #[test]
    fn test_query_braces_do_not_count() {
        let unit = single_class(
            "public class Q {\n    List<Account> load() {\n        return [SELECT Id FROM Account WHERE Name = '{x}'];\n    }\n}",
        );

        assert_eq!(unit.methods[0].max_nest_depth, 1);
        assert_eq!(unit.methods[0].end_line, 4);
    }

    #[test]
    fn test_comments_between_members() {
        let unit = single_class(
            "public class C {\n    /* loose block */\n    public void a() {}\n    /** trailing doc */\n}",
        );

        assert_eq!(unit.methods.len(), 1);
        assert_eq!(unit.methods[0].comments.len(), 1);
        assert_eq!(unit.methods[0].comments[0].text, "loose block");
    }
}

mod inner_class_tests {
    use super::*;

    #[test]
    fn test_inner_classes_hoisted_in_pre_order() {
        let nodes = parse_unit(
            "public class Outer {\n    public class A {\n        class A1 { }\n    }\n    private interface B { void go(); }\n}",
        );

        let names: Vec<_> = nodes.iter().map(|n| n.qualified_name()).collect();
        assert_eq!(names, vec!["Outer", "Outer.A", "Outer.A.A1", "Outer.B"]);
        assert!(nodes.iter().all(|n| n.is_valid()));
        assert!(nodes.iter().all(|n| n.nature() == Nature::Class));
        assert_eq!(nodes[2].as_class().map(|c| c.outer.clone()), Some(vec![
            "Outer".to_string(),
            "A".to_string()
        ]));
        assert_eq!(nodes[3].label(), "Apex Interface");
    }

    #[test]
    fn test_inner_class_lines() {
        let nodes = parse_unit("public class Outer {\n    class Inner {\n    }\n}");

        let inner = nodes[1].as_class().expect("class");
        assert_eq!(inner.start_line, 2);
        assert_eq!(inner.end_line, 3);
        assert_eq!(nodes[0].as_class().map(|c| c.end_line), Some(4));
    }

    #[test]
    fn test_inner_enum_stays_with_class() {
        let nodes = parse_unit("public class Order {\n    public enum Status { OPEN, CLOSED }\n}");

        assert_eq!(nodes.len(), 1);
        let unit = nodes[0].as_class().expect("class");
        assert_eq!(unit.enums[0].name, "Status");
        assert_eq!(unit.enums[0].value_names().collect::<Vec<_>>(), vec![
            "OPEN", "CLOSED"
        ]);
    }
}

mod enum_tests {
    use super::*;

    #[test]
    fn test_top_level_enum() {
        let unit = single_enum("public enum Color { RED, GREEN }");

        assert_eq!(unit.name, "Color");
        assert_eq!(unit.access, AccessModifier::Public);
        assert_eq!(unit.value_names().collect::<Vec<_>>(), vec!["RED", "GREEN"]);
    }

    #[test]
    fn test_enum_values_own_their_doc_comments() {
        let unit = single_enum(
            "/** Traffic light colours. */\npublic enum Light {\n    /** Stop. */\n    RED,\n    AMBER,\n    // go\n    GREEN\n}",
        );

        assert_eq!(unit.doc_comment.as_ref().map(|d| d.text.as_str()), Some("Traffic light colours."));
        assert_eq!(unit.values[0].doc_comment.as_ref().map(|d| d.text.as_str()), Some("Stop."));
        assert!(unit.values[1].doc_comment.is_none());
        assert!(unit.values[1].comments.is_empty());
        assert_eq!(unit.values[2].comments[0].text, "go");
    }

    #[test]
    fn test_empty_enum() {
        let unit = single_enum("enum Nothing { }");

        assert!(unit.values.is_empty());
    }

    #[test]
    fn test_enum_bad_separator() {
        assert_eq!(
            failure_code(Grammar::Unit, "public enum Color { RED; GREEN }"),
            ErrorCode::E100
        );
    }
}

mod trigger_tests {
    use super::*;
    use apexdoc_core::ir::{TriggerOperation, TriggerTiming};

    #[test]
    fn test_trigger_events() {
        let trigger = single_trigger("trigger T on Account (before insert, after update) { }");

        assert_eq!(trigger.name, "T");
        assert_eq!(trigger.on_object, "Account");
        assert!(trigger.before_insert);
        assert!(trigger.after_update);
        assert!(!trigger.before_update);
        assert!(!trigger.after_insert);
        assert!(!trigger.before_delete);
        assert!(!trigger.after_undelete);
    }

    #[test]
    fn test_trigger_lines_and_depth() {
        let trigger = single_trigger(
            "/** Keeps contacts in sync. */\ntrigger ContactSync on Contact (AFTER Insert, after undelete) {\n    for (Contact c : Trigger.new) {\n        if (c.Email != null) { queue(c); }\n    }\n}",
        );

        assert_eq!(trigger.doc_comment.as_ref().map(|d| d.text.as_str()), Some("Keeps contacts in sync."));
        assert!(trigger.fires_on(TriggerTiming::After, TriggerOperation::Insert));
        assert!(trigger.fires_on(TriggerTiming::After, TriggerOperation::Undelete));
        assert_eq!(trigger.start_line, 2);
        assert_eq!(trigger.end_line, 6);
        assert_eq!(trigger.max_nest_depth, 3);
    }

    #[test]
    fn test_repeated_event_is_accepted() {
        let trigger = single_trigger("trigger T on Lead (before insert, before insert) {}");

        assert!(trigger.before_insert);
    }

    #[test]
    fn test_unknown_operation() {
        assert_eq!(
            failure_code(Grammar::Trigger, "trigger T on Lead (before upsert) {}"),
            ErrorCode::E100
        );
    }

    #[test]
    fn test_missing_on() {
        assert_eq!(
            failure_code(Grammar::Trigger, "trigger T for Lead (before insert) {}"),
            ErrorCode::E100
        );
    }

    #[test]
    fn test_unterminated_trigger() {
        assert_eq!(
            failure_code(Grammar::Trigger, "trigger T on Lead (before insert) {\n  x();"),
            ErrorCode::E101
        );
    }

    #[test]
    fn test_class_in_trigger_file() {
        assert_eq!(
            failure_code(Grammar::Trigger, "public class NotATrigger {}"),
            ErrorCode::E102
        );
    }
}

mod error_handling_tests {
    use super::*;

    #[test]
    fn test_unterminated_class() {
        let nodes = parse_unit("public class Foo {");

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name(), "Fallback");
        let diag = &nodes[0].diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert!(diag.message().contains("end of input"));
        assert_eq!(diag.line(), 1);
        assert_eq!(diag.offset(), 18);
    }

    #[test]
    fn test_unterminated_class_points_at_its_name() {
        let nodes = parse_unit("public class Foo {\n    void a() { }\n");
        let labels = nodes[0].diagnostics()[0].labels();

        assert_eq!(labels.len(), 2);
        assert!(labels[0].is_primary());
        assert!(!labels[1].is_primary());
        assert_eq!(labels[1].message(), "class starts here");
        assert_eq!(labels[1].span(), Span::new(13..16));
    }

    #[test]
    fn test_malformed_member_has_single_label() {
        let nodes = parse_unit("public class Foo {\n    42\n}");

        assert_eq!(nodes[0].diagnostics()[0].labels().len(), 1);
    }

    #[test]
    fn test_unterminated_method_inside_class() {
        // The method cannot complete, so the body is not understood.
        assert_eq!(
            failure_code(Grammar::Unit, "public class Foo {\n    void m() {\n"),
            ErrorCode::E100
        );
    }

    #[test]
    fn test_garbage_in_class_body() {
        let nodes = parse_unit("public class Foo {\n    42\n}");
        let diag = &nodes[0].diagnostics()[0];

        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "Unable to understand structure in class body");
        assert_eq!(diag.line(), 2);
        assert_eq!(diag.offset(), 4);
        let snapshot = diag.snapshot().expect("snapshot");
        assert!(snapshot.starts_with("///2:4 - 42\n}"), "{snapshot}");
    }

    #[test]
    fn test_unrecognized_unit() {
        assert_eq!(failure_code(Grammar::Unit, "hello world"), ErrorCode::E102);
        assert_eq!(failure_code(Grammar::Unit, ""), ErrorCode::E102);
    }

    #[test]
    fn test_missing_class_name() {
        assert_eq!(failure_code(Grammar::Unit, "public class {}"), ErrorCode::E100);
    }

    #[test]
    fn test_lexer_error_becomes_diagnostic() {
        assert_eq!(
            failure_code(Grammar::Unit, "public class Foo { String s = 'open; }"),
            ErrorCode::E002
        );
    }

    #[test]
    fn test_unterminated_doc_comment() {
        assert_eq!(failure_code(Grammar::Unit, "/** dangling"), ErrorCode::E101);
    }
}

mod source_lifecycle_tests {
    use std::{cell::Cell, io, rc::Rc};

    use super::*;
    use crate::{CharSource, StrSource, parse_source};

    /// Counts how often the parser closes it.
    struct CountingSource {
        inner: StrSource,
        closes: Rc<Cell<u32>>,
    }

    impl CharSource for CountingSource {
        fn read(&mut self, max: usize) -> io::Result<String> {
            self.inner.read(max)
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
            self.inner.close();
        }

        fn is_open(&self) -> bool {
            self.inner.is_open()
        }
    }

    fn closes_after(source: &str, config: &ParseConfig) -> (u32, Vec<IrNode>) {
        let closes = Rc::new(Cell::new(0));
        let nodes = parse_source(
            Grammar::Unit,
            "Counted",
            CountingSource {
                inner: StrSource::new(source),
                closes: Rc::clone(&closes),
            },
            config,
        );
        (closes.get(), nodes)
    }

    #[test]
    fn test_closed_once_on_success() {
        let (closes, nodes) = closes_after("public class A { }", &ParseConfig::default());

        assert!(nodes[0].is_valid());
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_closed_once_on_failure() {
        let (closes, nodes) = closes_after("public class A {", &ParseConfig::default());

        assert!(!nodes[0].is_valid());
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_closed_once_when_failing_before_end_of_input() {
        let config = ParseConfig::default().with_chunk_size(16);
        let mut source = String::from("public class A {\n    42\n}\n");
        source.push_str(&"// filler\n".repeat(50));

        let (closes, nodes) = closes_after(&source, &config);

        assert!(!nodes[0].is_valid());
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_small_chunks_parse_the_same() {
        let source = "public class Big {\n    public void a() { if (x) { y(); } }\n    public Integer b { get; set; }\n}";
        let config = ParseConfig::default().with_chunk_size(16);

        let (_, small) = closes_after(source, &config);
        let (_, large) = closes_after(source, &ParseConfig::default());

        assert_eq!(small[0].as_class(), large[0].as_class());
    }
}

mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// A brace-delimited block and the blocks nested in it.
    #[derive(Debug, Clone)]
    struct Block(Vec<Block>);

    impl Block {
        fn depth(&self) -> u32 {
            1 + self.0.iter().map(Block::depth).max().unwrap_or(0)
        }

        fn render(&self) -> String {
            let inner: Vec<_> = self.0.iter().map(Block::render).collect();
            format!("{{\nx();\n{}\n}}", inner.join("\n"))
        }
    }

    fn block_strategy() -> impl Strategy<Value = Block> {
        Just(Block(Vec::new())).prop_recursive(6, 32, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Block)
        })
    }

    fn check_nesting_depth_matches_tree(block: &Block) -> Result<(), TestCaseError> {
        let body = block.render();
        let source = format!("public class A {{\npublic void m() {body}\n}}");
        let unit = single_class(&source);

        let body_lines = body.matches('\n').count() as u32;
        let method = &unit.methods[0];
        prop_assert_eq!(method.max_nest_depth, block.depth());
        prop_assert_eq!(method.start_line, 2);
        prop_assert_eq!(method.end_line, 2 + body_lines);
        prop_assert_eq!(unit.end_line, 3 + body_lines);
        Ok(())
    }

    fn check_parse_never_panics(source: &str) -> Result<(), TestCaseError> {
        for grammar in [Grammar::Unit, Grammar::Trigger] {
            let nodes = parse_str(grammar, "Any", source, &ParseConfig::default());
            prop_assert!(!nodes.is_empty());
            for node in nodes.iter().filter(|n| !n.is_valid()) {
                prop_assert_eq!(node.diagnostics().len(), 1);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn nesting_depth_matches_tree(block in block_strategy()) {
            check_nesting_depth_matches_tree(&block)?;
        }

        #[test]
        fn parse_never_panics(source in "[ -~\t\n]{0,200}") {
            check_parse_never_panics(&source)?;
        }
    }
}
