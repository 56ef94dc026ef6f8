//! Instrumentation properties over whole scripts

use footprint_core::{instrument, InstrumentationWarning, ScriptDocument, ScriptInstrumenter};
use footprint_test_utils::{SAMPLE_SCRIPT, SCRIPT_WITHOUT_NAMESPACE};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn block() -> String {
    ScriptInstrumenter::default().redefinition_block()
}

#[test]
fn inserts_block_right_after_namespace_import() {
    let doc = ScriptDocument::parse(SAMPLE_SCRIPT);
    let namespace_line = doc.markers().namespace_line.unwrap();

    let result = instrument(&doc);
    assert!(result.warnings.is_empty());

    let inserted = result.inserted.clone().unwrap();
    assert_eq!(inserted.start, namespace_line + 1);

    let lines = result.document.lines();
    assert_eq!(lines[inserted.clone()].concat(), block());
    assert_eq!(&lines[..inserted.start], &doc.lines()[..=namespace_line]);
    assert_eq!(&lines[inserted.end..], &doc.lines()[namespace_line + 1..]);
}

#[test]
fn instrumented_text_is_original_with_block_spliced_in() {
    let doc = ScriptDocument::parse(SAMPLE_SCRIPT);
    let result = instrument(&doc);

    let marker = "namespace import Parflow::*\n";
    let split = SAMPLE_SCRIPT.find(marker).unwrap() + marker.len();
    let expected = format!("{}{}{}", &SAMPLE_SCRIPT[..split], block(), &SAMPLE_SCRIPT[split..]);
    assert_eq!(result.document.text(), expected);
}

#[test]
fn missing_namespace_leaves_document_unchanged() {
    let doc = ScriptDocument::parse(SCRIPT_WITHOUT_NAMESPACE);
    let result = instrument(&doc);

    assert!(!result.is_instrumented());
    assert_eq!(result.document, doc);
    assert_eq!(result.warnings, vec![InstrumentationWarning::MissingNamespaceImport]);
}

#[test]
fn duplicate_namespace_uses_first_and_warns_once() {
    let text = "package require parflow\n\
                namespace import Parflow::*\n\
                pfset A 1\n\
                namespace import Parflow::*\n\
                pfrun x\n";
    let result = instrument(&ScriptDocument::parse(text));

    assert_eq!(result.inserted.as_ref().map(|r| r.start), Some(2));
    assert_eq!(
        result.warnings,
        vec![InstrumentationWarning::DuplicateNamespaceImport { previous: 2, line: 4 }]
    );
    assert_eq!(result.document.text().matches("proc Parflow::pfrun").count(), 1);
}

#[test]
fn run_invocations_are_recorded() {
    let doc = ScriptDocument::parse(SAMPLE_SCRIPT);
    let invocations = &doc.markers().run_invocations;
    assert_eq!(invocations.len(), 1);
    assert!(doc.lines()[invocations[0]].starts_with("pfrun box"));
}

fn script_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z ]{0,20}\n",
        Just("pfset ComputationalGrid.NX 10\n".to_string()),
        Just("package require parflow\n".to_string()),
        Just("pfrun run\n".to_string()),
    ]
}

proptest! {
    #[test]
    fn single_import_preserves_every_line(
        before in prop::collection::vec(script_line(), 0..10),
        after in prop::collection::vec(script_line(), 0..10),
    ) {
        let mut lines = before.clone();
        lines.push("namespace import Parflow::*\n".to_string());
        lines.extend(after.iter().cloned());
        let doc = ScriptDocument::from_lines(lines);

        let result = instrument(&doc);
        let inserted = result.inserted.clone().unwrap();
        let new_lines = result.document.lines();

        prop_assert_eq!(inserted.start, before.len() + 1);
        prop_assert_eq!(&new_lines[..before.len()], before.as_slice());
        prop_assert_eq!(&new_lines[inserted.end..], after.as_slice());
        prop_assert_eq!(new_lines.len(), doc.len() + (inserted.end - inserted.start));
    }

    #[test]
    fn without_import_nothing_changes(lines in prop::collection::vec(script_line(), 0..20)) {
        let doc = ScriptDocument::from_lines(lines);
        let result = instrument(&doc);
        prop_assert!(result.inserted.is_none());
        prop_assert_eq!(&result.document, &doc);
        prop_assert_eq!(result.warnings.iter()
            .filter(|w| **w == InstrumentationWarning::MissingNamespaceImport)
            .count(), 1);
    }
}
