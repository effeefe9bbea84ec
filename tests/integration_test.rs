//! End-to-end integration tests for the conversion pipeline.
//!
//! Exercises the complete path from raw section text through the split
//! engine to serialized Akoma Ntoso / USLM documents, plus the CLI binary.

use std::fs;

use quick_xml::events::Event;
use quick_xml::Reader;

use statute_xml::citation::Citation;
use statute_xml::splitting::SplitEngine;
use statute_xml::types::{Section, Statute, Subsection};
use statute_xml::xml::{serialize, LegalXmlFormat};

const STRUCTURAL_TAGS: [&str; 5] = [
    "subsection",
    "paragraph",
    "subparagraph",
    "clause",
    "subclause",
];

/// Run the split-then-project pipeline on raw text.
fn pipeline(jurisdiction: &str, code: &str, number: &str, text: &str) -> Statute {
    let engine = SplitEngine::for_jurisdiction(jurisdiction);
    let (lead, subsections) = engine.split(text);
    let section = Section::new(jurisdiction, code, number)
        .with_text(lead)
        .with_subsections(subsections);
    Statute::from_section(&section).unwrap()
}

/// Walk a document and collect (tag, id attribute) for structural elements.
fn structural_elements(xml: &str, id_attr: &str) -> Vec<(String, String)> {
    let mut reader = Reader::from_str(xml);
    let mut elements = Vec::new();
    loop {
        match reader.read_event().expect("well-formed XML") {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if STRUCTURAL_TAGS.contains(&tag.as_str()) {
                    let id = e
                        .attributes()
                        .filter_map(Result::ok)
                        .find(|a| a.key.as_ref() == id_attr.as_bytes())
                        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
                        .unwrap_or_default();
                    elements.push((tag, id));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    elements
}

/// Identifier sequence from a tree, depth-first.
fn tree_identifiers(subsections: &[Subsection], out: &mut Vec<String>) {
    for node in subsections {
        out.push(node.identifier.clone());
        tree_identifiers(&node.children, out);
    }
}

#[test]
fn test_canonical_scenario_tree_and_akn() {
    let statute = pipeline(
        "us",
        "26",
        "61",
        "(a) First rule. (1) Sub one. (2) Sub two. (b) Second rule.",
    );

    let subs = &statute.section.subsections;
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].identifier, "a");
    assert_eq!(subs[0].text, "First rule.");
    assert_eq!(subs[0].children.len(), 2);
    assert_eq!(subs[0].children[0].identifier, "1");
    assert_eq!(subs[0].children[0].text, "Sub one.");
    assert_eq!(subs[1].identifier, "b");
    assert_eq!(subs[1].text, "Second rule.");
    assert!(subs[1].children.is_empty());

    let xml = serialize(&statute, LegalXmlFormat::AkomaNtoso, "2025-06-01");
    let elements = structural_elements(&xml, "eId");
    let tags: Vec<&str> = elements.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        tags,
        vec!["subsection", "paragraph", "paragraph", "subsection"]
    );
    assert_eq!(elements[0].1, "sec_61__subsec_a");
    assert_eq!(elements[1].1, "sec_61__subsec_a__para_1");
    assert_eq!(elements[2].1, "sec_61__subsec_a__para_2");
    assert_eq!(elements[3].1, "sec_61__subsec_b");
}

#[test]
fn test_round_trip_structure_both_formats() {
    let statute = pipeline(
        "us-ca",
        "RTC",
        "17041",
        "(a) Tax imposed. (1) On residents. (2) On part-year residents. \
         (b) Rates. (1) As scheduled.",
    );

    let mut expected = Vec::new();
    tree_identifiers(&statute.section.subsections, &mut expected);

    for (format, id_attr) in [
        (LegalXmlFormat::AkomaNtoso, "eId"),
        (LegalXmlFormat::Uslm, "identifier"),
    ] {
        let xml = serialize(&statute, format, "2025-06-01");
        let elements = structural_elements(&xml, id_attr);
        // Each structural element's id ends with its sanitized identifier.
        assert_eq!(elements.len(), expected.len());
        for ((_, id), identifier) in elements.iter().zip(&expected) {
            let suffix = format!("_{}", identifier.to_lowercase());
            assert!(
                id.ends_with(&suffix),
                "{id} should end with {suffix}"
            );
        }
    }
}

#[test]
fn test_ordering_preserved_for_non_monotonic_identifiers() {
    let statute = pipeline("us-ny", "TAX", "601", "(1) One. (1-A) One-A. (2) Two.");

    let mut ids = Vec::new();
    tree_identifiers(&statute.section.subsections, &mut ids);
    assert_eq!(ids, vec!["1", "1-A", "2"]);

    let xml = serialize(&statute, LegalXmlFormat::AkomaNtoso, "2025-06-01");
    let one = xml.find("subsec_1\"").unwrap();
    let one_a = xml.find("subsec_1-a\"").unwrap();
    let two = xml.find("subsec_2\"").unwrap();
    assert!(one < one_a && one_a < two);
}

#[test]
fn test_depth_bound_holds_end_to_end() {
    let text = "(a) L1. (1) L2. (A) L3. (i) L4a. (ii) L4b. \
                (I) L5a. (II) L5b. (1.1) L6 flattened.";
    let statute = pipeline("us", "26", "61", text);

    let max_depth = statute
        .section
        .subsections
        .iter()
        .map(Subsection::depth)
        .max()
        .unwrap();
    assert!(max_depth <= 5);

    let xml = serialize(&statute, LegalXmlFormat::AkomaNtoso, "2025-06-01");
    assert!(xml.contains("L6 flattened."));
    // Nothing below subclause exists in the mapping, so nothing nests deeper.
    assert!(xml.contains("<subclause"));
}

#[test]
fn test_citation_round_trip() {
    let citation = Citation::parse("Cal. RTC § 17041").unwrap();
    assert_eq!(citation.jurisdiction, "us-ca");
    assert_eq!(citation.code, "RTC");
    assert_eq!(citation.section, "17041");
    assert!(citation.subsection_path.is_none());
    assert_eq!(citation.format().unwrap(), "Cal. RTC § 17041");
}

#[test]
fn test_empty_section_number_is_rejected() {
    // "26 USC § " with a trailing empty path segment must never be produced.
    let citation = Citation::new("us", "26", "");
    assert!(citation.format().is_err());

    let section = Section::new("us", "26", "");
    assert!(Statute::from_section(&section).is_err());
}

#[test]
fn test_serialization_deterministic_end_to_end() {
    let statute = pipeline(
        "us-mn",
        "STAT",
        "290.01",
        "Subd. 1. Scope: This chapter applies.\nSubd. 2. Definitions: Terms apply.",
    );
    let a = serialize(&statute, LegalXmlFormat::Uslm, "2025-06-01");
    let b = serialize(&statute, LegalXmlFormat::Uslm, "2025-06-01");
    assert_eq!(a, b);
    assert!(a.contains("<heading>Scope</heading>"));
}

#[test]
fn test_flat_section_degrades_to_paragraphs() {
    let statute = pipeline(
        "us",
        "26",
        "7701",
        "No markers here at all.\n\nJust two paragraphs of prose.",
    );
    assert!(statute.section.subsections.is_empty());

    let xml = serialize(&statute, LegalXmlFormat::AkomaNtoso, "2025-06-01");
    assert!(xml.contains("<p>No markers here at all.</p>"));
    assert!(xml.contains("<p>Just two paragraphs of prose.</p>"));
}

mod cli {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use tempfile::tempdir;

    use super::fs;

    #[test]
    fn test_convert_command_writes_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("section.json");
        fs::write(
            &input,
            r#"{"jurisdiction":"us-ca","code":"RTC","section_number":"17041",
               "title":"Imposition of tax",
               "text":"(a) First rule. (b) Second rule."}"#,
        )
        .unwrap();
        let output = dir.path().join("out");

        Command::cargo_bin("statute-xml")
            .unwrap()
            .args(["convert"])
            .arg(&input)
            .args(["--date", "2025-06-01", "--output"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved to:"));

        let written = output.join("us-ca/rtc/17041.xml");
        let content = fs::read_to_string(written).unwrap();
        assert!(content.contains("subsec_a"));
        assert!(content.contains("Imposition of tax"));
    }

    #[test]
    fn test_convert_command_rejects_bad_date() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("section.json");
        fs::write(
            &input,
            r#"{"jurisdiction":"us","code":"26","section_number":"61","text":"Flat."}"#,
        )
        .unwrap();

        Command::cargo_bin("statute-xml")
            .unwrap()
            .args(["convert"])
            .arg(&input)
            .args(["--date", "not-a-date"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Error:"));
    }

    #[test]
    fn test_batch_command_reports_counts() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("batch.json");
        fs::write(
            &input,
            r#"[{"jurisdiction":"us","code":"26","section_number":"61",
                 "text":"(a) One. (b) Two."},
                {"jurisdiction":"us-zz","code":"X","section_number":"1",
                 "text":"Unregistered."}]"#,
        )
        .unwrap();
        let output = dir.path().join("out");

        Command::cargo_bin("statute-xml")
            .unwrap()
            .args(["batch"])
            .arg(&input)
            .args(["--date", "2025-06-01", "--format", "uslm", "--output"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("Converted:"))
            .stdout(predicate::str::contains("Failed:"));

        assert!(output.join("us/26/61.xml").exists());
        assert!(!output.join("us-zz").exists());
    }
}
