//! Integration tests for loading ontology documents
//!
//! Tests loading of the fixture ontologies from disk:
//! - Turtle and RDF/XML parsing
//! - Root lookup and the two-direction walk
//! - Format detection and overrides

use biokg_core::{BiokgError, OntologyFormat, OntologySource, SourceOptions};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("core-rs/tests/fixtures")
        .join(name)
        .to_string_lossy()
        .to_string()
}

#[test]
fn test_load_turtle_head() {
    let source = OntologySource::load(&fixture("biolink_mini.ttl"), "entity", &SourceOptions::default()).unwrap();

    assert_eq!(source.root(), "entity");
    assert_eq!(source.graph().node_count(), 13);

    // Reached only through the upward walk from "gene"
    assert!(source.graph().has_edge("gene", "gene or gene product"));
    // Blank-node restrictions never become classes
    assert_eq!(source.graph().parents("protein").collect::<Vec<_>>(), vec!["biological entity"]);

    assert_eq!(
        source.ancestors("functional effect variant").unwrap(),
        vec![
            "functional effect variant",
            "sequence variant",
            "biological entity",
            "named thing",
            "entity"
        ]
    );
}

#[test]
fn test_english_label_preferred() {
    let source = OntologySource::load(&fixture("biolink_mini.ttl"), "entity", &SourceOptions::default()).unwrap();
    assert!(source.graph().has_node("gene"));
    assert!(!source.graph().has_node("gen"));
}

#[test]
fn test_load_rdf_xml_tail_from_join_node() {
    let source = OntologySource::load(&fixture("so_mini.owl"), "sequence_variant", &SourceOptions::default()).unwrap();

    assert_eq!(source.root(), "sequence variant");
    let descendants = source.graph().descendants("sequence variant").unwrap();
    assert_eq!(descendants.len(), 4);
    assert!(descendants.contains(&"stop gained".to_string()));

    // Parents of the root are walked too, unrelated classes are not
    assert!(source.graph().has_edge("sequence variant", "sequence comparison"));
    assert!(!source.graph().has_node("gene"));

    assert_eq!(source.graph().node("missense variant").unwrap().label, "SO_0001583");
}

#[test]
fn test_key_by_identifier() {
    let options = SourceOptions {
        switch_label_and_id: false,
        ..SourceOptions::default()
    };
    let source = OntologySource::load(&fixture("mondo_mini.ttl"), "disease", &options).unwrap();

    assert_eq!(source.root(), "MONDO_0000001");
    assert_eq!(
        source.ancestors("MONDO_0005148").unwrap(),
        vec!["MONDO_0005148", "MONDO_0005015", "MONDO_0000001"]
    );
    assert_eq!(source.graph().node("MONDO_0005015").unwrap().label, "diabetes mellitus");
}

#[test]
fn test_root_not_found_names_label() {
    let result = OntologySource::load(&fixture("biolink_mini.ttl"), "anatomical entity", &SourceOptions::default());
    match result {
        Err(BiokgError::RootNotFound { label, uri }) => {
            assert_eq!(label, "anatomical entity");
            assert!(uri.ends_with("biolink_mini.ttl"));
        }
        other => panic!("Expected RootNotFound, got {:?}", other),
    }
}

#[test]
fn test_obo_rejected_before_reading() {
    // The file does not exist; the format check comes first
    let result = OntologySource::load("/nonexistent/go.obo", "biological_process", &SourceOptions::default());
    assert!(matches!(result, Err(BiokgError::UnsupportedFormat(_))));
}

#[test]
fn test_explicit_format_overrides_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("biolink.download");
    fs::copy(fixture("biolink_mini.ttl"), &path).unwrap();

    let options = SourceOptions {
        format: Some("turtle".to_string()),
        ..SourceOptions::default()
    };
    let source = OntologySource::load(path.to_str().unwrap(), "entity", &options).unwrap();
    assert!(source.graph().has_node("pathway"));

    let result = OntologySource::load(path.to_str().unwrap(), "entity", &SourceOptions::default());
    assert!(matches!(result, Err(BiokgError::UnsupportedFormat(_))));
}

#[test]
fn test_missing_document() {
    let result = OntologySource::load("/nonexistent/biolink.ttl", "entity", &SourceOptions::default());
    assert!(matches!(result, Err(BiokgError::FileNotFound(_))));
}

#[test]
fn test_malformed_document() {
    let result = OntologySource::from_bytes(
        "broken.ttl",
        b"@prefix ex: <http://example.org/> . ex:a ex:b",
        OntologyFormat::Turtle,
        "entity",
        &SourceOptions::default(),
    );
    assert!(matches!(result, Err(BiokgError::RdfParse { .. })));
}

#[test]
fn test_subclass_cycle_is_a_data_error() {
    let ttl = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://example.org/> .
ex:A rdfs:label "a" ; rdfs:subClassOf ex:B .
ex:B rdfs:label "b" ; rdfs:subClassOf ex:A .
"#;
    let result = OntologySource::from_bytes(
        "http://example.org/cycle.ttl",
        ttl.as_bytes(),
        OntologyFormat::Turtle,
        "a",
        &SourceOptions::default(),
    );
    assert!(matches!(result, Err(BiokgError::RdfParse { reason, .. }) if reason.contains("cycle")));
}
