// Schema Extension Contracts
//
// Every schema entity must end up as a class in the hybrid hierarchy, either
// found in an ontology or attached through is_a.

use biokg_core::BiokgError;

use super::support::{hybridize, resolve};

/// WHY: An entity without is_a must already exist in some ontology
/// BREAKS: Silent loss of typed nodes at write time
#[test]
fn entity_absent_from_ontologies_is_orphan() {
    let schema = resolve("foo:\n  represented_as: node\n  preferred_id: id\n");
    let result = hybridize(None, &schema);

    assert!(matches!(result, Err(BiokgError::OrphanEntity(ref key)) if key == "foo"));
}

/// WHY: is_a attaches new classes as user extensions below existing ones
/// FORMAT: user extensions carry a PascalCase label
#[test]
fn is_a_attaches_user_extension() {
    let schema = resolve(
        "altered gene product level:\n  represented_as: node\n  is_a: functional effect variant\n",
    );
    let ontology = hybridize(None, &schema).unwrap();

    let node = ontology.node("altered gene product level").unwrap();
    assert!(node.user_extension);
    assert_eq!(node.label, "AlteredGeneProductLevel");
    assert!(node.schema.is_some());

    assert_eq!(
        ontology.ancestors("altered gene product level").unwrap(),
        vec![
            "altered gene product level",
            "functional effect variant",
            "sequence variant",
            "biological entity",
            "named thing",
            "entity"
        ]
    );
}

/// WHY: Every user extension has a parent after the build
/// BREAKS: Multi-label strings would stop short of the root
#[test]
fn user_extensions_are_never_dangling() {
    let schema = resolve(
        r#"
post translational interaction:
  represented_as: edge
  is_a: [protein modification, protein]
isoform:
  represented_as: node
  is_a: protein
"#,
    );
    let ontology = hybridize(None, &schema).unwrap();
    let graph = ontology.graph();

    for (key, node) in graph.nodes() {
        if node.user_extension {
            assert!(graph.parents(key).count() > 0, "{} has no parent", key);
        }
    }
    assert!(graph.has_edge("protein modification", "protein"));
}

/// WHY: Synonyms rename the ontology class to the schema key
#[test]
fn synonym_replaces_target_class() {
    let schema = resolve("gene product:\n  represented_as: node\n  synonym_for: protein\n");
    let ontology = hybridize(None, &schema).unwrap();

    assert!(ontology.contains("gene product"));
    assert!(!ontology.graph().has_node("protein"));
    assert!(ontology.graph().has_edge("gene product", "biological entity"));
}

/// WHY: A synonym pointing nowhere is fatal
#[test]
fn synonym_without_target_is_rejected() {
    let schema = resolve("gene product:\n  represented_as: node\n  synonym_for: polypeptide\n");
    let result = hybridize(None, &schema);

    assert!(matches!(
        result,
        Err(BiokgError::SynonymTargetNotFound { ref target, .. }) if target == "polypeptide"
    ));
}
