// Join Node Contracts
//
// A tail subtree hangs below exactly one head class. Merging fuses the two
// join nodes, otherwise both stay and a single edge connects them.

use biokg_core::{BiokgError, ExtendedSchema, SourceOptions, TailOntologySpec};

use super::support::hybridize;

fn so_spec() -> TailOntologySpec {
    TailOntologySpec::new(
        "http://purl.obolibrary.org/obo/so-mini.ttl",
        "sequence variant",
        "sequence_variant",
    )
}

/// WHY: Merged join nodes are one class in the output hierarchy
/// REASON: Two "sequence variant" labels would split instance data
/// BREAKS: Label uniqueness for every tail-joined ontology
#[test]
fn merged_join_node_appears_once() {
    let ontology = hybridize(Some(so_spec()), &ExtendedSchema::new()).unwrap();
    let graph = ontology.graph();

    let count = graph.keys().filter(|k| *k == "sequence variant").count();
    assert_eq!(count, 1);

    // Head parents survive the merge, tail children hang below it
    assert!(graph.has_edge("sequence variant", "biological entity"));
    assert!(graph.has_edge("gene variant", "sequence variant"));
    assert!(!graph.has_node("sequence_variant"));
}

/// WHY: Unmerged joins keep both classes, tail join as child of head join
/// BREAKS: Tail ontologies that model a narrower concept than the head class
#[test]
fn unmerged_join_nodes_stay_distinct() {
    let spec = so_spec().merge_nodes(false);
    let spec = TailOntologySpec {
        options: SourceOptions {
            switch_label_and_id: false,
            ..SourceOptions::default()
        },
        ..spec
    };
    let ontology = hybridize(Some(spec), &ExtendedSchema::new()).unwrap();
    let graph = ontology.graph();

    assert!(graph.has_node("sequence variant"));
    assert!(graph.has_node("SO_0001060"));
    assert!(graph.has_edge("SO_0001060", "sequence variant"));
    assert_eq!(graph.parents("SO_0001060").count(), 1);
    assert!(graph.has_edge("SO_0001583", "SO_0001564"));
}

/// WHY: A head join class that does not exist is fatal, never guessed
#[test]
fn missing_head_join_node_is_rejected() {
    let spec = TailOntologySpec::new(
        "http://purl.obolibrary.org/obo/so-mini.ttl",
        "genomic feature",
        "sequence_variant",
    );
    let result = hybridize(Some(spec), &ExtendedSchema::new());

    assert!(matches!(
        result,
        Err(BiokgError::JoinNodeNotFound { ref node, .. }) if node == "genomic feature"
    ));
}

/// WHY: Joining never introduces a cycle
#[test]
fn joined_graph_is_acyclic() {
    let ontology = hybridize(Some(so_spec()), &ExtendedSchema::new()).unwrap();
    assert!(ontology.graph().find_cycle().is_none());
    assert_eq!(
        ontology.ancestors("missense variant").unwrap(),
        vec![
            "missense variant",
            "gene variant",
            "sequence variant",
            "biological entity",
            "named thing",
            "entity"
        ]
    );
}
