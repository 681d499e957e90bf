// Schema Resolution Contract Tests
//
// The extended schema is the single source of truth for translation and
// writers. Its keys and their order are part of the output contract.

use biokg_core::{RawSchema, SchemaResolver};

const GENE_SCHEMA: &str = r#"
gene:
  represented_as: node
  preferred_id: [hgnc, ensembl]
  label_in_input: [hgnc_id, ensembl_id]
"#;

/// WHY: Writers diff extended schemas between runs
/// REASON: Resolution must not depend on hash order or run count
/// BREAKS: Database constraint generation and cache keys if unstable
#[test]
fn resolution_is_idempotent() {
    let yaml = r#"
protein:
  represented_as: node
  preferred_id: uniprot
  properties: {name: str, length: int}
isoform:
  represented_as: node
  is_a: protein
  inherit_properties: true
gene:
  represented_as: node
  preferred_id: [hgnc, ensembl]
  label_in_input: [hgnc_id, ensembl_id]
ppi:
  represented_as: edge
  is_a: pairwise molecular interaction
  source: [intact, signor]
"#;
    let raw = RawSchema::from_yaml_str(yaml).unwrap();
    let resolver = SchemaResolver::new();

    let first = resolver.resolve(&raw).unwrap();
    let second = resolver.resolve(&raw).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_yaml_string().unwrap(), second.to_yaml_string().unwrap());
}

/// WHY: n identifiers fan out into exactly n virtual entries plus the umbrella
/// FORMAT: {discriminator}.{entity}, in declaration order
/// BREAKS: Input-label lookup for every multi-identifier entity
#[test]
fn preferred_id_fan_out_is_n_plus_one() {
    let schema = super::support::resolve(GENE_SCHEMA);

    let keys: Vec<&str> = schema.keys().collect();
    assert_eq!(keys, vec!["gene", "hgnc.gene", "ensembl.gene"]);

    let virtual_count = schema.iter().filter(|(_, e)| e.is_virtual).count();
    assert_eq!(virtual_count, 2);

    // If this test fails:
    // - The discriminator prefix format changed
    // - Or the umbrella entry was dropped
}

/// WHY: Each virtual entry keeps exactly its own identifier and label
/// REASON: Translation resolves `hgnc_id` records to `hgnc.gene`
#[test]
fn virtual_entries_pair_identifier_with_label() {
    let schema = super::support::resolve(GENE_SCHEMA);

    let (key, entry) = schema.find_by_input_label("hgnc_id").unwrap();
    assert_eq!(key, "hgnc.gene");
    assert_eq!(entry.preferred_id, "hgnc");

    let (key, entry) = schema.find_by_input_label("ensembl_id").unwrap();
    assert_eq!(key, "ensembl.gene");
    assert_eq!(entry.preferred_id, "ensembl");
}

/// WHY: A self-referential is_a is recovered locally, never fatal
/// BREAKS: Every run with one bad entry if this becomes an error
#[test]
fn self_loop_is_dropped_not_fatal() {
    let schema = super::support::resolve(
        "loop:\n  represented_as: node\n  is_a: loop\nprotein:\n  represented_as: node\n",
    );
    assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["protein"]);
}
