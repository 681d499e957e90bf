//! Integration tests for configuration-driven builds
//!
//! Tests the path the CLI takes:
//! - Loading biokg.yaml and resolving relative locations
//! - Schema resolution from the configured schema file
//! - On-disk cache population

use biokg_core::{BiokgConfig, BiokgError, Representation};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("core-rs/tests/fixtures")
}

#[test]
fn test_fixture_config_builds() {
    let config = BiokgConfig::load(fixtures_dir().join("biokg.yaml")).unwrap();
    let ontology = config.build_ontology().unwrap();

    assert_eq!(ontology.root(), "entity");
    assert_eq!(ontology.ontology_count(), 2);
    assert!(ontology.contains("missense variant"));
    assert_eq!(ontology.ancestors("protein").unwrap(), vec!["protein", "biological entity", "named thing", "entity"]);
}

#[test]
fn test_extended_schema_from_config() {
    let config = BiokgConfig::load(fixtures_dir().join("biokg.yaml")).unwrap();
    let schema = config.extended_schema().unwrap();

    assert_eq!(schema.len(), 11);
    assert!(!schema.contains_key("Title"));

    let edges = schema.entities_represented_as(Representation::Edge);
    assert_eq!(
        edges,
        vec![
            "protein protein interaction",
            "post translational interaction",
            "intact.protein protein interaction",
            "signor.protein protein interaction"
        ]
    );

    let (key, entry) = schema.find_by_input_label("ensembl_gene").unwrap();
    assert_eq!(key, "ensembl.gene");
    assert_eq!(entry.preferred_id, "ensembl");

    let ptm = schema.get("post translational interaction").unwrap();
    let props: Vec<&str> = ptm.properties.keys().map(String::as_str).collect();
    assert_eq!(props, vec!["method", "residue"]);
}

#[test]
fn test_cache_directory_is_populated() {
    let temp_dir = TempDir::new().unwrap();
    let fixtures = fixtures_dir();
    let yaml = format!(
        r#"
schema_config: {schema}
head_ontology:
  url: {head}
  root_node: entity
tail_ontologies:
  so:
    url: {tail}
    head_join_node: sequence variant
    tail_join_node: sequence_variant
cache_directory: cache
"#,
        schema = fixtures.join("schema_config.yaml").display(),
        head = fixtures.join("biolink_mini.ttl").display(),
        tail = fixtures.join("so_mini.owl").display(),
    );
    let path = temp_dir.path().join("biokg.yaml");
    fs::write(&path, yaml).unwrap();

    let config = BiokgConfig::load(&path).unwrap();
    let first = config.build_ontology().unwrap();

    let cache_dir = temp_dir.path().join("cache");
    let entries: Vec<_> = fs::read_dir(&cache_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let second = config.build_ontology().unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_dir(&cache_dir).unwrap().count(), 1);
}

#[test]
fn test_missing_schema_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("biokg.yaml");
    fs::write(
        &path,
        "schema_config: missing.yaml\nhead_ontology:\n  url: biolink.ttl\n  root_node: entity\n",
    )
    .unwrap();

    let config = BiokgConfig::load(&path).unwrap();
    let result = config.build_ontology();
    assert!(matches!(result, Err(BiokgError::FileNotFound(p)) if p.ends_with("missing.yaml")));
}

#[test]
fn test_strict_flag_selects_policy() {
    let config = BiokgConfig::from_yaml_str(
        "schema_config: s.yaml\nhead_ontology:\n  url: h.ttl\n  root_node: entity\nstrict_composition: true\n",
    )
    .unwrap();
    assert_eq!(config.composition(), biokg_core::CompositionPolicy::Strict);
}
