// Shared fixtures for contract tests

use biokg_core::{
    ExtendedSchema, HeadOntologySpec, HybridOntology, OntologyFormat, OntologyHybridizer,
    OntologySource, RawSchema, Result, SchemaResolver, SourceOptions, TailOntologySpec,
};
use indexmap::IndexMap;

pub const HEAD_TTL: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix biolink: <https://w3id.org/biolink/vocab/> .

biolink:Entity rdfs:label "entity" .
biolink:NamedThing rdfs:label "named thing" ; rdfs:subClassOf biolink:Entity .
biolink:BiologicalEntity rdfs:label "biological entity" ; rdfs:subClassOf biolink:NamedThing .
biolink:SequenceVariant rdfs:label "sequence variant" ; rdfs:subClassOf biolink:BiologicalEntity .
biolink:FunctionalEffectVariant rdfs:label "functional effect variant" ; rdfs:subClassOf biolink:SequenceVariant .
biolink:Gene rdfs:label "gene" ; rdfs:subClassOf biolink:BiologicalEntity .
biolink:Protein rdfs:label "protein" ; rdfs:subClassOf biolink:BiologicalEntity .
biolink:Disease rdfs:label "disease" ; rdfs:subClassOf biolink:NamedThing .
"#;

pub const HEAD_CLASSES: [&str; 8] = [
    "entity",
    "named thing",
    "biological entity",
    "sequence variant",
    "functional effect variant",
    "gene",
    "protein",
    "disease",
];

pub const TAIL_TTL: &str = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix obo: <http://purl.obolibrary.org/obo/> .

obo:SO_0001060 rdfs:label "sequence_variant" .
obo:SO_0001564 rdfs:label "gene_variant" ; rdfs:subClassOf obo:SO_0001060 .
obo:SO_0001583 rdfs:label "missense_variant" ; rdfs:subClassOf obo:SO_0001564 .
"#;

pub fn head_source() -> OntologySource {
    OntologySource::from_bytes(
        "https://w3id.org/biolink/mini.ttl",
        HEAD_TTL.as_bytes(),
        OntologyFormat::Turtle,
        "entity",
        &SourceOptions::default(),
    )
    .unwrap()
}

pub fn tail_source(spec: &TailOntologySpec) -> OntologySource {
    OntologySource::from_bytes(
        "http://purl.obolibrary.org/obo/so-mini.ttl",
        TAIL_TTL.as_bytes(),
        OntologyFormat::Turtle,
        &spec.tail_join_node,
        &spec.options,
    )
    .unwrap()
}

pub fn resolve(yaml: &str) -> ExtendedSchema {
    let raw = RawSchema::from_yaml_str(yaml).unwrap();
    SchemaResolver::new().resolve(&raw).unwrap()
}

/// Hybridize the in-memory head (and optional tail) with a schema
pub fn hybridize(tail: Option<TailOntologySpec>, schema: &ExtendedSchema) -> Result<HybridOntology> {
    let head_spec = HeadOntologySpec::new("https://w3id.org/biolink/mini.ttl", "entity");
    let mut tails = IndexMap::new();
    let mut loaded = Vec::new();
    if let Some(spec) = tail {
        loaded.push((spec.clone(), tail_source(&spec)));
        tails.insert("so".to_string(), spec);
    }
    OntologyHybridizer::new(head_spec, tails).assemble(&head_source(), &loaded, schema)
}
