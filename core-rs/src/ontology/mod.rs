/**
 * ontology module
 *
 * - case: label normalization (lower sentence case keys, PascalCase labels)
 * - graph: directed class hierarchy with child -> parent edges
 * - source: OWL/RDF documents loaded with Oxigraph and walked from a root class
 */

pub mod case;
pub mod graph;
pub mod source;

pub use graph::{CompositionPolicy, OntologyGraph, OntologyNode};
pub use source::{HeadOntologySpec, OntologyFormat, OntologySource, SourceOptions};
