/**
 * hybrid module
 *
 * - hybridizer: joins tail ontologies onto the head and extends the result
 *   with the extended schema
 * - ontology: HybridOntology, the read-only query surface
 * - structure: ASCII tree and GRAPHML views
 */

pub mod hybridizer;
pub mod ontology;
pub mod structure;

pub use hybridizer::{OntologyHybridizer, TailOntologySpec, DISJOINT_CLASSES, ENTITY};
pub use ontology::HybridOntology;
