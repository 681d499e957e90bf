//! # BioKG Core - ontology hybridization and schema mapping
//!
//! Builds the class hierarchy a biomedical knowledge graph is typed against.
//! A head ontology (usually the Biolink model) is loaded from OWL/RDF, tail
//! ontologies are grafted onto it at join nodes, and the user's schema
//! configuration is resolved into an *extended schema* whose entities are
//! wired into the resulting hybrid graph.
//!
//! ## Pipeline
//!
//! ```text
//!  schema_config.yaml ──► SchemaResolver ──► ExtendedSchema ─┐
//!                                                            ▼
//!  head .ttl/.owl ──► OntologySource ──┐            OntologyHybridizer ──► HybridOntology
//!  tail .owl ───────► OntologySource ──┴──────────────────────▲                │
//!                                                                              ▼
//!                                              ancestors / show_structure / GRAPHML
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use biokg_core::{BiokgConfig, Result};
//!
//! fn main() -> Result<()> {
//!     let config = BiokgConfig::load("biokg.yaml")?;
//!     let ontology = config.build_ontology()?;
//!     println!("{:?}", ontology.ancestors("protein")?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod drivers;
pub mod errors;
pub mod hybrid;
pub mod mapping;
pub mod ontology;
pub mod project;

pub use cache::{CachedOntology, FileCache, MemoryCache, OntologyCache};
pub use errors::{BiokgError, Result};
pub use hybrid::{HybridOntology, OntologyHybridizer, TailOntologySpec};
pub use mapping::{ExtendedSchema, ExtendedSchemaEntry, RawSchema, Representation, SchemaEntry, SchemaResolver};
pub use ontology::{CompositionPolicy, HeadOntologySpec, OntologyFormat, OntologyGraph, OntologyNode, OntologySource, SourceOptions};
pub use project::{BiokgConfig, SchemaSource};

/// Crate version, part of every cache key
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
