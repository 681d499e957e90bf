//! HybridOntology: the read-only result of hybridization
//!
//! Holds the hybrid class graph together with the extended schema it was
//! built from. Nothing mutates it after construction, so it can be shared
//! between readers freely.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{BiokgError, Result};
use crate::hybrid::structure;
use crate::mapping::ExtendedSchema;
use crate::ontology::case::{sentence_to_pascal_case, to_lower_sentence_case};
use crate::ontology::{OntologyGraph, OntologyNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridOntology {
    root: String,
    ontology_count: usize,
    extended_schema: ExtendedSchema,
    graph: OntologyGraph,
}

impl HybridOntology {
    pub fn new(
        root: impl Into<String>,
        ontology_count: usize,
        extended_schema: ExtendedSchema,
        graph: OntologyGraph,
    ) -> Self {
        Self {
            root: root.into(),
            ontology_count,
            extended_schema,
            graph,
        }
    }

    /// Key of the head ontology's root class
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Head plus tail ontologies that went into the graph
    pub fn ontology_count(&self) -> usize {
        self.ontology_count
    }

    pub fn extended_schema(&self) -> &ExtendedSchema {
        &self.extended_schema
    }

    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    /// Graph key for a label, accepting any casing `to_lower_sentence_case`
    /// normalizes
    fn key_for<'a>(&'a self, label: &str) -> Option<&'a str> {
        self.graph
            .key(label)
            .or_else(|| self.graph.key(&to_lower_sentence_case(label)))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.key_for(label).is_some()
    }

    pub fn node(&self, label: &str) -> Option<&OntologyNode> {
        self.key_for(label).and_then(|key| self.graph.node(key))
    }

    /// The class and every class above it, depth-first pre-order
    pub fn ancestors(&self, label: &str) -> Result<Vec<String>> {
        self.key_for(label)
            .and_then(|key| self.graph.ancestors(key))
            .ok_or_else(|| BiokgError::UnknownClass(label.to_string()))
    }

    /// Ancestors in PascalCase, the form writers store as labels
    pub fn multi_labels(&self, label: &str) -> Result<Vec<String>> {
        Ok(self
            .ancestors(label)?
            .iter()
            .map(|key| sentence_to_pascal_case(key))
            .collect())
    }

    /// The graph to display: everything when `full`, otherwise only the
    /// schema's classes and their ancestors
    pub fn display_graph(&self, full: bool) -> OntologyGraph {
        if full {
            return self.graph.clone();
        }

        let mut keep: Vec<String> = Vec::new();
        for key in self.extended_schema.keys() {
            if let Some(ancestors) = self.graph.ancestors(key) {
                keep.extend(ancestors);
            }
        }
        self.graph.subgraph(keep.iter().map(String::as_str))
    }

    /// ASCII tree of the (optionally schema-filtered) hierarchy
    pub fn show_structure(&self, full: bool) -> String {
        structure::render_tree(&self.display_graph(full), &self.root, self.ontology_count)
    }

    /// GRAPHML export of the (optionally schema-filtered) hierarchy
    pub fn write_graphml<P: AsRef<Path>>(&self, path: P, full: bool) -> Result<()> {
        structure::write_graphml_file(&self.display_graph(full), path)
    }
}
