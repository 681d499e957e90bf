//! Error types for BioKG Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BiokgError {
    #[error("Unsupported ontology format: {0}")]
    UnsupportedFormat(String),

    #[error("Root node '{label}' not found in ontology {uri}")]
    RootNotFound { label: String, uri: String },

    #[error("Head join node '{node}' not found in head ontology (tail ontology {tail})")]
    JoinNodeNotFound { node: String, tail: String },

    #[error("Entity '{0}' is not part of the ontology and has no is_a definition")]
    OrphanEntity(String),

    #[error("Synonym target '{target}' of entity '{entity}' not found in ontology")]
    SynonymTargetNotFound { entity: String, target: String },

    #[error("Class '{0}' was introduced by the schema but is never attached to the ontology")]
    DanglingParent(String),

    #[error("Edge '{child}' is_a '{parent}' closes a directed cycle")]
    Cycle { child: String, parent: String },

    #[error("Conflicting attributes for node '{0}' while merging ontologies")]
    AttributeConflict(String),

    #[error("Class not found in ontology: {0}")]
    UnknownClass(String),

    #[error("Invalid schema entry '{entity}': {reason}")]
    InvalidSchema { entity: String, reason: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("RDF parse error in {uri}: {reason}")]
    RdfParse { uri: String, reason: String },

    #[error("Query error: {0}")]
    Query(String),

    #[error("HTTP error fetching {url}: {reason}")]
    Http { url: String, reason: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, BiokgError>;
