//! Schema configuration types
//!
//! `SchemaEntry` is one declaration as the user wrote it (scalars or lists),
//! `ExtendedSchemaEntry` is the resolved form produced by
//! [`SchemaResolver`](super::SchemaResolver).
//!
//! ```yaml
//! gene:
//!   represented_as: node
//!   preferred_id: [hgnc, ensembl]
//!   label_in_input: [hgnc_id, ensembl_id]
//! altered gene product level:
//!   represented_as: node
//!   is_a: functional effect variant
//!   inherit_properties: true
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use tracing::debug;

use crate::errors::Result;

/// Default `preferred_id` for entries that do not declare one
pub const DEFAULT_PREFERRED_ID: &str = "id";

/// A scalar or a list of scalars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    pub fn first(&self) -> Option<&T> {
        match self {
            Self::One(v) => Some(v),
            Self::Many(vs) => vs.first(),
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v.clone()],
            Self::Many(vs) => vs.clone(),
        }
    }

    /// Replicate a scalar `n` times; lists are returned as-is
    pub fn broadcast(&self, n: usize) -> Vec<T> {
        match self {
            Self::One(v) => vec![v.clone(); n],
            Self::Many(vs) => vs.clone(),
        }
    }
}

/// Graph element kind an entity is written as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    Node,
    Edge,
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node => write!(f, "node"),
            Self::Edge => write!(f, "edge"),
        }
    }
}

/// One declaration of the raw schema configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub represented_as: Option<OneOrMany<Representation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_id: Option<OneOrMany<String>>,

    #[serde(default, alias = "input_label", skip_serializing_if = "Option::is_none")]
    pub label_in_input: Option<OneOrMany<String>>,

    /// Parent class(es), closest first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_a: Option<OneOrMany<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_properties: Option<IndexMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit_properties: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonym_for: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OneOrMany<String>>,

    /// Only ever set by the resolver; a user-supplied value is ignored
    #[serde(default, rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_as_edge: Option<String>,

    /// Keys this crate does not interpret, kept verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl SchemaEntry {
    /// Parent list, closest first; empty when `is_a` is absent
    pub fn parents(&self) -> Vec<String> {
        self.is_a.as_ref().map(OneOrMany::to_vec).unwrap_or_default()
    }

    pub fn has_parents(&self) -> bool {
        !self.parents().is_empty()
    }
}

/// A resolved schema declaration. Identifier, input label and source are
/// scalars; list-valued originals have been fanned out into virtual entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedSchemaEntry {
    pub represented_as: Representation,

    pub preferred_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_in_input: Option<String>,

    /// Full parent list, closest first. Only the walk described in
    /// `hybrid` turns these into edges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub is_a: Vec<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub exclude_properties: IndexMap<String, String>,

    #[serde(default)]
    pub inherit_properties: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonym_for: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_as_edge: Option<String>,

    /// Keys of the virtual entries fanned out from this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_children: Vec<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, YamlValue>,
}

impl ExtendedSchemaEntry {
    pub fn is_node(&self) -> bool {
        self.represented_as == Representation::Node
    }

    pub fn is_edge(&self) -> bool {
        self.represented_as == Representation::Edge
    }

    pub fn has_parents(&self) -> bool {
        !self.is_a.is_empty()
    }
}

/// The user's schema configuration, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSchema {
    entries: IndexMap<String, SchemaEntry>,
}

impl RawSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML schema document. Top-level values that are not mappings
    /// (document titles, comments-as-strings) are skipped.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: IndexMap<String, YamlValue> = serde_yaml::from_str(yaml)?;
        Self::from_document(document)
    }

    /// Build from an already-parsed top-level mapping
    pub fn from_document(document: IndexMap<String, YamlValue>) -> Result<Self> {
        let mut entries = IndexMap::new();

        for (key, value) in document {
            if !value.is_mapping() {
                debug!(entity = %key, "skipping non-mapping schema value");
                continue;
            }
            let entry: SchemaEntry = serde_yaml::from_value(value)?;
            entries.insert(key, entry);
        }

        Ok(Self { entries })
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: SchemaEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SchemaEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved schema: entity name → resolved declaration, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtendedSchema {
    entries: IndexMap<String, ExtendedSchemaEntry>,
}

impl ExtendedSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: ExtendedSchemaEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn get(&self, key: &str) -> Option<&ExtendedSchemaEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtendedSchemaEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entities written as the given graph element kind
    pub fn entities_represented_as(&self, kind: Representation) -> Vec<&str> {
        self.iter()
            .filter(|(_, e)| e.represented_as == kind)
            .map(|(k, _)| k)
            .collect()
    }

    /// Entity whose `label_in_input` matches an input record's label
    pub fn find_by_input_label(&self, label: &str) -> Option<(&str, &ExtendedSchemaEntry)> {
        self.iter()
            .find(|(_, e)| e.label_in_input.as_deref() == Some(label))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.entries)?)
    }
}
