/**
 * config.rs
 * Parser for biokg run configuration files (YAML format)
 *
 * Format:
 * ```yaml
 * schema_config: config/schema_config.yaml
 * head_ontology:
 *   url: https://w3id.org/biolink/biolink-model.owl.ttl
 *   root_node: entity
 * tail_ontologies:
 *   so:
 *     url: tests/fixtures/so.owl
 *     head_join_node: sequence variant
 *     tail_join_node: sequence_variant
 * cache_directory: .cache
 * ```
 *
 * Relative paths are resolved against the directory holding the file.
 */

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;
use tracing::info;

use crate::cache::FileCache;
use crate::drivers;
use crate::errors::{BiokgError, Result};
use crate::hybrid::{HybridOntology, OntologyHybridizer, TailOntologySpec};
use crate::mapping::{ExtendedSchema, RawSchema, SchemaResolver};
use crate::ontology::{CompositionPolicy, HeadOntologySpec};

/// Where the schema configuration comes from: a path or URL, or the
/// mapping itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaSource {
    Location(String),
    Inline(IndexMap<String, YamlValue>),
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiokgConfig {
    pub schema_config: SchemaSource,

    pub head_ontology: HeadOntologySpec,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tail_ontologies: IndexMap<String, TailOntologySpec>,

    /// Enables the on-disk hybridization cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_directory: Option<String>,

    /// Fail on conflicting attributes when joining tails instead of letting
    /// the tail win
    #[serde(default)]
    pub strict_composition: bool,

    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl BiokgConfig {
    pub fn new(schema_config: SchemaSource, head_ontology: HeadOntologySpec) -> Self {
        Self {
            schema_config,
            head_ontology,
            tail_ontologies: IndexMap::new(),
            cache_directory: None,
            strict_composition: false,
            base_dir: None,
        }
    }

    /// Load a configuration file
    ///
    /// # Example
    /// ```no_run
    /// use biokg_core::project::BiokgConfig;
    ///
    /// let config = BiokgConfig::load("biokg.yaml")?;
    /// let ontology = config.build_ontology()?;
    /// # Ok::<(), biokg_core::BiokgError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BiokgError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);

        info!(path = %path.display(), tails = config.tail_ontologies.len(), "loaded configuration");
        Ok(config)
    }

    /// Parse and validate; relative paths stay relative to the working
    /// directory
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: BiokgConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Ensures every location and join node is non-empty
    pub fn validate(&self) -> Result<()> {
        if let SchemaSource::Location(location) = &self.schema_config {
            if location.trim().is_empty() {
                return Err(BiokgError::InvalidConfig(
                    "schema_config cannot be empty".to_string(),
                ));
            }
        }

        if self.head_ontology.url.trim().is_empty() {
            return Err(BiokgError::InvalidConfig(
                "head_ontology.url cannot be empty".to_string(),
            ));
        }
        if self.head_ontology.root_node.trim().is_empty() {
            return Err(BiokgError::InvalidConfig(
                "head_ontology.root_node cannot be empty".to_string(),
            ));
        }

        for (name, tail) in &self.tail_ontologies {
            for (field, value) in [
                ("url", &tail.url),
                ("head_join_node", &tail.head_join_node),
                ("tail_join_node", &tail.tail_join_node),
            ] {
                if value.trim().is_empty() {
                    return Err(BiokgError::InvalidConfig(format!(
                        "tail_ontologies.{}.{} cannot be empty",
                        name, field
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    /// Directory relative locations are resolved against
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolve a location against the configuration's directory. URLs,
    /// `file://` URIs and absolute paths are returned unchanged.
    pub fn resolve_location(&self, location: &str) -> String {
        if drivers::is_remote(location)
            || location.starts_with("file://")
            || Path::new(location).is_absolute()
        {
            return location.to_string();
        }
        match &self.base_dir {
            Some(base) => base.join(location).to_string_lossy().to_string(),
            None => location.to_string(),
        }
    }

    pub fn composition(&self) -> CompositionPolicy {
        if self.strict_composition {
            CompositionPolicy::Strict
        } else {
            CompositionPolicy::LastWriterWins
        }
    }

    pub fn raw_schema(&self) -> Result<RawSchema> {
        match &self.schema_config {
            SchemaSource::Location(location) => SchemaResolver::load_raw(&self.resolve_location(location)),
            SchemaSource::Inline(document) => RawSchema::from_document(document.clone()),
        }
    }

    pub fn extended_schema(&self) -> Result<ExtendedSchema> {
        SchemaResolver::new().resolve(&self.raw_schema()?)
    }

    /// Hybridizer over the configured ontologies, with locations resolved
    /// and the cache attached when a cache directory is set
    pub fn hybridizer(&self) -> Result<OntologyHybridizer> {
        let mut head = self.head_ontology.clone();
        head.url = self.resolve_location(&head.url);

        let tails = self
            .tail_ontologies
            .iter()
            .map(|(name, tail)| {
                let mut tail = tail.clone();
                tail.url = self.resolve_location(&tail.url);
                (name.clone(), tail)
            })
            .collect();

        let mut hybridizer = OntologyHybridizer::new(head, tails).with_composition(self.composition());
        if let Some(dir) = &self.cache_directory {
            let cache = FileCache::new(self.resolve_location(dir))?;
            hybridizer = hybridizer.with_cache(Box::new(cache));
        }
        Ok(hybridizer)
    }

    /// Resolve the schema and build the hybrid ontology
    pub fn build_ontology(&self) -> Result<HybridOntology> {
        let schema = self.extended_schema()?;
        self.hybridizer()?.build(&schema)
    }
}
