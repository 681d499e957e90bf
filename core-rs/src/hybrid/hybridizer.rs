//! OntologyHybridizer: head + tail ontologies + extended schema → one graph
//!
//! Construction runs in strict order and aborts on the first failure:
//! 1. load the head ontology
//! 2. load each tail, rooted at its tail join node
//! 3. join each tail subtree onto the head join node
//! 4. extend the graph with the schema's `is_a` chains
//! 5. attach classes known to float free of "entity" under it
//! 6. apply synonyms and merge schema declarations onto their classes
//!
//! The finished graph is checked for cycles and for schema-introduced
//! classes that never got attached.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CachedOntology, OntologyCache};
use crate::errors::{BiokgError, Result};
use crate::hybrid::HybridOntology;
use crate::mapping::ExtendedSchema;
use crate::ontology::case::{sentence_to_pascal_case, to_lower_sentence_case};
use crate::ontology::{
    CompositionPolicy, HeadOntologySpec, OntologyGraph, OntologyNode, OntologySource, SourceOptions,
};

/// Root concept the disjoint classes are attached to
pub const ENTITY: &str = "entity";

/// Mixin and utility classes of the head model that have no path to "entity"
pub const DISJOINT_CLASSES: [&str; 7] = [
    "frequency qualifier mixin",
    "chemical entity to entity association mixin",
    "ontology class",
    "relationship quantifier",
    "physical essence or occurrent",
    "gene or gene product",
    "subject of investigation",
];

fn default_true() -> bool {
    true
}

/// Tail ontology reference
///
/// ```yaml
/// url: tests/fixtures/so.owl
/// head_join_node: sequence variant
/// tail_join_node: sequence_variant
/// merge_nodes: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailOntologySpec {
    pub url: String,
    pub head_join_node: String,
    pub tail_join_node: String,

    /// Fuse the two join nodes into one (true) or keep the tail's join node
    /// as a child of the head's (false)
    #[serde(default = "default_true")]
    pub merge_nodes: bool,

    #[serde(flatten)]
    pub options: SourceOptions,
}

impl TailOntologySpec {
    pub fn new(
        url: impl Into<String>,
        head_join_node: impl Into<String>,
        tail_join_node: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            head_join_node: head_join_node.into(),
            tail_join_node: tail_join_node.into(),
            merge_nodes: true,
            options: SourceOptions::default(),
        }
    }

    pub fn merge_nodes(mut self, merge: bool) -> Self {
        self.merge_nodes = merge;
        self
    }
}

/// Everything a cached result depends on
#[derive(Serialize)]
struct CacheInputs<'a> {
    head: &'a HeadOntologySpec,
    tails: &'a IndexMap<String, TailOntologySpec>,
    composition: CompositionPolicy,
    schema: &'a ExtendedSchema,
}

pub struct OntologyHybridizer {
    head: HeadOntologySpec,
    tails: IndexMap<String, TailOntologySpec>,
    composition: CompositionPolicy,
    cache: Option<Box<dyn OntologyCache>>,
}

impl std::fmt::Debug for OntologyHybridizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyHybridizer")
            .field("head", &self.head)
            .field("tails", &self.tails)
            .field("composition", &self.composition)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl OntologyHybridizer {
    pub fn new(head: HeadOntologySpec, tails: IndexMap<String, TailOntologySpec>) -> Self {
        Self {
            head,
            tails,
            composition: CompositionPolicy::default(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Box<dyn OntologyCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Attribute reconciliation for tail subtrees; last-writer-wins unless
    /// set to [`CompositionPolicy::Strict`]
    pub fn with_composition(mut self, policy: CompositionPolicy) -> Self {
        self.composition = policy;
        self
    }

    pub fn head(&self) -> &HeadOntologySpec {
        &self.head
    }

    pub fn tails(&self) -> &IndexMap<String, TailOntologySpec> {
        &self.tails
    }

    /// Load every ontology and hybridize it with `schema`, going through the
    /// cache when one is configured
    pub fn build(&self, schema: &ExtendedSchema) -> Result<HybridOntology> {
        let key = match &self.cache {
            Some(_) => Some(cache_key(&CacheInputs {
                head: &self.head,
                tails: &self.tails,
                composition: self.composition,
                schema,
            })?),
            None => None,
        };

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            match cache.load(key) {
                Ok(Some(entry)) => {
                    info!(key = %key, "using cached hybrid ontology");
                    return Ok(entry.ontology);
                }
                Ok(None) => debug!(key = %key, "no cached hybrid ontology"),
                Err(e) => warn!(key = %key, error = %e, "cache read failed, rebuilding"),
            }
        }

        let head = OntologySource::load(&self.head.url, &self.head.root_node, &self.head.options)?;

        let mut tails = Vec::with_capacity(self.tails.len());
        for (name, spec) in &self.tails {
            debug!(tail = %name, url = %spec.url, "loading tail ontology");
            let source = OntologySource::load(&spec.url, &spec.tail_join_node, &spec.options)?;
            tails.push((spec.clone(), source));
        }

        let ontology = self.assemble(&head, &tails, schema)?;

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Err(e) = cache.save(key, &CachedOntology::new(key.clone(), ontology.clone())) {
                warn!(key = %key, error = %e, "failed to cache hybrid ontology");
            }
        }

        Ok(ontology)
    }

    /// Hybridize already-loaded sources. Each tail source must be rooted at
    /// its tail join node.
    pub fn assemble(
        &self,
        head: &OntologySource,
        tails: &[(TailOntologySpec, OntologySource)],
        schema: &ExtendedSchema,
    ) -> Result<HybridOntology> {
        let mut graph = head.graph().clone();

        for (spec, tail) in tails {
            graph = self.join_tail(graph, head, spec, tail)?;
        }
        info!(
            nodes = graph.node_count(),
            tails = tails.len(),
            "joined tail ontologies"
        );

        extend_with_schema(&mut graph, schema)?;
        connect_disjoint_classes(&mut graph);
        let graph = add_properties(graph, schema)?;
        validate(&graph)?;

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "hybrid ontology ready"
        );

        Ok(HybridOntology::new(
            head.root(),
            tails.len() + 1,
            schema.clone(),
            graph,
        ))
    }

    fn join_tail(
        &self,
        graph: OntologyGraph,
        head: &OntologySource,
        spec: &TailOntologySpec,
        tail: &OntologySource,
    ) -> Result<OntologyGraph> {
        let head_join = resolve_key(head.graph(), &spec.head_join_node).ok_or_else(|| {
            BiokgError::JoinNodeNotFound {
                node: spec.head_join_node.clone(),
                tail: tail.uri().to_string(),
            }
        })?;
        let tail_join = tail.root().to_string();

        let descendants = tail.graph().descendants(&tail_join).unwrap_or_default();
        let mut subtree = tail.graph().subgraph(descendants.iter().map(String::as_str));

        debug!(
            tail = %tail.uri(),
            head_join = %head_join,
            tail_join = %tail_join,
            classes = subtree.node_count(),
            merge = spec.merge_nodes,
            "joining tail subtree"
        );

        if spec.merge_nodes || tail_join == head_join {
            if !spec.merge_nodes {
                warn!(node = %head_join, "join nodes share a key, merging them");
            }
            if self.composition == CompositionPolicy::Strict {
                // The fused join node is the head's class
                if let Some(node) = graph.node(&head_join) {
                    subtree.upsert_node(tail_join.as_str(), node.clone());
                }
            }
            let subtree = subtree.relabel(&tail_join, &head_join);
            graph.compose(&subtree, self.composition)
        } else {
            let mut joined = graph.compose(&subtree, self.composition)?;
            if joined.would_create_cycle(&tail_join, &head_join) {
                return Err(BiokgError::Cycle {
                    child: tail_join,
                    parent: head_join,
                });
            }
            joined.add_edge(&tail_join, &head_join);
            Ok(joined)
        }
    }
}

/// Exact key, else its lower-sentence-case form, else the node labelled with
/// that form (head ontologies keyed by identifier)
fn resolve_key(graph: &OntologyGraph, name: &str) -> Option<String> {
    if let Some(key) = graph.key(name) {
        return Some(key.to_string());
    }
    let normalized = to_lower_sentence_case(name);
    if let Some(key) = graph.key(&normalized) {
        return Some(key.to_string());
    }
    graph
        .nodes()
        .find(|(_, node)| node.label == normalized)
        .map(|(key, _)| key.to_string())
}

/// Attach every schema entity to the graph. Entities with `is_a` are chained
/// upward until a class that already existed; entities without one must
/// already be classes (or name one through `synonym_for`).
fn extend_with_schema(graph: &mut OntologyGraph, schema: &ExtendedSchema) -> Result<()> {
    for (key, entry) in schema.iter() {
        if !entry.has_parents() {
            if let Some(target) = &entry.synonym_for {
                if !graph.has_node(target) {
                    return Err(BiokgError::SynonymTargetNotFound {
                        entity: key.to_string(),
                        target: target.clone(),
                    });
                }
            } else if !graph.has_node(key) {
                return Err(BiokgError::OrphanEntity(key.to_string()));
            }
            continue;
        }

        let mut child = key.to_string();
        for parent in &entry.is_a {
            let parent_existed = graph.has_node(parent);

            if !graph.has_node(&child) {
                graph.add_node(child.as_str(), OntologyNode::user_extension(sentence_to_pascal_case(&child)));
            }
            if !parent_existed {
                graph.add_node(parent.as_str(), OntologyNode::user_extension(sentence_to_pascal_case(parent)));
            }

            if !graph.has_edge(&child, parent) {
                if graph.would_create_cycle(&child, parent) {
                    return Err(BiokgError::Cycle {
                        child,
                        parent: parent.clone(),
                    });
                }
                graph.add_edge(&child, parent);
                debug!(child = %child, parent = %parent, "added schema edge");
            }

            if parent_existed {
                break;
            }
            child = parent.clone();
        }
    }

    Ok(())
}

fn connect_disjoint_classes(graph: &mut OntologyGraph) {
    if !graph.has_node(ENTITY) {
        debug!("no 'entity' class, leaving disjoint classes alone");
        return;
    }

    for class in DISJOINT_CLASSES {
        graph.add_node(class, OntologyNode::new(sentence_to_pascal_case(class)));
        if graph.has_edge(class, ENTITY) {
            continue;
        }
        if graph.would_create_cycle(class, ENTITY) {
            debug!(class, "attaching under 'entity' would close a cycle, skipping");
            continue;
        }
        graph.add_edge(class, ENTITY);
    }
}

/// Rename synonym targets and merge each schema declaration onto its class
fn add_properties(mut graph: OntologyGraph, schema: &ExtendedSchema) -> Result<OntologyGraph> {
    for (key, entry) in schema.iter() {
        if let Some(target) = &entry.synonym_for {
            if !graph.has_node(target) {
                return Err(BiokgError::SynonymTargetNotFound {
                    entity: key.to_string(),
                    target: target.clone(),
                });
            }
            if target != key {
                debug!(synonym = %key, target = %target, "renaming class to its synonym");
                graph = graph.relabel(target, key);
            }
        }

        match graph.node_mut(key) {
            Some(node) => node.schema = Some(entry.clone()),
            None => return Err(BiokgError::OrphanEntity(key.to_string())),
        }
    }

    Ok(graph)
}

fn validate(graph: &OntologyGraph) -> Result<()> {
    if let Some(node) = graph.find_cycle() {
        let parent = graph
            .parents(&node)
            .find(|p| graph.ancestors(p).map_or(false, |a| a.contains(&node)))
            .unwrap_or(node.as_str())
            .to_string();
        return Err(BiokgError::Cycle {
            child: node,
            parent,
        });
    }

    if let Some((key, _)) = graph
        .nodes()
        .find(|(key, node)| node.user_extension && graph.parents(key).next().is_none())
    {
        return Err(BiokgError::DanglingParent(key.to_string()));
    }

    Ok(())
}
