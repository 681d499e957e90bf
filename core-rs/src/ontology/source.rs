//! Ontology documents as class hierarchies
//!
//! An `OntologySource` loads one OWL/RDF document into an in-memory Oxigraph
//! store, locates the root class by its `rdfs:label`, and walks `subClassOf`
//! from the root in both directions to build an [`OntologyGraph`]:
//! down to every descendant, and up from the root and every descendant to
//! their parents. Classes without a label are skipped.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::Term;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::drivers;
use crate::errors::{BiokgError, Result};
use crate::ontology::case::{remove_prefix, to_lower_sentence_case};
use crate::ontology::graph::{OntologyGraph, OntologyNode};

const LABEL_QUERY: &str = r#"
    PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

    SELECT ?class ?label
    WHERE {
        ?class rdfs:label ?label .
        FILTER(isIRI(?class))
    }
"#;

const SUBCLASS_QUERY: &str = r#"
    PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>

    SELECT ?child ?parent
    WHERE {
        ?child rdfs:subClassOf ?parent .
        FILTER(isIRI(?child) && isIRI(?parent))
    }
"#;

/// Serializations an ontology document may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OntologyFormat {
    RdfXml,
    Turtle,
    NTriples,
}

impl OntologyFormat {
    /// Parse an explicit format name (`owl`, `ttl`, `nt`, ...)
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "owl" | "rdf" | "xml" | "rdfxml" | "rdf/xml" | "rdf_xml" => Ok(Self::RdfXml),
            "ttl" | "turtle" => Ok(Self::Turtle),
            "nt" | "ntriples" | "n-triples" => Ok(Self::NTriples),
            "obo" => Err(BiokgError::UnsupportedFormat(
                "OBO documents are not supported, convert to OWL first".to_string(),
            )),
            other => Err(BiokgError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Detect the format from a path or URL extension, ignoring any query
    /// string or fragment
    ///
    /// # Example
    /// ```
    /// use biokg_core::ontology::OntologyFormat;
    ///
    /// assert_eq!(
    ///     OntologyFormat::from_location("https://example.org/biolink-model.owl.ttl?raw=true").unwrap(),
    ///     OntologyFormat::Turtle
    /// );
    /// assert!(OntologyFormat::from_location("so.obo").is_err());
    /// ```
    pub fn from_location(location: &str) -> Result<Self> {
        let path = location
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or(location);
        let file_name = path.rsplit('/').next().unwrap_or(path);

        match file_name.rsplit_once('.') {
            Some((_, extension)) => Self::from_name(extension),
            None => Err(BiokgError::UnsupportedFormat(format!(
                "cannot determine format of {}",
                location
            ))),
        }
    }

    fn rdf_format(self) -> RdfFormat {
        match self {
            Self::RdfXml => RdfFormat::RdfXml,
            Self::Turtle => RdfFormat::Turtle,
            Self::NTriples => RdfFormat::NTriples,
        }
    }
}

fn default_true() -> bool {
    true
}

/// How classes of a document become graph nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceOptions {
    /// Key nodes by lower-sentence-case label (true) or by identifier (false)
    #[serde(default = "default_true")]
    pub switch_label_and_id: bool,

    /// Strip the namespace from identifiers
    #[serde(default = "default_true")]
    pub remove_prefix: bool,

    /// Explicit format name; the location's extension is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            switch_label_and_id: true,
            remove_prefix: true,
            format: None,
        }
    }
}

impl SourceOptions {
    fn resolve_format(&self, location: &str) -> Result<OntologyFormat> {
        match &self.format {
            Some(name) => OntologyFormat::from_name(name),
            None => OntologyFormat::from_location(location),
        }
    }
}

/// Head ontology reference: `{url, root_node}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadOntologySpec {
    pub url: String,
    pub root_node: String,
    #[serde(flatten)]
    pub options: SourceOptions,
}

impl HeadOntologySpec {
    pub fn new(url: impl Into<String>, root_node: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            root_node: root_node.into(),
            options: SourceOptions::default(),
        }
    }
}

/// Labels and `subClassOf` pairs read out of a store
struct ClassIndex {
    labels: HashMap<String, String>,
    all_labels: Vec<(String, String)>,
    parents: BTreeMap<String, BTreeSet<String>>,
    children: BTreeMap<String, BTreeSet<String>>,
}

/// One loaded ontology, read-only after construction
#[derive(Debug, Clone)]
pub struct OntologySource {
    uri: String,
    root: String,
    graph: OntologyGraph,
}

impl OntologySource {
    /// Fetch and load a document, rooted at the class labelled `root_label`
    pub fn load(uri: &str, root_label: &str, options: &SourceOptions) -> Result<Self> {
        // Reject unsupported formats before any download
        let format = options.resolve_format(uri)?;
        info!(uri, root = root_label, ?format, "loading ontology");

        let bytes = drivers::fetch_document(uri)?;
        Self::from_bytes(uri, &bytes, format, root_label, options)
    }

    /// Load an already-retrieved document
    pub fn from_bytes(
        uri: &str,
        bytes: &[u8],
        format: OntologyFormat,
        root_label: &str,
        options: &SourceOptions,
    ) -> Result<Self> {
        let store = Store::new().map_err(|e| BiokgError::Query(e.to_string()))?;
        store
            .load_from_reader(parser_for(format, uri), bytes)
            .map_err(|e| BiokgError::RdfParse {
                uri: uri.to_string(),
                reason: e.to_string(),
            })?;

        let index = ClassIndex::read(&store)?;

        let root_iri = index
            .all_labels
            .iter()
            .filter(|(_, label)| label == root_label)
            .map(|(iri, _)| iri)
            .min()
            .cloned()
            .ok_or_else(|| BiokgError::RootNotFound {
                label: root_label.to_string(),
                uri: uri.to_string(),
            })?;

        let builder = GraphBuilder {
            index: &index,
            options,
        };
        let (root, graph) = builder.build(&root_iri);

        if let Some(node) = graph.find_cycle() {
            return Err(BiokgError::RdfParse {
                uri: uri.to_string(),
                reason: format!("subClassOf cycle through '{}'", node),
            });
        }

        info!(
            uri,
            root = %root,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "ontology loaded"
        );

        Ok(Self {
            uri: uri.to_string(),
            root,
            graph,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Key of the root class in the graph
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    pub fn into_graph(self) -> OntologyGraph {
        self.graph
    }

    /// The class itself followed by its ancestors, depth-first pre-order
    pub fn ancestors(&self, label: &str) -> Result<Vec<String>> {
        self.graph
            .ancestors(label)
            .ok_or_else(|| BiokgError::UnknownClass(label.to_string()))
    }
}

fn base_iri(uri: &str) -> String {
    if drivers::is_remote(uri) || uri.starts_with("file://") {
        return uri.to_string();
    }
    match std::fs::canonicalize(uri) {
        Ok(path) => format!("file:///{}", path.display().to_string().trim_start_matches('/')),
        Err(_) => format!("file:///{}", uri.trim_start_matches('/')),
    }
}

fn parser_for(format: OntologyFormat, uri: &str) -> RdfParser {
    match RdfParser::from_format(format.rdf_format()).with_base_iri(base_iri(uri)) {
        Ok(parser) => parser,
        Err(e) => {
            debug!(uri, error = %e, "location is not a valid base IRI, parsing without one");
            RdfParser::from_format(format.rdf_format())
        }
    }
}

fn term_iri(term: Option<&Term>) -> Option<String> {
    match term {
        Some(Term::NamedNode(node)) => Some(node.as_str().to_string()),
        _ => None,
    }
}

/// Lower rank wins when a class carries several labels
fn label_rank(language: Option<&str>) -> u8 {
    match language {
        None => 0,
        Some(lang) if lang.eq_ignore_ascii_case("en") || lang.to_ascii_lowercase().starts_with("en-") => 1,
        Some(_) => 2,
    }
}

impl ClassIndex {
    fn read(store: &Store) -> Result<Self> {
        let mut ranked: HashMap<String, (u8, String)> = HashMap::new();
        let mut all_labels = Vec::new();

        for solution in select(store, LABEL_QUERY)? {
            let solution = solution.map_err(|e| BiokgError::Query(e.to_string()))?;
            let Some(iri) = term_iri(solution.get("class")) else {
                continue;
            };
            let Some(Term::Literal(literal)) = solution.get("label") else {
                continue;
            };

            let value = literal.value().to_string();
            let rank = label_rank(literal.language());
            all_labels.push((iri.clone(), value.clone()));

            let better = match ranked.get(&iri) {
                Some((best_rank, best)) => (rank, &value) < (*best_rank, best),
                None => true,
            };
            if better {
                ranked.insert(iri, (rank, value));
            }
        }

        let mut parents: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut children: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for solution in select(store, SUBCLASS_QUERY)? {
            let solution = solution.map_err(|e| BiokgError::Query(e.to_string()))?;
            let (Some(child), Some(parent)) = (
                term_iri(solution.get("child")),
                term_iri(solution.get("parent")),
            ) else {
                continue;
            };
            parents.entry(child.clone()).or_default().insert(parent.clone());
            children.entry(parent).or_default().insert(child);
        }

        Ok(Self {
            labels: ranked.into_iter().map(|(iri, (_, label))| (iri, label)).collect(),
            all_labels,
            parents,
            children,
        })
    }
}

fn select(store: &Store, query: &str) -> Result<oxigraph::sparql::QuerySolutionIter> {
    match store.query(query).map_err(|e| BiokgError::Query(e.to_string()))? {
        QueryResults::Solutions(solutions) => Ok(solutions),
        _ => Err(BiokgError::Query("expected a SELECT result".to_string())),
    }
}

/// Two-direction worklist walk from the root class
struct GraphBuilder<'a> {
    index: &'a ClassIndex,
    options: &'a SourceOptions,
}

impl GraphBuilder<'_> {
    fn node_for(&self, iri: &str) -> Option<(String, OntologyNode)> {
        let label = self.index.labels.get(iri)?;
        let id = if self.options.remove_prefix {
            remove_prefix(iri)
        } else {
            iri
        };

        Some(if self.options.switch_label_and_id {
            (to_lower_sentence_case(label), OntologyNode::new(id))
        } else {
            (id.to_string(), OntologyNode::new(to_lower_sentence_case(label)))
        })
    }

    fn link(&self, graph: &mut OntologyGraph, child: &(String, OntologyNode), parent: &(String, OntologyNode)) {
        graph.add_node(child.0.clone(), child.1.clone());
        graph.add_node(parent.0.clone(), parent.1.clone());
        if child.0 == parent.0 {
            debug!(class = %child.0, "distinct classes share a key, skipping self edge");
            return;
        }
        graph.add_edge(&child.0, &parent.0);
    }

    fn build(&self, root_iri: &str) -> (String, OntologyGraph) {
        let mut graph = OntologyGraph::new();

        // The root is labelled by construction
        let root = match self.node_for(root_iri) {
            Some(entry) => entry,
            None => (root_iri.to_string(), OntologyNode::new(root_iri)),
        };
        graph.add_node(root.0.clone(), root.1.clone());

        let mut visited_down: BTreeSet<&str> = BTreeSet::new();
        let mut visited_up: BTreeSet<&str> = BTreeSet::new();
        let mut down: Vec<&str> = vec![root_iri];
        let mut up: Vec<&str> = vec![root_iri];
        visited_down.insert(root_iri);

        // Subclasses of the root; each one is also queued for its parents
        while let Some(iri) = down.pop() {
            let Some(parent) = self.node_for(iri).or_else(|| (iri == root_iri).then(|| root.clone())) else {
                continue;
            };
            for child_iri in self.index.children.get(iri).into_iter().flatten() {
                let Some(child) = self.node_for(child_iri) else {
                    continue;
                };
                self.link(&mut graph, &child, &parent);
                if visited_down.insert(child_iri.as_str()) {
                    down.push(child_iri.as_str());
                    up.push(child_iri.as_str());
                }
            }
        }

        // Parents of the root and of every subclass
        while let Some(iri) = up.pop() {
            if !visited_up.insert(iri) {
                continue;
            }
            let Some(child) = self.node_for(iri).or_else(|| (iri == root_iri).then(|| root.clone())) else {
                continue;
            };
            for parent_iri in self.index.parents.get(iri).into_iter().flatten() {
                let Some(parent) = self.node_for(parent_iri) else {
                    continue;
                };
                self.link(&mut graph, &child, &parent);
                if !visited_up.contains(parent_iri.as_str()) {
                    up.push(parent_iri.as_str());
                }
            }
        }

        (root.0, graph)
    }
}
