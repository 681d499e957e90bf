//! Explicit is-a graph for ontology classes
//!
//! Nodes are keyed by their normalized label. Edges point from child to parent
//! (`subClassOf` direction), so walking parents goes toward the root.
//! Parent and child sets keep insertion order: the first parent recorded for a
//! class is its primary parent.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::errors::{BiokgError, Result};
use crate::mapping::ExtendedSchemaEntry;

/// Attributes carried by a class in the graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyNode {
    /// Inverse of the node key: the source identifier, or the PascalCase
    /// display form for classes synthesized from the schema
    pub label: String,

    /// Set for classes that exist only because the schema introduced them
    #[serde(default)]
    pub user_extension: bool,

    /// Schema declaration merged onto this class, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ExtendedSchemaEntry>,
}

impl OntologyNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Node synthesized from a schema declaration
    pub fn user_extension(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            user_extension: true,
            schema: None,
        }
    }
}

/// How attributes of a node present in both graphs are reconciled by
/// [`OntologyGraph::compose`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// Attributes of the composed-in graph overwrite existing ones
    #[default]
    LastWriterWins,
    /// Differing attributes on a shared node are an error
    Strict,
}

/// Directed class hierarchy with string keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "GraphRecord", into = "GraphRecord")]
pub struct OntologyGraph {
    nodes: IndexMap<String, OntologyNode>,
    parents: IndexMap<String, IndexSet<String>>,
    children: IndexMap<String, IndexSet<String>>,
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Serialized form: nodes plus a flat child→parent edge list
#[derive(Serialize, Deserialize)]
struct GraphRecord {
    nodes: IndexMap<String, OntologyNode>,
    edges: Vec<(String, String)>,
}

impl From<GraphRecord> for OntologyGraph {
    fn from(record: GraphRecord) -> Self {
        let mut graph = OntologyGraph::new();
        for (key, node) in record.nodes {
            graph.upsert_node(key, node);
        }
        for (child, parent) in record.edges {
            graph.add_edge(&child, &parent);
        }
        graph
    }
}

impl From<OntologyGraph> for GraphRecord {
    fn from(graph: OntologyGraph) -> Self {
        let edges = graph
            .edges()
            .map(|(c, p)| (c.to_string(), p.to_string()))
            .collect();
        GraphRecord {
            nodes: graph.nodes,
            edges,
        }
    }
}

impl PartialEq for OntologyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.parents == other.parents
    }
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.parents.values().map(IndexSet::len).sum()
    }

    pub fn has_node(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn has_edge(&self, child: &str, parent: &str) -> bool {
        self.parents
            .get(child)
            .map_or(false, |parents| parents.contains(parent))
    }

    pub fn node(&self, key: &str) -> Option<&OntologyNode> {
        self.nodes.get(key)
    }

    /// The stored key equal to `key`, borrowed from the graph
    pub fn key(&self, key: &str) -> Option<&str> {
        self.nodes.get_key_value(key).map(|(k, _)| k.as_str())
    }

    pub fn node_mut(&mut self, key: &str) -> Option<&mut OntologyNode> {
        self.nodes.get_mut(key)
    }

    /// Node keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &OntologyNode)> {
        self.nodes.iter().map(|(k, n)| (k.as_str(), n))
    }

    /// All (child, parent) pairs
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parents.iter().flat_map(|(child, parents)| {
            parents.iter().map(move |parent| (child.as_str(), parent.as_str()))
        })
    }

    pub fn parents(&self, key: &str) -> impl Iterator<Item = &str> {
        self.parents
            .get(key)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub fn children(&self, key: &str) -> impl Iterator<Item = &str> {
        self.children
            .get(key)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Nodes without parents
    pub fn roots(&self) -> Vec<&str> {
        self.keys()
            .filter(|key| self.parents(key).next().is_none())
            .collect()
    }

    /// Add a node if it is absent. Returns false if the key already existed,
    /// in which case the existing attributes are left untouched.
    pub fn add_node(&mut self, key: impl Into<String>, node: OntologyNode) -> bool {
        let key = key.into();
        if self.nodes.contains_key(&key) {
            return false;
        }
        self.nodes.insert(key, node);
        true
    }

    /// Insert or replace a node's attributes, keeping its edges
    pub fn upsert_node(&mut self, key: impl Into<String>, node: OntologyNode) {
        self.nodes.insert(key.into(), node);
    }

    /// Add a child→parent edge. Missing endpoints are created with their key
    /// as label.
    pub fn add_edge(&mut self, child: &str, parent: &str) {
        if !self.has_node(child) {
            self.nodes.insert(child.to_string(), OntologyNode::new(child));
        }
        if !self.has_node(parent) {
            self.nodes.insert(parent.to_string(), OntologyNode::new(parent));
        }
        self.parents
            .entry(child.to_string())
            .or_default()
            .insert(parent.to_string());
        self.children
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
    }

    /// True if adding `child → parent` would close a directed cycle
    pub fn would_create_cycle(&self, child: &str, parent: &str) -> bool {
        if child == parent {
            return true;
        }
        self.ancestors(parent)
            .map_or(false, |ancestors| ancestors.iter().any(|a| a == child))
    }

    /// Depth-first pre-order walk toward the root(s), starting with `key`
    /// itself. `None` if the key is absent.
    pub fn ancestors(&self, key: &str) -> Option<Vec<String>> {
        if !self.has_node(key) {
            return None;
        }
        Some(self.preorder(key, Direction::Up))
    }

    /// Depth-first pre-order walk away from the root, starting with `key`.
    pub fn descendants(&self, key: &str) -> Option<Vec<String>> {
        if !self.has_node(key) {
            return None;
        }
        Some(self.preorder(key, Direction::Down))
    }

    fn preorder(&self, start: &str, direction: Direction) -> Vec<String> {
        let adjacency = match direction {
            Direction::Up => &self.parents,
            Direction::Down => &self.children,
        };
        let mut order = Vec::new();
        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut stack: Vec<&str> = vec![start];

        while let Some(key) = stack.pop() {
            if !seen.insert(key) {
                continue;
            }
            order.push(key.to_string());
            // Reverse so the first neighbour is visited first
            if let Some(neighbours) = adjacency.get(key) {
                for n in neighbours.iter().rev() {
                    if !seen.contains(n.as_str()) {
                        stack.push(n.as_str());
                    }
                }
            }
        }

        order
    }

    /// Induced subgraph over the given keys (unknown keys are ignored)
    pub fn subgraph<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> OntologyGraph {
        let keep: IndexSet<&str> = keys.into_iter().filter(|k| self.has_node(k)).collect();
        let mut sub = OntologyGraph::new();

        // Preserve the original node order
        for (key, node) in self.nodes() {
            if keep.contains(key) {
                sub.upsert_node(key, node.clone());
            }
        }
        for (child, parent) in self.edges() {
            if keep.contains(child) && keep.contains(parent) {
                sub.add_edge(child, parent);
            }
        }

        sub
    }

    /// Union of two graphs. Nodes present in both take `other`'s attributes
    /// under [`CompositionPolicy::LastWriterWins`]; under
    /// [`CompositionPolicy::Strict`] differing attributes are an error.
    pub fn compose(&self, other: &OntologyGraph, policy: CompositionPolicy) -> Result<OntologyGraph> {
        let mut merged = self.clone();

        for (key, node) in other.nodes() {
            if let Some(existing) = merged.node(key) {
                if policy == CompositionPolicy::Strict && existing != node {
                    return Err(BiokgError::AttributeConflict(key.to_string()));
                }
            }
            merged.upsert_node(key, node.clone());
        }
        for (child, parent) in other.edges() {
            merged.add_edge(child, parent);
        }

        Ok(merged)
    }

    /// Rename a node, rewriting every edge that touches it. If `to` already
    /// exists the two nodes are merged: edges are united and the renamed
    /// node's attributes replace those of `to`.
    pub fn relabel(&self, from: &str, to: &str) -> OntologyGraph {
        if from == to || !self.has_node(from) {
            return self.clone();
        }

        let rename = |key: &str| -> String {
            if key == from {
                to.to_string()
            } else {
                key.to_string()
            }
        };

        let mut out = OntologyGraph::new();
        for (key, node) in self.nodes() {
            if key == to {
                // Merged below, after the renamed node's slot is known
                if !out.has_node(to) {
                    out.upsert_node(to, node.clone());
                }
                continue;
            }
            out.upsert_node(rename(key), node.clone());
        }
        for (child, parent) in self.edges() {
            let (child, parent) = (rename(child), rename(parent));
            if child != parent {
                out.add_edge(&child, &parent);
            }
        }

        out
    }

    /// Some node on a directed cycle, if one exists
    pub fn find_cycle(&self) -> Option<String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }

        let mut marks: IndexMap<&str, Mark> = IndexMap::new();

        for start in self.keys() {
            if marks.contains_key(start) {
                continue;
            }
            // Explicit stack of (node, expanded?) frames
            let mut stack: Vec<(&str, bool)> = vec![(start, false)];
            while let Some((key, expanded)) = stack.pop() {
                if expanded {
                    marks.insert(key, Mark::Done);
                    continue;
                }
                match marks.get(key) {
                    Some(Mark::Done) => continue,
                    Some(Mark::Open) => continue,
                    None => {}
                }
                marks.insert(key, Mark::Open);
                stack.push((key, true));
                for parent in self.parents(key) {
                    match marks.get(parent) {
                        Some(Mark::Open) => return Some(parent.to_string()),
                        Some(Mark::Done) => {}
                        None => stack.push((parent, false)),
                    }
                }
            }
        }

        None
    }
}
