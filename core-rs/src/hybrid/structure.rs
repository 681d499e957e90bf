//! Human-readable views of a hybrid hierarchy: an ASCII tree for the
//! terminal and a GRAPHML document for graph visualization tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::info;

use crate::errors::Result;
use crate::ontology::OntologyGraph;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";

/// (id, attr.name, attr.type) of the node data keys
const NODE_KEYS: [(&str, &str, &str); 4] = [
    ("d0", "label", "string"),
    ("d1", "user_extension", "boolean"),
    ("d2", "represented_as", "string"),
    ("d3", "preferred_id", "string"),
];

/// Children drawn under `key`: a class with several parents is drawn once,
/// under its first parent
fn tree_children<'a>(graph: &'a OntologyGraph, key: &str) -> Vec<&'a str> {
    graph
        .children(key)
        .filter(|child| graph.parents(child).next() == Some(key))
        .collect()
}

/// Render the hierarchy as an indented tree, starting from `root` and
/// followed by any other parentless classes
pub fn render_tree(graph: &OntologyGraph, root: &str, ontology_count: usize) -> String {
    let noun = if ontology_count == 1 { "ontology" } else { "ontologies" };
    let mut out = format!(
        "Showing ontology structure based on {} {}:\n",
        ontology_count, noun
    );

    let mut roots: Vec<&str> = Vec::new();
    if graph.has_node(root) {
        roots.push(root);
    }
    roots.extend(graph.roots().into_iter().filter(|r| *r != root));

    for top in roots {
        out.push_str(top);
        out.push('\n');

        // (class, prefix, last sibling?)
        let mut stack: Vec<(&str, String, bool)> = Vec::new();
        push_children(&mut stack, tree_children(graph, top), String::new());

        while let Some((key, prefix, last)) = stack.pop() {
            let branch = if last { "└── " } else { "├── " };
            out.push_str(&prefix);
            out.push_str(branch);
            out.push_str(key);
            out.push('\n');

            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            push_children(&mut stack, tree_children(graph, key), child_prefix);
        }
    }

    out
}

fn push_children<'a>(stack: &mut Vec<(&'a str, String, bool)>, children: Vec<&'a str>, prefix: String) {
    let count = children.len();
    // Reversed so the first child is popped first
    for (i, child) in children.into_iter().enumerate().rev() {
        stack.push((child, prefix.clone(), i + 1 == count));
    }
}

fn write_data<W: Write>(writer: &mut Writer<W>, key: &str, value: &str) -> Result<()> {
    let mut data = BytesStart::new("data");
    data.push_attribute(("key", key));
    writer.write_event(Event::Start(data))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new("data")))?;
    Ok(())
}

/// Write the graph as GRAPHML. Edges run from child (source) to parent
/// (target).
pub fn write_graphml<W: Write>(graph: &OntologyGraph, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut graphml = BytesStart::new("graphml");
    graphml.push_attribute(("xmlns", GRAPHML_NS));
    writer.write_event(Event::Start(graphml))?;

    for (id, name, kind) in NODE_KEYS {
        let mut key = BytesStart::new("key");
        key.push_attribute(("id", id));
        key.push_attribute(("for", "node"));
        key.push_attribute(("attr.name", name));
        key.push_attribute(("attr.type", kind));
        writer.write_event(Event::Empty(key))?;
    }

    let mut graph_el = BytesStart::new("graph");
    graph_el.push_attribute(("id", "G"));
    graph_el.push_attribute(("edgedefault", "directed"));
    writer.write_event(Event::Start(graph_el))?;

    for (key, node) in graph.nodes() {
        let mut node_el = BytesStart::new("node");
        node_el.push_attribute(("id", key));
        writer.write_event(Event::Start(node_el))?;

        write_data(&mut writer, "d0", &node.label)?;
        write_data(&mut writer, "d1", if node.user_extension { "true" } else { "false" })?;
        if let Some(schema) = &node.schema {
            write_data(&mut writer, "d2", &schema.represented_as.to_string())?;
            write_data(&mut writer, "d3", &schema.preferred_id)?;
        }

        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }

    for (i, (child, parent)) in graph.edges().enumerate() {
        let id = format!("e{}", i);
        let mut edge = BytesStart::new("edge");
        edge.push_attribute(("id", id.as_str()));
        edge.push_attribute(("source", child));
        edge.push_attribute(("target", parent));
        writer.write_event(Event::Empty(edge))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;
    Ok(())
}

pub fn write_graphml_file<P: AsRef<Path>>(graph: &OntologyGraph, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut out = BufWriter::new(File::create(path)?);
    write_graphml(graph, &mut out)?;
    out.flush()?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "wrote GRAPHML"
    );
    Ok(())
}
