//! Graphviz DOT rendering of the AST.
//!
//! Ids are assigned in pre-order (parent before children, children in source
//! order), so the same tree always renders to the same text.

use std::fmt;

use parse::{Node, TranslationUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: usize,
    pub label: String,
    // child ids in source order
    pub children: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub name: String,
    // indexed by id
    pub nodes: Vec<GraphNode>,
}

impl Graph {
    pub fn build(name: &str, root: Node<'_>) -> Self {
        let mut nodes: Vec<GraphNode> = Vec::new();
        // (node, parent id)
        let mut stack = vec![(root, None::<usize>)];
        while let Some((node, parent)) = stack.pop() {
            let id = nodes.len();
            nodes.push(GraphNode { id, label: label(&node), children: Vec::new() });
            if let Some(p) = parent {
                nodes[p].children.push(id);
            }
            let kids = node.children();
            stack.extend(kids.into_iter().rev().map(|k| (k, Some(id))));
        }
        log::debug!("graph `{}`: {} nodes", name, nodes.len());
        Self { name: name.to_string(), nodes }
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Writes `digraph <name> { ... }`; every node statement is followed by
    /// the edges to its children.
    pub fn render(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "digraph {} {{", graph_id(&self.name))?;
        for n in &self.nodes {
            writeln!(out, "  n{} [label=\"{}\"];", n.id, escape(&n.label))?;
            for c in &n.children {
                writeln!(out, "  n{} -> n{};", n.id, c)?;
            }
        }
        out.write_str("}\n")
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}

/// `Kind` or `Kind: attribute`.
pub fn label(node: &Node<'_>) -> String {
    let kind = node.kind().name();
    match node.attribute() {
        Some(attr) if !attr.is_empty() => format!("{}: {}", kind, attr),
        _ => kind.to_string(),
    }
}

/// Escapes text for use inside a double-quoted DOT string.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

// Bare DOT identifier when possible, quoted string otherwise.
fn graph_id(name: &str) -> String {
    let bare = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !matches!(name.to_ascii_lowercase().as_str(), "graph" | "digraph" | "node" | "edge" | "strict" | "subgraph");
    if bare {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name))
    }
}

/// Builds and renders the graph for a whole translation unit.
pub fn emit_dot(tu: &TranslationUnit, name: &str) -> String {
    Graph::build(name, Node::from(tu)).to_string()
}
