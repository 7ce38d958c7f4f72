use serde::{Deserialize, Serialize};

/// Splits a combined `"top | bottom"` label at the first `|`.
///
/// Both halves are trimmed; a label without `|` yields an empty bottom.
pub fn split_label(text: &str) -> (String, String) {
    match text.split_once('|') {
        Some((top, bottom)) => (top.trim().to_string(), bottom.trim().to_string()),
        None => (text.trim().to_string(), String::new()),
    }
}

/// A node declared without geometry, as produced by the DSL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub top: String,
    pub bottom: String,
}

impl Node {
    pub fn new(id: impl Into<String>, top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    pub fn from_label(id: impl Into<String>, label: &str) -> Self {
        let (top, bottom) = split_label(label);
        Self::new(id, top, bottom)
    }

    /// Class-only nodes render as a single cell.
    pub fn is_class_only(&self) -> bool {
        self.bottom.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub const DEFAULT_WIDTH: f64 = 180.0;
    pub const DEFAULT_HEIGHT: f64 = 80.0;
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// A node that already carries coordinates from an external layout step.
///
/// The label is kept in its combined `"top | bottom"` form because the
/// shape scene displays it as one text frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub geometry: Geometry,
}

impl PositionedNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            geometry,
        }
    }

    /// Text shown inside the node shape: every `|` becomes a blank line.
    pub fn display_label(&self) -> String {
        self.label.replace('|', "\n\n").trim().to_string()
    }

    pub fn to_node(&self) -> Node {
        Node::from_label(self.id.clone(), &self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

impl Edge {
    /// Builds an edge whose id is derived from its endpoints and label.
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: Option<String>) -> Self {
        let from = from.into();
        let to = to.into();
        let label = label.filter(|label| !label.is_empty());
        let id = Self::derive_id(&from, &to, label.as_deref());
        Self {
            id,
            from,
            to,
            label,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn derive_id(from: &str, to: &str, label: Option<&str>) -> String {
        match label {
            Some(label) => format!("{from}-{to}-{label}"),
            None => format!("{from}-{to}"),
        }
    }
}

/// Nodes and edges in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph<N> {
    pub nodes: Vec<N>,
    pub edges: Vec<Edge>,
}

pub type DescribedGraph = Graph<Node>;
pub type PositionedGraph = Graph<PositionedNode>;

impl<N> Graph<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl DescribedGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

impl PositionedGraph {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Drops geometry, splitting each combined label into top and bottom.
    pub fn to_described(&self) -> DescribedGraph {
        Graph {
            nodes: self.nodes.iter().map(PositionedNode::to_node).collect(),
            edges: self.edges.clone(),
        }
    }
}

/// Either flavour of graph, depending on where the input came from.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyGraph {
    Described(DescribedGraph),
    Positioned(PositionedGraph),
}

impl AnyGraph {
    pub fn node_count(&self) -> usize {
        match self {
            Self::Described(graph) => graph.nodes.len(),
            Self::Positioned(graph) => graph.nodes.len(),
        }
    }

    pub fn edges(&self) -> &[Edge] {
        match self {
            Self::Described(graph) => &graph.edges,
            Self::Positioned(graph) => &graph.edges,
        }
    }

    /// The graph without geometry; positioned labels are split at `|`.
    pub fn described(&self) -> DescribedGraph {
        match self {
            Self::Described(graph) => graph.clone(),
            Self::Positioned(graph) => graph.to_described(),
        }
    }

    pub fn positioned(&self) -> Option<&PositionedGraph> {
        match self {
            Self::Described(_) => None,
            Self::Positioned(graph) => Some(graph),
        }
    }
}
