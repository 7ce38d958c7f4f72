use crate::error::{Error, Result};
use crate::ir::{DescribedGraph, Edge, Geometry, Node, PositionedGraph, PositionedNode};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static NODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*([A-Za-z0-9_:-]+)\s+"([^"]*)"\s*$"#).unwrap());
static EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_:-]+)\s*->\s*([A-Za-z0-9_:-]+)\s*:\s*(.+)\s*$").unwrap()
});
static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[A-Za-z0-9_:-]+\s*)?\{\s*$|^\s*\}\s*$").unwrap());

/// A non-blank line that was neither a declaration nor a block delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredLine {
    /// 1-based line number in the input.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct ParseOutput {
    pub graph: DescribedGraph,
    pub ignored: Vec<IgnoredLine>,
}

/// Parses the line-oriented CRM DSL.
///
/// ```text
/// crm {
/// E22 "E22 Human-Made Object | Vase 123"
/// E42 "E42 Identifier | 123"
/// E22 -> E42 : P1 is identified by
/// }
/// ```
///
/// Every line is matched on its own. Lines that match neither a node nor an
/// edge are dropped; the ones that are not block delimiters are reported in
/// [`ParseOutput::ignored`] so callers can surface likely typos.
pub fn parse_dsl(input: &str) -> ParseOutput {
    let mut output = ParseOutput::default();

    for (idx, line) in input.lines().enumerate() {
        if let Some(node) = parse_node_line(line) {
            output.graph.nodes.push(node);
            continue;
        }
        if let Some(edge) = parse_edge_line(line) {
            output.graph.edges.push(edge);
            continue;
        }
        if line.trim().is_empty() || BLOCK_RE.is_match(line) {
            continue;
        }
        warn!(line = idx + 1; "Ignoring unrecognized DSL line: {}", line.trim());
        output.ignored.push(IgnoredLine {
            line: idx + 1,
            text: line.to_string(),
        });
    }

    debug!(
        nodes = output.graph.nodes.len(),
        edges = output.graph.edges.len(),
        ignored = output.ignored.len();
        "Parsed DSL"
    );
    output
}

fn parse_node_line(line: &str) -> Option<Node> {
    let caps = NODE_RE.captures(line)?;
    Some(Node::from_label(&caps[1], &caps[2]))
}

fn parse_edge_line(line: &str) -> Option<Edge> {
    let caps = EDGE_RE.captures(line)?;
    let label = caps[3].trim().to_string();
    Some(Edge::new(&caps[1], &caps[2], Some(label)))
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: Scalar,
    #[serde(default)]
    label: Option<Scalar>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(default)]
    id: Option<Scalar>,
    #[serde(default)]
    from: Option<Scalar>,
    #[serde(default)]
    source: Option<Scalar>,
    #[serde(default)]
    to: Option<Scalar>,
    #[serde(default)]
    target: Option<Scalar>,
    #[serde(default)]
    label: Option<Scalar>,
}

/// Ids and labels arrive as strings or bare numbers depending on the layout tool.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Parses an already-positioned graph payload.
///
/// Accepts `from`/`to` or `source`/`target` for edge endpoints; an edge
/// missing either endpoint is dropped. Missing geometry falls back to
/// `x = y = 0`, `width = 180`, `height = 80`.
/// JSON5 is accepted when the input is not strict JSON.
pub fn parse_positioned(input: &str) -> Result<PositionedGraph> {
    let raw: RawPayload = match serde_json::from_str(input) {
        Ok(raw) => raw,
        Err(json_err) => json5::from_str(input)
            .map_err(|_| Error::Payload(json_err.to_string()))?,
    };
    positioned_from_raw(raw)
}

pub fn positioned_from_value(value: serde_json::Value) -> Result<PositionedGraph> {
    let raw: RawPayload =
        serde_json::from_value(value).map_err(|err| Error::Payload(err.to_string()))?;
    positioned_from_raw(raw)
}

fn positioned_from_raw(raw: RawPayload) -> Result<PositionedGraph> {
    let mut graph = PositionedGraph::new();

    for node in raw.nodes {
        let defaults = Geometry::default();
        let geometry = Geometry {
            x: node.x.unwrap_or(defaults.x),
            y: node.y.unwrap_or(defaults.y),
            width: node.width.unwrap_or(defaults.width),
            height: node.height.unwrap_or(defaults.height),
        };
        graph.nodes.push(PositionedNode::new(
            node.id.into_string(),
            node.label.map(Scalar::into_string).unwrap_or_default(),
            geometry,
        ));
    }

    for (idx, edge) in raw.edges.into_iter().enumerate() {
        let (Some(from), Some(to)) = (
            endpoint(edge.from, edge.source),
            endpoint(edge.to, edge.target),
        ) else {
            warn!(edge = idx; "Skipping edge without both endpoints");
            continue;
        };
        let mut parsed = Edge::new(from, to, edge.label.map(Scalar::into_string));
        if let Some(id) = edge.id {
            parsed = parsed.with_id(id.into_string());
        }
        graph.edges.push(parsed);
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len();
        "Parsed positioned graph"
    );
    Ok(graph)
}

fn endpoint(primary: Option<Scalar>, alias: Option<Scalar>) -> Option<String> {
    primary
        .map(Scalar::into_string)
        .filter(|value| !value.is_empty())
        .or_else(|| alias.map(Scalar::into_string))
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VASE: &str = r#"crm {
E22 "E22 Human-Made Object | Vase 123"
E42 "E42 Identifier | 123"
E22 -> E42 : P1 is identified by
}"#;

    #[test]
    fn parse_reference_example() {
        let parsed = parse_dsl(VASE);
        let graph = &parsed.graph;
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0], Node::new("E22", "E22 Human-Made Object", "Vase 123"));
        assert_eq!(graph.nodes[1], Node::new("E42", "E42 Identifier", "123"));
        assert_eq!(graph.edges.len(), 1);
        let edge = &graph.edges[0];
        assert_eq!(edge.id, "E22-E42-P1 is identified by");
        assert_eq!(edge.from, "E22");
        assert_eq!(edge.to, "E42");
        assert_eq!(edge.label.as_deref(), Some("P1 is identified by"));
        assert!(parsed.ignored.is_empty());
    }

    #[test]
    fn parse_class_only_node() {
        let parsed = parse_dsl("E21 \"E21 Person\"");
        assert_eq!(parsed.graph.nodes[0].top, "E21 Person");
        assert_eq!(parsed.graph.nodes[0].bottom, "");
    }

    #[test]
    fn parse_splits_at_first_pipe() {
        let parsed = parse_dsl("n1 \"A | B | C\"");
        assert_eq!(parsed.graph.nodes[0].top, "A");
        assert_eq!(parsed.graph.nodes[0].bottom, "B | C");
    }

    #[test]
    fn parse_tolerates_whitespace_and_identifier_alphabet() {
        let input = "   x:1-a_b   \"  Top|Bottom  \"   \n\tx:1-a_b->y_2 :   has part   ";
        let parsed = parse_dsl(input);
        assert_eq!(parsed.graph.nodes[0].id, "x:1-a_b");
        assert_eq!(parsed.graph.nodes[0].top, "Top");
        assert_eq!(parsed.graph.nodes[0].bottom, "Bottom");
        assert_eq!(parsed.graph.edges[0].to, "y_2");
        assert_eq!(parsed.graph.edges[0].label.as_deref(), Some("has part"));
    }

    #[test]
    fn parse_keeps_duplicate_edges_in_order() {
        let input = "A -> B : P1\nA -> B : P2\nA -> B : P1";
        let parsed = parse_dsl(input);
        let labels: Vec<_> = parsed
            .graph
            .edges
            .iter()
            .map(|edge| edge.label.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(labels, ["P1", "P2", "P1"]);
    }

    #[test]
    fn parse_reports_malformed_lines_but_not_delimiters() {
        let input = "crm {\nE22 \"unterminated\nE22 -> : missing target\n\n}\n{";
        let parsed = parse_dsl(input);
        assert!(parsed.graph.nodes.is_empty());
        assert!(parsed.graph.edges.is_empty());
        let lines: Vec<_> = parsed.ignored.iter().map(|line| line.line).collect();
        assert_eq!(lines, [2, 3]);
    }

    #[test]
    fn parse_rejects_quote_inside_label() {
        let parsed = parse_dsl(r#"A "say "hi"""#);
        assert!(parsed.graph.nodes.is_empty());
        assert_eq!(parsed.ignored.len(), 1);
    }

    #[test]
    fn positioned_payload_accepts_both_endpoint_spellings() {
        let input = r#"{
            "nodes": [
                {"id": "a", "label": "E22 Object | Vase", "x": 10, "y": 20, "width": 260, "height": 60},
                {"id": 7, "label": "E55 Type"}
            ],
            "edges": [
                {"id": "e1", "from": "a", "to": "7", "label": "P2 has type"},
                {"source": "7", "target": "a"}
            ]
        }"#;
        let graph = parse_positioned(input).unwrap();
        assert_eq!(graph.nodes[0].geometry.width, 260.0);
        assert_eq!(graph.nodes[1].id, "7");
        assert_eq!(graph.nodes[1].geometry, Geometry::default());
        assert_eq!(graph.edges[0].id, "e1");
        assert_eq!(graph.edges[1].from, "7");
        assert_eq!(graph.edges[1].to, "a");
        assert_eq!(graph.edges[1].id, "7-a");
        assert_eq!(graph.edges[1].label, None);
    }

    #[test]
    fn positioned_payload_accepts_json5() {
        let input = "{nodes: [{id: 'a', label: 'A', x: 1,},], edges: []}";
        let graph = parse_positioned(input).unwrap();
        assert_eq!(graph.nodes[0].geometry.x, 1.0);
    }

    #[test]
    fn positioned_payload_drops_edges_without_endpoints() {
        let value = serde_json::json!({
            "nodes": [{"id": "a", "label": "A"}, {"id": "b", "label": "B"}],
            "edges": [
                {"from": "a", "to": "b", "label": "P1"},
                {"from": "a", "label": "P2"},
                {"target": "b"}
            ]
        });
        let graph = positioned_from_value(value).unwrap();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].id, "a-b-P1");
    }

    #[test]
    fn positioned_payload_accepts_numeric_labels() {
        let value = serde_json::json!({
            "nodes": [{"id": "a", "label": 123}, {"id": "b", "label": "B"}],
            "edges": [{"from": "a", "to": "b", "label": 42}]
        });
        let graph = positioned_from_value(value).unwrap();
        assert_eq!(graph.nodes[0].label, "123");
        assert_eq!(graph.edges[0].label.as_deref(), Some("42"));
        assert_eq!(graph.edges[0].id, "a-b-42");
    }

    #[test]
    fn positioned_payload_rejects_garbage() {
        assert!(matches!(
            parse_positioned("not a graph"),
            Err(Error::Payload(_))
        ));
    }
}
