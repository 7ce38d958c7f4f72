use crate::config::DotConfig;
use crate::ir::{DescribedGraph, Node};
use crate::render::escape_xml;
use crate::theme::Theme;

/// Renders a graph as Graphviz DOT text.
///
/// Nodes are `plaintext` shapes whose HTML-like label is a one- or two-row
/// table; edges carry their relation text as a plain label. Output depends
/// only on the graph and the options, in declaration order.
pub fn to_dot(graph: &DescribedGraph, theme: &Theme, config: &DotConfig) -> String {
    let font = escape_attr(&theme.font_family);
    // `FACE` sits inside HTML-like markup, where only entities escape quotes.
    let face = escape_xml(&theme.font_family);
    let mut lines: Vec<String> = Vec::with_capacity(graph.nodes.len() + graph.edges.len() + 4);
    lines.push("digraph G {".to_string());
    lines.push(format!(
        "  graph [rankdir={}, charset=\"{}\", fontname=\"{font}\"];",
        config.rankdir,
        escape_attr(&config.charset)
    ));
    lines.push(format!(
        "  node [shape=plaintext, margin=\"0,0\", fontname=\"{font}\"];"
    ));

    for node in &graph.nodes {
        lines.push(format!(
            "  {} [label={}];",
            dot_id(&node.id),
            node_table(node, &face, config)
        ));
    }

    for edge in &graph.edges {
        let from = dot_id(&edge.from);
        let to = dot_id(&edge.to);
        match edge.label.as_deref().filter(|label| !label.is_empty()) {
            Some(label) => lines.push(format!(
                "  {from} -> {to} [label=\"{}\"];",
                escape_attr(&escape_html(label))
            )),
            None => lines.push(format!("  {from} -> {to};")),
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn node_table(node: &Node, face: &str, config: &DotConfig) -> String {
    let top = escape_html(&node.top);
    if node.is_class_only() {
        return format!(
            "<
    <TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">
      <TR>
        <TD CELLPADDING=\"{pad}\">
          <FONT FACE=\"{face}\" POINT-SIZE=\"{size}\">{top}</FONT>
        </TD>
      </TR>
    </TABLE>
  >",
            pad = config.single_cell_padding,
            size = config.single_point_size,
        );
    }

    // The top cell draws all four sides; the bottom cell omits its top so the
    // two rows share a single divider.
    let bottom = escape_html(&node.bottom);
    format!(
        "<
    <TABLE BORDER=\"0\" CELLBORDER=\"1\" CELLSPACING=\"0\">
      <TR>
        <TD CELLPADDING=\"{pad}\" SIDES=\"TLRB\">
          <FONT FACE=\"{face}\" POINT-SIZE=\"{top_size}\">{top}</FONT>
        </TD>
      </TR>
      <TR>
        <TD CELLPADDING=\"{pad}\" SIDES=\"BLR\">
          <FONT FACE=\"{face}\" POINT-SIZE=\"{bottom_size}\">{bottom}</FONT>
        </TD>
      </TR>
    </TABLE>
  >",
        pad = config.cell_padding,
        top_size = config.top_point_size,
        bottom_size = config.bottom_point_size,
    )
}

/// Escapes text placed inside HTML-like table markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    input.replace('\\', "\\\\").replace('"', "\\\"")
}

/// DSL identifiers may contain `:` and `-`, which DOT only accepts quoted.
fn dot_id(id: &str) -> String {
    let mut chars = id.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        None => false,
    };
    if plain {
        id.to_string()
    } else {
        format!("\"{}\"", escape_attr(id))
    }
}
