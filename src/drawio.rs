use std::collections::HashMap;

use crate::ir::PositionedGraph;
use crate::render::escape_xml;

/// Serializes a positioned graph as a draw.io `mxfile`.
///
/// Cells `0` and `1` are the root and default layer. Nodes and then edges
/// take sequential ids from `2`; an edge with a dangling endpoint is left out
/// but keeps its id slot. Geometry is copied as is.
pub fn to_drawio_xml(graph: &PositionedGraph) -> String {
    let mut next_id = 2usize;
    let mut cell_ids: HashMap<&str, String> = HashMap::new();
    for node in &graph.nodes {
        cell_ids.insert(node.id.as_str(), next_id.to_string());
        next_id += 1;
    }
    let edge_ids: Vec<String> = graph
        .edges
        .iter()
        .map(|_| {
            let id = next_id.to_string();
            next_id += 1;
            id
        })
        .collect();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<mxfile host=\"app.diagrams.net\">\n");
    xml.push_str("  <diagram id=\"diagram-1\" name=\"Page-1\">\n");
    xml.push_str("    <mxGraphModel>\n");
    xml.push_str("      <root>\n");
    xml.push_str("        <mxCell id=\"0\"/>\n");
    xml.push_str("        <mxCell id=\"1\" parent=\"0\"/>\n");

    for (idx, node) in graph.nodes.iter().enumerate() {
        let geometry = &node.geometry;
        xml.push_str(&format!(
            "        <mxCell id=\"{}\" value=\"{}\" style=\"rounded=1;whiteSpace=wrap;html=1;\" vertex=\"1\" parent=\"1\">\n",
            idx + 2,
            escape_xml(&node.label)
        ));
        xml.push_str(&format!(
            "          <mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n",
            geometry.x, geometry.y, geometry.width, geometry.height
        ));
        xml.push_str("        </mxCell>\n");
    }

    for (edge, edge_id) in graph.edges.iter().zip(&edge_ids) {
        let (Some(source), Some(target)) = (
            cell_ids.get(edge.from.as_str()),
            cell_ids.get(edge.to.as_str()),
        ) else {
            continue;
        };
        xml.push_str(&format!(
            "        <mxCell id=\"{edge_id}\" value=\"{}\" style=\"endArrow=block;endFill=1;html=1;\" edge=\"1\" parent=\"1\" source=\"{source}\" target=\"{target}\">\n",
            escape_xml(edge.label.as_deref().unwrap_or_default())
        ));
        xml.push_str("          <mxGeometry relative=\"1\" as=\"geometry\"/>\n");
        xml.push_str("        </mxCell>\n");
    }

    xml.push_str("      </root>\n");
    xml.push_str("    </mxGraphModel>\n");
    xml.push_str("  </diagram>\n");
    xml.push_str("</mxfile>\n");
    xml
}
