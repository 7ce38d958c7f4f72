use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::config::PlacementConfig;
use crate::ir::PositionedGraph;

use super::transform::LayoutTransform;
use super::types::{Point, Rect, Site};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub node_id: String,
    pub rect: Rect,
    /// Label with each `|` replaced by a blank line.
    pub text: String,
    /// Decorative center line, bound to the left and right sites.
    pub divider: (Point, Point),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeShape {
    pub edge_id: String,
    pub from: String,
    pub to: String,
    pub begin_site: Site,
    pub end_site: Site,
    pub begin: Point,
    pub end: Point,
    pub label: Option<LabelBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelBox {
    pub rect: Rect,
    pub text: String,
}

/// Node and connector geometry on the canvas, in graph order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Placement {
    pub nodes: Vec<NodeShape>,
    pub edges: Vec<EdgeShape>,
}

impl Placement {
    pub fn node(&self, id: &str) -> Option<&NodeShape> {
        self.nodes.iter().rev().find(|node| node.node_id == id)
    }
}

/// Places every node through `transform`, then connects each edge whose
/// endpoints were both placed.
///
/// Edges with a dangling endpoint are skipped. When ids repeat, edges attach
/// to the last node declared with that id.
pub fn place(
    graph: &PositionedGraph,
    transform: &LayoutTransform,
    config: &PlacementConfig,
) -> Placement {
    let mut placement = Placement::default();
    let mut by_id: HashMap<&str, Rect> = HashMap::new();

    for node in &graph.nodes {
        let rect = transform.to_canvas_rect(&node.geometry);
        by_id.insert(node.id.as_str(), rect);
        placement.nodes.push(NodeShape {
            node_id: node.id.clone(),
            rect,
            text: node.display_label(),
            divider: (rect.site(Site::Left), rect.site(Site::Right)),
        });
    }

    for edge in &graph.edges {
        let (Some(src), Some(tgt)) = (
            by_id.get(edge.from.as_str()),
            by_id.get(edge.to.as_str()),
        ) else {
            debug!(edge = edge.id.as_str(); "Skipping edge with unplaced endpoint");
            continue;
        };

        let (begin_site, end_site) = choose_sites(src, tgt);
        let begin = src.site(begin_site);
        let end = tgt.site(end_site);
        let label = edge
            .label
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(|text| label_box(src, tgt, text, config));

        placement.edges.push(EdgeShape {
            edge_id: edge.id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
            begin_site,
            end_site,
            begin,
            end,
            label,
        });
    }

    debug!(
        nodes = placement.nodes.len(),
        edges = placement.edges.len();
        "Placed shapes"
    );
    placement
}

/// Picks the attachment sites from the relative position of the centers.
///
/// Horizontal attachment wins whenever the horizontal distance is at least
/// the vertical one, so exact diagonals attach left/right.
pub fn choose_sites(src: &Rect, tgt: &Rect) -> (Site, Site) {
    let from = src.center();
    let to = tgt.center();
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx.abs() >= dy.abs() {
        if dx >= 0 {
            (Site::Right, Site::Left)
        } else {
            (Site::Left, Site::Right)
        }
    } else if dy >= 0 {
        (Site::Bottom, Site::Top)
    } else {
        (Site::Top, Site::Bottom)
    }
}

/// Centers the label between the two shape centers, sized from their distance.
fn label_box(src: &Rect, tgt: &Rect, text: &str, config: &PlacementConfig) -> LabelBox {
    let from = src.center();
    let to = tgt.center();
    let span_x = to.x.saturating_sub(from.x).unsigned_abs() as f64;
    let span_y = to.y.saturating_sub(from.y).unsigned_abs() as f64;
    let width = ((span_x * config.label_span_ratio).floor() as i64).max(config.label_min_width);
    let height = ((span_y * config.label_span_ratio).floor() as i64).max(config.label_min_height);
    LabelBox {
        rect: Rect::centered(from.midpoint(to), width, height),
        text: text.to_string(),
    }
}
