mod placement;
mod transform;
mod types;

pub use placement::{EdgeShape, LabelBox, NodeShape, Placement, choose_sites, place};
pub use transform::{
    CANVAS_LIMIT, DEFAULT_MARGIN_RATIO, GLOBAL_SHRINK, HEIGHT_INFLATION, LayoutTransform,
    TransformPolicy,
};
pub use types::{Point, Rect, Site};

use crate::config::{PlacementConfig, RenderConfig};
use crate::ir::PositionedGraph;

impl From<&PlacementConfig> for TransformPolicy {
    fn from(config: &PlacementConfig) -> Self {
        Self {
            margin_ratio: config.margin_ratio,
            shrink: config.shrink,
            height_inflation: config.height_inflation,
        }
    }
}

/// Fits `graph` onto the configured canvas and places its shapes.
pub fn compute_placement(
    graph: &PositionedGraph,
    placement: &PlacementConfig,
    render: &RenderConfig,
) -> Placement {
    let transform = LayoutTransform::with_policy(
        render.canvas_width,
        render.canvas_height,
        graph
            .nodes
            .iter()
            .map(|node| (node.geometry.x, node.geometry.y)),
        TransformPolicy::from(placement),
    );
    place(graph, &transform, placement)
}
