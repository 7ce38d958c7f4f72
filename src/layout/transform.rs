use crate::ir::{Geometry, PositionedNode};

use super::types::Rect;

pub const DEFAULT_MARGIN_RATIO: f64 = 0.05;
/// Global shrink applied on top of the fitted scale.
pub const GLOBAL_SHRINK: f64 = 0.5;
/// Displayed node height is inflated by this factor to fit two label rows.
pub const HEIGHT_INFLATION: f64 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformPolicy {
    pub margin_ratio: f64,
    pub shrink: f64,
    pub height_inflation: f64,
}

impl Default for TransformPolicy {
    fn default() -> Self {
        Self {
            margin_ratio: DEFAULT_MARGIN_RATIO,
            shrink: GLOBAL_SHRINK,
            height_inflation: HEIGHT_INFLATION,
        }
    }
}

/// Affine map from an arbitrary input coordinate space onto a fixed canvas.
///
/// The bounding box is taken over node origins only. One uniform scale is
/// used for both axes so the input keeps its aspect ratio; all outputs are
/// floored to whole canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTransform {
    pub canvas_width: i64,
    pub canvas_height: i64,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub margin_x: f64,
    pub margin_y: f64,
    pub scale: f64,
    pub height_inflation: f64,
}

impl LayoutTransform {
    pub fn new(
        canvas_width: i64,
        canvas_height: i64,
        nodes: &[PositionedNode],
        margin_ratio: f64,
    ) -> Self {
        let policy = TransformPolicy {
            margin_ratio,
            ..TransformPolicy::default()
        };
        Self::with_policy(
            canvas_width,
            canvas_height,
            nodes.iter().map(|node| (node.geometry.x, node.geometry.y)),
            policy,
        )
    }

    pub fn with_policy(
        canvas_width: i64,
        canvas_height: i64,
        positions: impl IntoIterator<Item = (f64, f64)>,
        policy: TransformPolicy,
    ) -> Self {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (x, y) in positions {
            bounds = Some(match bounds {
                None => (x, x, y, y),
                Some((min_x, max_x, min_y, max_y)) => {
                    (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y))
                }
            });
        }
        let (min_x, max_x, min_y, max_y) = bounds.unwrap_or((0.0, 0.0, 0.0, 0.0));

        let margin_x = canvas_width as f64 * policy.margin_ratio;
        let margin_y = canvas_height as f64 * policy.margin_ratio;

        let span_x = non_degenerate(max_x - min_x);
        let span_y = non_degenerate(max_y - min_y);

        let usable_width = canvas_width as f64 - 2.0 * margin_x;
        let usable_height = canvas_height as f64 - 2.0 * margin_y;

        let scale = (usable_width / span_x).min(usable_height / span_y) * policy.shrink;

        Self {
            canvas_width,
            canvas_height,
            min_x,
            max_x,
            min_y,
            max_y,
            margin_x,
            margin_y,
            scale,
            height_inflation: policy.height_inflation,
        }
    }

    pub fn to_canvas_x(&self, x: f64) -> i64 {
        floor(self.margin_x + (x - self.min_x) * self.scale)
    }

    pub fn to_canvas_y(&self, y: f64) -> i64 {
        floor(self.margin_y + (y - self.min_y) * self.scale)
    }

    pub fn to_canvas_size(&self, width: f64, height: f64) -> (i64, i64) {
        (
            floor(width * self.scale),
            floor(height * self.scale * self.height_inflation),
        )
    }

    pub fn to_canvas_rect(&self, geometry: &Geometry) -> Rect {
        let (width, height) = self.to_canvas_size(geometry.width, geometry.height);
        Rect::new(
            self.to_canvas_x(geometry.x),
            self.to_canvas_y(geometry.y),
            width,
            height,
        )
    }
}

fn non_degenerate(span: f64) -> f64 {
    if span == 0.0 || !span.is_finite() {
        1.0
    } else {
        span
    }
}

/// Largest magnitude a canvas coordinate may take. Far beyond any real
/// canvas, small enough that sums of a few coordinates cannot overflow.
pub const CANVAS_LIMIT: i64 = 1 << 48;

fn floor(value: f64) -> i64 {
    (value.floor() as i64).clamp(-CANVAS_LIMIT, CANVAS_LIMIT)
}
