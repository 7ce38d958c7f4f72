//! Shape-creation interface between placement and a document backend.
//!
//! [`emit_scene`] turns a [`Placement`] into a sequence of calls on a
//! [`ShapeSink`]. Backends decide how shapes are stored: [`SceneRecorder`]
//! keeps them as serializable instructions, the SVG writer in
//! [`crate::render`] draws them.

use std::collections::HashMap;

use serde::Serialize;

use crate::config::{EMU_PER_POINT, PlacementConfig};
use crate::error::{Error, Result};
use crate::layout::{Placement, Point, Rect, Site};
use crate::theme::Theme;

/// Handle returned by a sink for a created shape.
pub type ShapeId = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    /// Line width in canvas units.
    pub width: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub content: String,
    /// Font size in canvas units.
    pub size: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundedRect {
    pub rect: Rect,
    pub fill: String,
    pub outline: Stroke,
    pub text: TextStyle,
}

/// Ties a connector end to a connection site so it follows the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub shape: ShapeId,
    pub site: Site,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub begin: Point,
    pub end: Point,
    pub begin_binding: Option<Binding>,
    pub end_binding: Option<Binding>,
    pub stroke: Stroke,
    pub arrow_end: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBox {
    pub rect: Rect,
    pub text: TextStyle,
}

/// Capabilities a document backend offers. Shapes never carry a shadow.
pub trait ShapeSink {
    fn add_rounded_rect(&mut self, shape: &RoundedRect) -> Result<ShapeId>;
    fn add_connector(&mut self, connector: &Connector) -> Result<ShapeId>;
    fn add_text_box(&mut self, text_box: &TextBox) -> Result<ShapeId>;
    fn group(&mut self, members: &[ShapeId]) -> Result<ShapeId>;
}

/// Drives `sink` with every shape of `placement`, nodes first.
pub fn emit_scene<S: ShapeSink + ?Sized>(
    placement: &Placement,
    theme: &Theme,
    config: &PlacementConfig,
    sink: &mut S,
) -> Result<()> {
    let mut shape_ids: HashMap<&str, ShapeId> = HashMap::new();

    for node in &placement.nodes {
        let id = sink.add_rounded_rect(&RoundedRect {
            rect: node.rect,
            fill: theme.node_fill.clone(),
            outline: stroke(&theme.node_border, config.node_line_width),
            text: text(&node.text, config.node_font_size, theme),
        })?;
        sink.add_connector(&Connector {
            begin: node.divider.0,
            end: node.divider.1,
            begin_binding: Some(Binding {
                shape: id,
                site: Site::Left,
            }),
            end_binding: Some(Binding {
                shape: id,
                site: Site::Right,
            }),
            stroke: stroke(&theme.node_border, config.divider_width),
            arrow_end: false,
        })?;
        shape_ids.insert(node.node_id.as_str(), id);
    }

    for edge in &placement.edges {
        let (Some(&from), Some(&to)) = (
            shape_ids.get(edge.from.as_str()),
            shape_ids.get(edge.to.as_str()),
        ) else {
            return Err(Error::Generation(format!(
                "edge `{}` references a shape that was not created",
                edge.edge_id
            )));
        };
        let connector = sink.add_connector(&Connector {
            begin: edge.begin,
            end: edge.end,
            begin_binding: Some(Binding {
                shape: from,
                site: edge.begin_site,
            }),
            end_binding: Some(Binding {
                shape: to,
                site: edge.end_site,
            }),
            stroke: stroke(&theme.line_color, config.connector_width),
            arrow_end: true,
        })?;
        if let Some(label) = &edge.label {
            let text_box = sink.add_text_box(&TextBox {
                rect: label.rect,
                text: text(&label.text, config.label_font_size, theme),
            })?;
            sink.group(&[connector, text_box])?;
        }
    }

    Ok(())
}

fn points(value: f64) -> i64 {
    (value * EMU_PER_POINT).round() as i64
}

fn stroke(color: &str, width_pt: f64) -> Stroke {
    Stroke {
        color: color.to_string(),
        width: points(width_pt),
    }
}

fn text(content: &str, size_pt: f64, theme: &Theme) -> TextStyle {
    TextStyle {
        content: content.to_string(),
        size: points(size_pt),
        color: theme.text_color.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ShapeInstruction {
    RoundedRect {
        id: ShapeId,
        #[serde(flatten)]
        shape: RoundedRect,
    },
    Connector {
        id: ShapeId,
        #[serde(flatten)]
        connector: Connector,
    },
    TextBox {
        id: ShapeId,
        #[serde(flatten)]
        text_box: TextBox,
    },
    Group {
        id: ShapeId,
        members: Vec<ShapeId>,
    },
}

/// A sink that records the calls it receives, for hand-off to an external
/// document backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SceneRecorder {
    pub shapes: Vec<ShapeInstruction>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> ShapeId {
        self.shapes.len()
    }

    fn check_member(&self, member: ShapeId) -> Result<()> {
        if member < self.shapes.len() {
            Ok(())
        } else {
            Err(Error::Generation(format!("unknown shape id {member}")))
        }
    }
}

impl ShapeSink for SceneRecorder {
    fn add_rounded_rect(&mut self, shape: &RoundedRect) -> Result<ShapeId> {
        let id = self.next_id();
        self.shapes.push(ShapeInstruction::RoundedRect {
            id,
            shape: shape.clone(),
        });
        Ok(id)
    }

    fn add_connector(&mut self, connector: &Connector) -> Result<ShapeId> {
        for binding in [connector.begin_binding, connector.end_binding]
            .into_iter()
            .flatten()
        {
            self.check_member(binding.shape)?;
        }
        let id = self.next_id();
        self.shapes.push(ShapeInstruction::Connector {
            id,
            connector: connector.clone(),
        });
        Ok(id)
    }

    fn add_text_box(&mut self, text_box: &TextBox) -> Result<ShapeId> {
        let id = self.next_id();
        self.shapes.push(ShapeInstruction::TextBox {
            id,
            text_box: text_box.clone(),
        });
        Ok(id)
    }

    fn group(&mut self, members: &[ShapeId]) -> Result<ShapeId> {
        for &member in members {
            self.check_member(member)?;
        }
        let id = self.next_id();
        self.shapes.push(ShapeInstruction::Group {
            id,
            members: members.to_vec(),
        });
        Ok(id)
    }
}

/// A full scene: canvas size plus the ordered shape instructions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub canvas_width: i64,
    pub canvas_height: i64,
    pub shapes: Vec<ShapeInstruction>,
}

impl SceneDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EdgeShape, LabelBox, NodeShape};

    fn sample_placement() -> Placement {
        let a = Rect::new(0, 0, 100, 50);
        let b = Rect::new(400, 0, 100, 50);
        let node = |id: &str, rect: Rect| NodeShape {
            node_id: id.to_string(),
            rect,
            text: id.to_string(),
            divider: (rect.site(Site::Left), rect.site(Site::Right)),
        };
        Placement {
            nodes: vec![node("a", a), node("b", b)],
            edges: vec![
                EdgeShape {
                    edge_id: "a-b-P1".to_string(),
                    from: "a".to_string(),
                    to: "b".to_string(),
                    begin_site: Site::Right,
                    end_site: Site::Left,
                    begin: a.site(Site::Right),
                    end: b.site(Site::Left),
                    label: Some(LabelBox {
                        rect: Rect::new(200, 0, 100, 20),
                        text: "P1".to_string(),
                    }),
                },
                EdgeShape {
                    edge_id: "b-a".to_string(),
                    from: "b".to_string(),
                    to: "a".to_string(),
                    begin_site: Site::Left,
                    end_site: Site::Right,
                    begin: b.site(Site::Left),
                    end: a.site(Site::Right),
                    label: None,
                },
            ],
        }
    }

    #[test]
    fn emit_orders_nodes_dividers_then_edges() {
        let mut recorder = SceneRecorder::new();
        emit_scene(
            &sample_placement(),
            &Theme::crm(),
            &PlacementConfig::default(),
            &mut recorder,
        )
        .unwrap();

        let ops: Vec<&str> = recorder
            .shapes
            .iter()
            .map(|shape| match shape {
                ShapeInstruction::RoundedRect { .. } => "rect",
                ShapeInstruction::Connector { .. } => "connector",
                ShapeInstruction::TextBox { .. } => "text",
                ShapeInstruction::Group { .. } => "group",
            })
            .collect();
        assert_eq!(
            ops,
            ["rect", "connector", "rect", "connector", "connector", "text", "group", "connector"]
        );
    }

    #[test]
    fn connectors_bind_to_their_shapes() {
        let mut recorder = SceneRecorder::new();
        emit_scene(
            &sample_placement(),
            &Theme::crm(),
            &PlacementConfig::default(),
            &mut recorder,
        )
        .unwrap();

        let ShapeInstruction::Connector { connector: divider, .. } = &recorder.shapes[1] else {
            panic!("expected divider");
        };
        assert_eq!(divider.begin_binding, Some(Binding { shape: 0, site: Site::Left }));
        assert_eq!(divider.end_binding, Some(Binding { shape: 0, site: Site::Right }));
        assert_eq!(divider.stroke.width, 38_100);
        assert!(!divider.arrow_end);

        let ShapeInstruction::Connector { connector: edge, .. } = &recorder.shapes[4] else {
            panic!("expected edge connector");
        };
        assert_eq!(edge.begin_binding, Some(Binding { shape: 0, site: Site::Right }));
        assert_eq!(edge.end_binding, Some(Binding { shape: 2, site: Site::Left }));
        assert_eq!(edge.stroke.width, 19_050);
        assert!(edge.arrow_end);

        assert_eq!(
            recorder.shapes[6],
            ShapeInstruction::Group {
                id: 6,
                members: vec![4, 5]
            }
        );
    }

    #[test]
    fn recorder_rejects_unknown_members() {
        let mut recorder = SceneRecorder::new();
        let err = recorder.group(&[3]).unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn scene_document_serializes_with_op_tags() {
        let mut recorder = SceneRecorder::new();
        emit_scene(
            &sample_placement(),
            &Theme::crm(),
            &PlacementConfig::default(),
            &mut recorder,
        )
        .unwrap();
        let doc = SceneDocument {
            canvas_width: 1000,
            canvas_height: 500,
            shapes: recorder.shapes,
        };
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["canvasWidth"], 1000);
        assert_eq!(json["shapes"][0]["op"], "rounded_rect");
        assert_eq!(json["shapes"][0]["fill"], "#F2F2F2");
        assert_eq!(json["shapes"][4]["end_binding"]["site"], "left");
        assert_eq!(json["shapes"][6]["members"], serde_json::json!([4, 5]));
    }
}
