use crate::config::{EMU_PER_PIXEL, RenderConfig};
use crate::error::{Error, Result};
use crate::layout::Rect;
use crate::scene::{Connector, RoundedRect, ShapeId, ShapeSink, TextBox, TextStyle};
use crate::theme::Theme;
use std::path::Path;

const LINE_HEIGHT: f64 = 1.2;

/// A [`ShapeSink`] that draws the scene as SVG in canvas units.
///
/// Grouped shapes are moved into a `<g>` element at the position of the
/// group; bindings are implicit because endpoints already sit on the sites.
pub struct SvgScene {
    width: i64,
    height: i64,
    font_family: String,
    background: String,
    line_color: String,
    elements: Vec<Option<String>>,
}

impl SvgScene {
    pub fn new(render: &RenderConfig, theme: &Theme) -> Self {
        Self {
            width: render.canvas_width,
            height: render.canvas_height,
            font_family: theme.font_family.clone(),
            background: theme.background.clone(),
            line_color: theme.line_color.clone(),
            elements: Vec::new(),
        }
    }

    fn push(&mut self, element: String) -> ShapeId {
        self.elements.push(Some(element));
        self.elements.len() - 1
    }

    pub fn finish(self) -> String {
        let px_width = self.width as f64 / EMU_PER_PIXEL;
        let px_height = self.height as f64 / EMU_PER_PIXEL;
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{px_width:.2}\" height=\"{px_height:.2}\" viewBox=\"0 0 {} {}\">",
            self.width, self.height
        ));
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(&self.background)
        ));
        svg.push_str("<defs>");
        svg.push_str(&format!(
            "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
            escape_xml(&self.line_color)
        ));
        svg.push_str("</defs>");
        for element in self.elements.into_iter().flatten() {
            svg.push_str(&element);
        }
        svg.push_str("</svg>");
        svg
    }

    fn text_block(&self, rect: &Rect, text: &TextStyle) -> String {
        let lines: Vec<&str> = text.content.split('\n').collect();
        let line_step = text.size as f64 * LINE_HEIGHT;
        let total_height = lines.len() as f64 * line_step;
        let center_x = rect.left as f64 + rect.width as f64 / 2.0;
        let center_y = rect.top as f64 + rect.height as f64 / 2.0;
        let start_y = center_y - total_height / 2.0 + text.size as f64;

        let mut out = format!(
            "<text x=\"{center_x:.0}\" y=\"{start_y:.0}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
            escape_xml(&self.font_family),
            text.size,
            escape_xml(&text.color)
        );
        for (idx, line) in lines.iter().enumerate() {
            let dy = if idx == 0 { 0.0 } else { line_step };
            out.push_str(&format!(
                "<tspan x=\"{center_x:.0}\" dy=\"{dy:.0}\">{}</tspan>",
                escape_xml(line.trim())
            ));
        }
        out.push_str("</text>");
        out
    }
}

impl ShapeSink for SvgScene {
    fn add_rounded_rect(&mut self, shape: &RoundedRect) -> Result<ShapeId> {
        let rect = &shape.rect;
        let radius = rect.width.min(rect.height) / 6;
        let mut element = format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
            rect.left,
            rect.top,
            rect.width,
            rect.height,
            escape_xml(&shape.fill),
            escape_xml(&shape.outline.color),
            shape.outline.width
        );
        element.push_str(&self.text_block(rect, &shape.text));
        Ok(self.push(element))
    }

    fn add_connector(&mut self, connector: &Connector) -> Result<ShapeId> {
        let marker = if connector.arrow_end {
            " marker-end=\"url(#arrow)\""
        } else {
            ""
        };
        let element = format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{marker}/>",
            connector.begin.x,
            connector.begin.y,
            connector.end.x,
            connector.end.y,
            escape_xml(&connector.stroke.color),
            connector.stroke.width
        );
        Ok(self.push(element))
    }

    fn add_text_box(&mut self, text_box: &TextBox) -> Result<ShapeId> {
        let element = self.text_block(&text_box.rect, &text_box.text);
        Ok(self.push(element))
    }

    fn group(&mut self, members: &[ShapeId]) -> Result<ShapeId> {
        let mut element = String::from("<g>");
        for &member in members {
            let inner = self
                .elements
                .get_mut(member)
                .and_then(Option::take)
                .ok_or_else(|| Error::Generation(format!("shape {member} cannot be grouped")))?;
            element.push_str(&inner);
        }
        element.push_str("</g>");
        Ok(self.push(element))
    }
}

pub fn write_output_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
        }
        None => {
            print!("{}", text);
        }
    }
    Ok(())
}

pub fn write_output_bytes(bytes: &[u8], output: &Path) -> Result<()> {
    std::fs::write(output, bytes)?;
    Ok(())
}

#[cfg(feature = "png")]
pub fn svg_to_png(svg: &str, render_cfg: &RenderConfig, theme: &Theme) -> Result<Vec<u8>> {
    let (width, height) = render_cfg.pixel_size();
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .unwrap_or("sans-serif")
        .trim()
        .to_string();
    opt.default_size =
        usvg::Size::from_wh(width, height).ok_or_else(|| Error::generation("invalid canvas size"))?;
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(Error::generation)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| Error::generation("failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.encode_png().map_err(Error::generation)
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
