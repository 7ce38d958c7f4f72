#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dot;
pub mod drawio;
pub mod engine;
pub mod error;
pub mod ir;
pub mod layout;
pub mod parser;
pub mod render;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, DotConfig, PlacementConfig, RenderConfig, load_config};
pub use dot::to_dot;
pub use engine::{Graphviz, ImageFormat, RenderEngine};
pub use error::{Error, Result};
pub use ir::{AnyGraph, DescribedGraph, Edge, Geometry, Node, PositionedGraph, PositionedNode};
pub use layout::{LayoutTransform, Placement, compute_placement, place};
pub use parser::{parse_dsl, parse_positioned};
pub use render::SvgScene;
pub use scene::{SceneDocument, SceneRecorder, ShapeSink, emit_scene};
pub use theme::Theme;

/// DSL text to Graphviz DOT text.
pub fn dsl_to_dot(input: &str, config: &Config) -> String {
    let parsed = parse_dsl(input);
    to_dot(&parsed.graph, &config.theme, &config.dot)
}

/// DSL text to image bytes, rendered by `engine`.
pub fn dsl_to_image(
    input: &str,
    config: &Config,
    engine: &dyn RenderEngine,
    format: ImageFormat,
) -> Result<Vec<u8>> {
    engine.render(&dsl_to_dot(input, config), format)
}

/// Places `graph` on the configured canvas and records the shape calls.
pub fn positioned_to_scene(graph: &PositionedGraph, config: &Config) -> Result<SceneDocument> {
    let placement = compute_placement(graph, &config.placement, &config.render);
    let mut recorder = SceneRecorder::new();
    emit_scene(&placement, &config.theme, &config.placement, &mut recorder)?;
    Ok(SceneDocument {
        canvas_width: config.render.canvas_width,
        canvas_height: config.render.canvas_height,
        shapes: recorder.shapes,
    })
}

/// Places `graph` on the configured canvas and draws it as SVG.
pub fn positioned_to_svg(graph: &PositionedGraph, config: &Config) -> Result<String> {
    let placement = compute_placement(graph, &config.placement, &config.render);
    let mut scene = SvgScene::new(&config.render, &config.theme);
    emit_scene(&placement, &config.theme, &config.placement, &mut scene)?;
    Ok(scene.finish())
}
