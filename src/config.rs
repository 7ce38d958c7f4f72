use crate::error::{Error, Result};
use crate::theme::Theme;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// English Metric Units per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;
/// English Metric Units per CSS pixel (96 dpi).
pub const EMU_PER_PIXEL: f64 = 9_525.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DotConfig {
    pub rankdir: String,
    pub charset: String,
    pub top_point_size: u32,
    pub bottom_point_size: u32,
    pub single_point_size: u32,
    pub cell_padding: u32,
    pub single_cell_padding: u32,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            rankdir: "LR".to_string(),
            charset: "UTF-8".to_string(),
            top_point_size: 11,
            bottom_point_size: 13,
            single_point_size: 12,
            cell_padding: 3,
            single_cell_padding: 4,
        }
    }
}

/// Tuning for the shape scene. Lengths are canvas units, widths and font
/// sizes are points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementConfig {
    pub margin_ratio: f64,
    pub shrink: f64,
    pub height_inflation: f64,
    pub label_span_ratio: f64,
    pub label_min_width: i64,
    pub label_min_height: i64,
    pub node_line_width: f64,
    pub divider_width: f64,
    pub connector_width: f64,
    pub node_font_size: f64,
    pub label_font_size: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin_ratio: 0.05,
            shrink: 0.5,
            height_inflation: 1.15,
            label_span_ratio: 0.4,
            label_min_width: 150_000,
            label_min_height: 80_000,
            node_line_width: 1.0,
            divider_width: 3.0,
            connector_width: 1.5,
            node_font_size: 14.0,
            label_font_size: 15.0,
        }
    }
}

/// Canvas size in EMU. The default is a 10in x 7.5in slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub canvas_width: i64,
    pub canvas_height: i64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 9_144_000,
            canvas_height: 6_858_000,
        }
    }
}

impl RenderConfig {
    pub fn pixel_size(&self) -> (f32, f32) {
        (
            (self.canvas_width as f64 / EMU_PER_PIXEL) as f32,
            (self.canvas_height as f64 / EMU_PER_PIXEL) as f32,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub dot: DotConfig,
    pub placement: PlacementConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    dot: Option<DotConfig>,
    placement: Option<PlacementConfig>,
    render: Option<RenderConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    node_fill: Option<String>,
    node_border: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    info!(path = path.display().to_string(); "Loading configuration");
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => {
            json5::from_str(contents).map_err(|_| Error::Config(json_err.to_string()))?
        }
    };

    let mut config = Config::default();

    if let Some(name) = parsed.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| Error::Config(format!("unknown theme `{name}`")))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(dot) = parsed.dot {
        config.dot = dot;
    }
    if let Some(placement) = parsed.placement {
        config.placement = placement;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    validate(&config)?;
    Ok(config)
}

/// Checks the ranges the layout relies on. Run again after any override.
pub fn validate(config: &Config) -> Result<()> {
    let placement = &config.placement;
    if !(0.0..0.5).contains(&placement.margin_ratio) {
        return Err(Error::Config(format!(
            "marginRatio must be in [0, 0.5), got {}",
            placement.margin_ratio
        )));
    }
    if placement.shrink <= 0.0 || placement.height_inflation <= 0.0 {
        return Err(Error::Config(
            "shrink and heightInflation must be positive".to_string(),
        ));
    }
    if config.render.canvas_width <= 0 || config.render.canvas_height <= 0 {
        return Err(Error::Config("canvas size must be positive".to_string()));
    }
    Ok(())
}
