use crmviz::{Config, Theme, dsl_to_dot, parse_positioned, positioned_to_scene};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    rankdir: Option<String>,
    canvas_width: Option<i64>,
    canvas_height: Option<i64>,
}

fn build_config(options: CrmRenderOptions) -> Config {
    let mut config = Config::default();
    if let Some(theme) = options.theme.as_deref().and_then(Theme::by_name) {
        config.theme = theme;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(rankdir) = options.rankdir {
        config.dot.rankdir = rankdir;
    }
    if let Some(width) = options.canvas_width.filter(|w| *w > 0) {
        config.render.canvas_width = width;
    }
    if let Some(height) = options.canvas_height.filter(|h| *h > 0) {
        config.render.canvas_height = height;
    }
    config
}

fn parse_options(options_json: Option<String>) -> Result<CrmRenderOptions, JsValue> {
    match options_json {
        Some(raw_options) => serde_json::from_str::<CrmRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(CrmRenderOptions::default()),
    }
}

#[wasm_bindgen]
pub fn render_crm_dot(code: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    Ok(dsl_to_dot(code, &config))
}

#[wasm_bindgen]
pub fn place_crm_scene(payload_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = build_config(parse_options(options_json)?);
    let graph =
        parse_positioned(payload_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    positioned_to_scene(&graph, &config)
        .and_then(|scene| scene.to_json())
        .map_err(|error| JsValue::from_str(&error.to_string()))
}
