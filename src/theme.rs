use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub node_fill: String,
    pub node_border: String,
    pub text_color: String,
    pub line_color: String,
    pub background: String,
}

impl Theme {
    /// Light grey boxes with black outlines and text.
    pub fn crm() -> Self {
        Self {
            font_family: "Noto Sans CJK JP".to_string(),
            node_fill: "#F2F2F2".to_string(),
            node_border: "#000000".to_string(),
            text_color: "#000000".to_string(),
            line_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn mono() -> Self {
        Self {
            font_family: "DejaVu Sans Mono, monospace".to_string(),
            node_fill: "#FFFFFF".to_string(),
            node_border: "#333333".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "crm" | "default" => Some(Self::crm()),
            "mono" => Some(Self::mono()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::crm()
    }
}
