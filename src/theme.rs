use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::layers::MapLayer;

#[derive(Debug, Clone)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub line_color: String,
    pub selected_line_color: String,
    pub card_text_color: String,
    pub panel_background: String,
    pub panel_text_color: String,
}

impl Theme {
    /// Dark chart-room palette, the viewer default.
    pub fn midnight() -> Self {
        Self {
            font_family: "\"Space Mono\", ui-monospace, monospace".to_string(),
            font_size: 14.0,
            background: "#1B2432".to_string(),
            line_color: "#7A8AA6".to_string(),
            selected_line_color: "#F5C542".to_string(),
            card_text_color: "#1B2432".to_string(),
            panel_background: "#10161F".to_string(),
            panel_text_color: "#E8EDF5".to_string(),
        }
    }

    pub fn daylight() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#F4F6FA".to_string(),
            line_color: "#8A97AD".to_string(),
            selected_line_color: "#B8860B".to_string(),
            card_text_color: "#FFFFFF".to_string(),
            panel_background: "#FFFFFF".to_string(),
            panel_text_color: "#1C2430".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::midnight()
    }
}

/// Style tokens for one card. Pure function of the category and the
/// selected flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardTheme {
    pub fill: &'static str,
    pub border: &'static str,
}

static CARD_THEMES: Lazy<BTreeMap<MapLayer, (CardTheme, CardTheme)>> = Lazy::new(|| {
    // (base, selected) per category
    BTreeMap::from([
        (
            MapLayer::Landmark,
            (
                CardTheme { fill: "#D96C4F", border: "#A14A33" },
                CardTheme { fill: "#F2937A", border: "#D96C4F" },
            ),
        ),
        (
            MapLayer::Relic,
            (
                CardTheme { fill: "#7B68B5", border: "#57468C" },
                CardTheme { fill: "#A493DE", border: "#7B68B5" },
            ),
        ),
        (
            MapLayer::Signal,
            (
                CardTheme { fill: "#4FA3D9", border: "#33739F" },
                CardTheme { fill: "#7AC4F2", border: "#4FA3D9" },
            ),
        ),
        (
            MapLayer::Passage,
            (
                CardTheme { fill: "#58B078", border: "#3A7D52" },
                CardTheme { fill: "#83D4A1", border: "#58B078" },
            ),
        ),
        (
            MapLayer::Other,
            (
                CardTheme { fill: "#9AA4B5", border: "#6E7888" },
                CardTheme { fill: "#C2CBDA", border: "#9AA4B5" },
            ),
        ),
    ])
});

pub fn card_theme(curiosity: MapLayer, selected: bool) -> CardTheme {
    let (base, highlighted) = CARD_THEMES[&curiosity];
    if selected { highlighted } else { base }
}
