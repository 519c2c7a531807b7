use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Resolved color scheme for a chart. The client resolves "system" before
/// asking, so only concrete schemes exist here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    Light,
    #[default]
    Dark,
}

impl FromStr for ChartTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ChartTheme::Light),
            "dark" => Ok(ChartTheme::Dark),
            other => Err(format!("unknown theme {:?}, expected light or dark", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPalette {
    pub background: &'static str,
    pub text: &'static str,
    pub grid: &'static str,
    pub candle_up: &'static str,
    pub candle_down: &'static str,
    pub line: &'static str,
    pub area_top: &'static str,
    pub area_bottom: &'static str,
    pub overlays: &'static [&'static str],
}

static DARK: ChartPalette = ChartPalette {
    background: "transparent",
    text: "#94a3b8",
    grid: "#1e293b",
    candle_up: "#10b981",
    candle_down: "#ef4444",
    line: "#2962FF",
    area_top: "#2962FF",
    area_bottom: "rgba(41, 98, 255, 0.28)",
    overlays: &["#f59e0b", "#a855f7", "#06b6d4", "#ec4899", "#84cc16", "#f97316"],
};

static LIGHT: ChartPalette = ChartPalette {
    background: "transparent",
    text: "#334155",
    grid: "#e2e8f0",
    candle_up: "#059669",
    candle_down: "#dc2626",
    line: "#2962FF",
    area_top: "#2962FF",
    area_bottom: "rgba(41, 98, 255, 0.12)",
    overlays: &["#d97706", "#7c3aed", "#0891b2", "#db2777", "#65a30d", "#ea580c"],
};

impl ChartTheme {
    pub fn palette(&self) -> &'static ChartPalette {
        match self {
            ChartTheme::Light => &LIGHT,
            ChartTheme::Dark => &DARK,
        }
    }
}

impl ChartPalette {
    /// Color for the n-th overlay on a chart; wraps around the cycle.
    pub fn overlay_color(&self, index: usize) -> &'static str {
        self.overlays[index % self.overlays.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!("dark".parse::<ChartTheme>(), Ok(ChartTheme::Dark));
        assert_eq!(" Light ".parse::<ChartTheme>(), Ok(ChartTheme::Light));
        assert!("system".parse::<ChartTheme>().is_err());
    }

    #[test]
    fn test_overlay_color_cycles() {
        let palette = ChartTheme::Dark.palette();
        let n = palette.overlays.len();
        assert_eq!(palette.overlay_color(0), palette.overlay_color(n));
        assert_ne!(palette.overlay_color(0), palette.overlay_color(1));
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(ChartTheme::Dark.palette().grid, ChartTheme::Light.palette().grid);
        assert_eq!(ChartTheme::Dark.palette().candle_up, "#10b981");
    }
}
