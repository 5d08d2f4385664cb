use scope_core::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure parsed from `livescope.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Global settings.
    pub global: GlobalConfig,
    /// Upstream data sources, in display order.
    pub sources: Vec<SourceConfig>,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            sources: vec![
                SourceConfig::new("Server 1", "ws://localhost:8765/wsi", "#e64553"),
                SourceConfig::new("Server 2", "ws://localhost:8766/wsi", "#1e66f5"),
            ],
            theme: ThemeConfig::default(),
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Window title.
    pub title: String,
    /// Samples kept per source.
    pub buffer_capacity: usize,
    /// Plot refresh period in milliseconds.
    pub redraw_interval_ms: u64,
    /// Size of the "last N points" view.
    pub history_points: usize,
    /// Run without a window, logging frames instead of drawing them.
    pub headless: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            title: "livescope".to_string(),
            buffer_capacity: DEFAULT_CAPACITY,
            redraw_interval_ms: 20,
            history_points: 100,
            headless: false,
            window_width: 800.0,
            window_height: 600.0,
        }
    }
}

impl GlobalConfig {
    /// Plot refresh period, never shorter than one millisecond.
    pub fn redraw_interval(&self) -> Duration {
        Duration::from_millis(self.redraw_interval_ms.max(1))
    }
}

/// One upstream WebSocket feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name used in the legend and readouts.
    pub label: String,
    /// Default URI pre-filled in the connection form.
    pub uri: String,
    /// Series colour (hex, e.g. `"#e64553"`).
    #[serde(default = "default_series_color")]
    pub color: String,
}

impl SourceConfig {
    pub fn new(label: impl Into<String>, uri: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
            color: color.into(),
        }
    }
}

fn default_series_color() -> String {
    "#cba6f7".to_string()
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Window background color (hex).
    pub background: String,
    /// Primary text/foreground color.
    pub foreground: String,
    /// Accent color for the connected indicator.
    pub accent: String,
    /// Error notice color.
    pub error: String,
    /// Plot grid / axis color.
    pub grid: String,
    /// Font size in points.
    pub font_size: f32,
    /// Inner padding for each panel (pixels).
    pub padding: u16,
    /// Gap between controls (pixels).
    pub gap: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#eff1f5".to_string(), // Catppuccin Latte base
            foreground: "#4c4f69".to_string(), // Catppuccin Latte text
            accent:     "#40a02b".to_string(), // Catppuccin Latte green
            error:      "#d20f39".to_string(), // Catppuccin Latte red
            grid:       "#bcc0cc".to_string(), // Catppuccin Latte surface1
            font_size:  13.0,
            padding:    10,
            gap:        10,
        }
    }
}
