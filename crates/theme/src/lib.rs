pub mod colors;

pub use colors::Color;

use scope_config::ScopeConfig;
use scope_core::SourceId;

/// Compiled theme derived from the config file.
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible: invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Connected indicator.
    pub accent:     Color,
    /// Error notices.
    pub error:      Color,
    /// Plot axes and grid lines.
    pub grid:       Color,
    pub font_size:  f32,
    pub padding:    u16,
    pub gap:        u16,
    /// One colour per source, in config order.
    pub series:     Vec<Color>,
}

impl Theme {
    /// Build a [`Theme`] from the `[theme]` section and the source colours.
    pub fn from_config(cfg: &ScopeConfig) -> Self {
        let t = &cfg.theme;
        Self {
            background: Color::from_hex(&t.background).unwrap_or(Color::BASE),
            foreground: Color::from_hex(&t.foreground).unwrap_or(Color::TEXT),
            accent:     Color::from_hex(&t.accent).unwrap_or(Color::GREEN),
            error:      Color::from_hex(&t.error).unwrap_or(Color::RED),
            grid:       Color::from_hex(&t.grid).unwrap_or(Color::GRID),
            font_size:  t.font_size,
            padding:    t.padding,
            gap:        t.gap,
            series: cfg
                .sources
                .iter()
                .map(|s| Color::from_hex(&s.color).unwrap_or(Color::MAUVE))
                .collect(),
        }
    }

    /// Colour of a source's series.
    pub fn series_color(&self, id: SourceId) -> Color {
        self.series.get(id.index()).copied().unwrap_or(Color::MAUVE)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ScopeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_source_color_falls_back() {
        let mut cfg = ScopeConfig::default();
        cfg.sources[0].color = "not-a-color".into();
        let theme = Theme::from_config(&cfg);
        assert_eq!(theme.series_color(SourceId(0)), Color::MAUVE);
        assert_eq!(theme.series_color(SourceId(7)), Color::MAUVE);
        assert_ne!(theme.series_color(SourceId(1)), Color::MAUVE);
    }
}
