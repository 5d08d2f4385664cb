pub mod schema;
pub mod watcher;

pub use schema::{GlobalConfig, ScopeConfig, SourceConfig, ThemeConfig};
pub use watcher::ConfigWatcher;

use scope_core::{Result, ScopeError};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `ScopeConfig::default()` if
/// the file doesn't exist so the application always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<ScopeConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(ScopeConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| ScopeError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse a TOML document into a [`ScopeConfig`].
pub fn parse(raw: &str) -> Result<ScopeConfig> {
    let config: ScopeConfig =
        toml::from_str(raw).map_err(|e| ScopeError::Config(format!("TOML parse error: {e}")))?;

    if config.sources.is_empty() {
        return Err(ScopeError::Config("at least one [[sources]] entry is required".into()));
    }
    Ok(config)
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("livescope").join("livescope.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load("/nonexistent/livescope/livescope.toml").unwrap();
        assert_eq!(cfg.sources.len(), 2);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = parse("[global\nheadless = ").unwrap_err();
        assert!(matches!(err, ScopeError::Config(_)));
    }

    #[test]
    fn empty_source_list_is_rejected() {
        let err = parse("sources = []").unwrap_err();
        assert!(err.to_string().contains("sources"));
    }

    #[test]
    fn default_path_ends_with_app_file() {
        assert!(default_path().ends_with("livescope/livescope.toml"));
    }
}
