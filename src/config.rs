//! Configuration file support for spanview
//!
//! Reads from .spanview/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::grid::GridOptions;
use crate::locale::Locale;

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Grid display settings shared by every view
    #[serde(default)]
    pub grid: GridConfig,

    /// Span timeline column settings
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Grid display settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GridConfig {
    #[serde(default)]
    pub locale: Locale,

    /// Viewport height cap, in rows
    /// Default: 620
    #[serde(default = "default_max_height")]
    pub max_height: u16,

    /// Explicit scrollable width; default is the fixed column widths plus one
    #[serde(default)]
    pub inner_width: Option<u16>,

    /// Column keys to pin while scrolling horizontally
    #[serde(default)]
    pub sticky_cols: Vec<String>,

    /// Show the tag/keyword/error toolbar
    /// Default: true
    #[serde(default = "default_true")]
    pub show_highlighter: bool,

    /// Reload the input file when it changes on disk
    /// Default: true
    #[serde(default = "default_true")]
    pub watch: bool,
}

/// Span timeline columns; widths are terminal cells
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TimelineConfig {
    #[serde(default = "default_bar_width")]
    pub bar_width: u16,
    #[serde(default = "default_service_width")]
    pub service_width: u16,
    #[serde(default = "default_host_width")]
    pub host_width: u16,
    #[serde(default = "default_start_width")]
    pub start_width: u16,

    /// Replaces the localized "Span" column title
    #[serde(default)]
    pub span_title: Option<String>,
    /// Replaces the localized "Start Time" column title
    #[serde(default)]
    pub start_title: Option<String>,
}

fn default_max_height() -> u16 {
    620
}

fn default_true() -> bool {
    true
}

fn default_bar_width() -> u16 {
    30
}

fn default_service_width() -> u16 {
    18
}

fn default_host_width() -> u16 {
    16
}

fn default_start_width() -> u16 {
    21
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            max_height: default_max_height(),
            inner_width: None,
            sticky_cols: Vec::new(),
            show_highlighter: true,
            watch: true,
        }
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            service_width: default_service_width(),
            host_width: default_host_width(),
            start_width: default_start_width(),
            span_title: None,
            start_title: None,
        }
    }
}

impl Config {
    /// Load config from .spanview/config.toml
    /// Returns default config if file doesn't exist or doesn't parse
    pub fn load() -> Self {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load a specific config file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config");
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Find config.toml by walking up directory tree
    fn find_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        find_config_from(&current_dir)
    }

    /// Grid options for a view; `sticky_cols` falls back to the view's own
    /// pins when the config lists none
    pub fn grid_options(&self, default_sticky: &[&str]) -> GridOptions {
        let sticky_cols = if self.grid.sticky_cols.is_empty() {
            default_sticky.iter().map(|s| s.to_string()).collect()
        } else {
            self.grid.sticky_cols.clone()
        };
        GridOptions {
            locale: self.grid.locale,
            max_height: self.grid.max_height,
            inner_width: self.grid.inner_width,
            sticky_cols,
            show_highlighter: self.grid.show_highlighter,
            ..GridOptions::default()
        }
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let config_path = dir.join(".spanview").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }

        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.grid.locale, Locale::En);
        assert_eq!(config.grid.max_height, 620);
        assert!(config.grid.show_highlighter);
        assert!(config.grid.watch);
        assert_eq!(config.timeline.bar_width, 30);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[grid]
locale = "zh"
sticky_cols = ["span", "start"]
show_highlighter = false

[timeline]
bar_width = 48
span_title = "Call"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.grid.locale, Locale::Zh);
        assert!(!config.grid.show_highlighter);
        assert!(config.grid.watch);
        assert_eq!(config.timeline.bar_width, 48);
        assert_eq!(config.timeline.host_width, 16);
        assert_eq!(config.timeline.span_title.as_deref(), Some("Call"));

        let options = config.grid_options(&["action"]);
        assert_eq!(options.sticky_cols, ["span", "start"]);
        assert_eq!(options.locale, Locale::Zh);
    }

    #[test]
    fn test_view_default_sticky() {
        let options = Config::default().grid_options(&["action"]);
        assert_eq!(options.sticky_cols, ["action"]);
        // Left to the view
        assert!(!options.scroll_to_origin_on_mount);
    }

    #[test]
    fn test_find_walks_up_and_invalid_falls_back() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(root.path().join(".spanview")).unwrap();
        let path = root.path().join(".spanview").join("config.toml");
        std::fs::write(&path, "[grid]\nmax_height = 40\n").unwrap();

        assert_eq!(find_config_from(&nested), Some(path.clone()));
        assert_eq!(Config::load_from(&path).grid.max_height, 40);

        std::fs::write(&path, "[grid\nbroken").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}
