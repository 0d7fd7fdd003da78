//! Application configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! is a valid configuration.
//!
//! ```toml
//! [ui]
//! layout = "document"
//! success_timeout_ms = 2000
//! untitled_title = "Untitled Note"
//!
//! [theme]
//! preference_file = "~/.config/notabili/preferences.json"
//! prefer_dark = false
//!
//! [log]
//! level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Layout;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub theme: ThemeConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Layout of the note editor form.
    pub layout: Layout,
    /// How long "Note saved" stays visible.
    pub success_timeout_ms: u64,
    /// Title stored for notes saved with an empty title.
    pub untitled_title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Document,
            success_timeout_ms: 2000,
            untitled_title: "Untitled Note".to_string(),
        }
    }
}

impl UiConfig {
    pub fn success_timeout(&self) -> Duration {
        Duration::from_millis(self.success_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// JSON file holding the saved theme. In-memory when unset.
    pub preference_file: Option<PathBuf>,
    /// Platform default used when nothing is saved.
    pub prefer_dark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `notabili=debug`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };

        toml::from_str(&text).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ui.layout, Layout::Document);
        assert_eq!(config.ui.success_timeout(), Duration::from_secs(2));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [ui]
            layout = "minimal"

            [theme]
            prefer_dark = true
            "#,
        )
        .unwrap();

        assert_eq!(config.ui.layout, Layout::Minimal);
        assert_eq!(config.ui.untitled_title, "Untitled Note");
        assert!(config.theme.prefer_dark);
        assert_eq!(config.theme.preference_file, None);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_reports_path_on_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[ui]\nlayout = \"sideways\"\n").unwrap();

        match AppConfig::load(&path) {
            Err(Error::Config { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
