// Application settings
// Loaded from ~/.config/raci/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::theme::ThemeSource;
use crate::ConfigError;

/// Initial presentation of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewPreference {
    #[default]
    Compact,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Theme
    #[serde(rename = "theme.source")]
    pub theme_source: ThemeSource,

    // View
    #[serde(rename = "view.mode")]
    pub view_mode: ViewPreference,

    // Sibling exports written on save
    #[serde(rename = "export.xlsxOnSave")]
    pub xlsx_on_save: bool,

    #[serde(rename = "export.svgOnSave")]
    pub svg_on_save: bool,

    // Document metadata
    #[serde(rename = "document.author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(rename = "document.license", skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_source: ThemeSource::Light,
            view_mode: ViewPreference::Compact,
            xlsx_on_save: true,
            svg_on_save: true,
            author: None,
            license: None,
        }
    }
}

/// Drop `//` comment lines so the file parses as plain JSON
fn strip_comments(contents: &str) -> String {
    contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("raci");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = Self::create_default_file(&path) {
                log::warn!("{}", e);
            }
            return settings;
        }

        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Load settings from an explicit file. Errors are reported, not masked.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&strip_comments(&contents)).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        fs::write(path, json).map_err(io_err)
    }

    /// Create default settings file with comments
    pub fn create_default_file(path: &Path) -> Result<(), ConfigError> {
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let default_config = r#"{
    // Palette: {"type": "Light"}, {"type": "Dark"},
    // or {"type": "Custom", "value": "~/.config/raci/themes/mine.json"}
    "theme.source": { "type": "Light" },

    // "compact" or "expanded" (shows reorder/delete controls)
    "view.mode": "compact",

    // Write <name>.xlsx and <name>.svg next to the document on save
    "export.xlsxOnSave": true,
    "export.svgOnSave": true

    // Optional links in the saved document's <head>
    // "document.author": "https://example.org/me",
    // "document.license": "https://creativecommons.org/licenses/by/4.0/"
}
"#;

        fs::write(path, default_config).map_err(io_err)?;
        log::info!("Wrote default settings to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_file_parses_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        Settings::create_default_file(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_dotted_keys_and_comments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
    // dark mode
    "theme.source": {"type": "Dark"},
    "view.mode": "expanded",
    "export.svgOnSave": false,
    "document.author": "https://example.org/pat"
}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.theme_source, ThemeSource::Dark);
        assert_eq!(settings.view_mode, ViewPreference::Expanded);
        assert!(settings.xlsx_on_save);
        assert!(!settings.svg_on_save);
        assert_eq!(settings.author.as_deref(), Some("https://example.org/pat"));
        assert_eq!(settings.license, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            theme_source: ThemeSource::Custom("/tmp/theme.json".into()),
            license: Some("CC-BY".into()),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_errors_are_typed() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(Settings::load_from(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ \"view.mode\": 7 }").unwrap();
        assert!(matches!(Settings::load_from(&broken), Err(ConfigError::Parse { .. })));
    }
}
