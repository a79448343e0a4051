// Theme configuration
// Supports: built-in light/dark palettes and custom JSON themes

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Theme source - where to load the palette from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ThemeSource {
    /// Built-in light palette
    #[default]
    Light,
    /// Built-in dark palette
    Dark,
    /// Custom theme from file path
    Custom(String),
}

/// JSON-serializable theme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    pub colors: PaletteConfig,
}

/// JSON color definitions (hex strings). Missing entries fall back to the
/// light palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_success")]
    pub success: String,
    #[serde(default = "default_info")]
    pub info: String,
    #[serde(default = "default_warning")]
    pub warning: String,
    #[serde(default = "default_danger")]
    pub danger: String,
    #[serde(default = "default_light")]
    pub light: String,
    #[serde(default = "default_dark")]
    pub dark: String,
}

fn default_primary() -> String { "#4582ec".into() }
fn default_secondary() -> String { "#adb5bd".into() }
fn default_success() -> String { "#02b875".into() }
fn default_info() -> String { "#17a2b8".into() }
fn default_warning() -> String { "#f0ad4e".into() }
fn default_danger() -> String { "#d9534f".into() }
fn default_light() -> String { "#f8f9fa".into() }
fn default_dark() -> String { "#343a40".into() }

/// Style ids a palette defines, in stylesheet order
pub const STYLE_IDS: [&str; 8] = [
    "primary", "secondary", "success", "info", "warning", "danger", "light", "dark",
];

/// Runtime palette keyed by style id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub info: Color,
    pub warning: Color,
    pub danger: Color,
    pub light: Color,
    pub dark: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

impl Palette {
    /// Built-in light palette
    pub fn light() -> Self {
        Palette {
            primary: Color::from_hex(0x4582ec),
            secondary: Color::from_hex(0xadb5bd),
            success: Color::from_hex(0x02b875),
            info: Color::from_hex(0x17a2b8),
            warning: Color::from_hex(0xf0ad4e),
            danger: Color::from_hex(0xd9534f),
            light: Color::from_hex(0xf8f9fa),
            dark: Color::from_hex(0x343a40),
        }
    }

    /// Built-in dark palette
    pub fn dark() -> Self {
        Palette {
            primary: Color::from_hex(0x375a7f),
            secondary: Color::from_hex(0x444444),
            success: Color::from_hex(0x00bc8c),
            info: Color::from_hex(0x3498db),
            warning: Color::from_hex(0xf39c12),
            danger: Color::from_hex(0xe74c3c),
            light: Color::from_hex(0xadb5bd),
            dark: Color::from_hex(0x303030),
        }
    }

    /// Create a Palette from a PaletteConfig (JSON theme)
    pub fn from_config(config: &PaletteConfig) -> Self {
        let base = Self::light();
        let pick = |hex: &str, fallback: Color| Color::parse_hex(hex).unwrap_or(fallback);
        Palette {
            primary: pick(&config.primary, base.primary),
            secondary: pick(&config.secondary, base.secondary),
            success: pick(&config.success, base.success),
            info: pick(&config.info, base.info),
            warning: pick(&config.warning, base.warning),
            danger: pick(&config.danger, base.danger),
            light: pick(&config.light, base.light),
            dark: pick(&config.dark, base.dark),
        }
    }

    /// Color for a style id, `None` for unknown ids
    pub fn style(&self, id: &str) -> Option<Color> {
        match id {
            "primary" => Some(self.primary),
            "secondary" => Some(self.secondary),
            "success" => Some(self.success),
            "info" => Some(self.info),
            "warning" => Some(self.warning),
            "danger" => Some(self.danger),
            "light" => Some(self.light),
            "dark" => Some(self.dark),
            _ => None,
        }
    }

    /// Like [`Palette::style`] but falls back to `secondary`
    pub fn style_or_default(&self, id: &str) -> Color {
        self.style(id).unwrap_or(self.secondary)
    }
}

/// Theme manager - resolves a source into a palette
pub struct ThemeManager {
    source: ThemeSource,
    current: Palette,
    current_name: String,
}

impl ThemeManager {
    /// Create a new theme manager with the given source
    pub fn new(source: ThemeSource) -> Self {
        let (current, current_name) = Self::load_theme(&source);
        ThemeManager {
            source,
            current,
            current_name,
        }
    }

    /// Get current palette
    pub fn palette(&self) -> Palette {
        self.current
    }

    /// Get current theme name
    pub fn name(&self) -> &str {
        &self.current_name
    }

    /// Get current source
    pub fn source(&self) -> &ThemeSource {
        &self.source
    }

    /// Load palette from source
    fn load_theme(source: &ThemeSource) -> (Palette, String) {
        match source {
            ThemeSource::Light => (Palette::light(), "Light".into()),
            ThemeSource::Dark => (Palette::dark(), "Dark".into()),
            ThemeSource::Custom(path) => match Self::load_custom_theme(path) {
                Some((palette, name)) => (palette, name),
                None => {
                    log::warn!("Failed to load custom theme: {}", path);
                    (Palette::light(), "Light (fallback)".into())
                }
            },
        }
    }

    /// Load a custom theme from JSON file
    pub fn load_custom_theme(path: &str) -> Option<(Palette, String)> {
        // Expand ~ to home directory
        let expanded = match path.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()?.join(rest),
            None => PathBuf::from(path),
        };

        let content = fs::read_to_string(&expanded).ok()?;
        let config: ThemeConfig = serde_json::from_str(&content).ok()?;
        Some((Palette::from_config(&config.colors), config.name))
    }

    /// List available themes (built-in + custom)
    pub fn list_themes() -> Vec<(String, ThemeSource)> {
        let mut themes = vec![
            ("Light".into(), ThemeSource::Light),
            ("Dark".into(), ThemeSource::Dark),
        ];

        if let Some(theme_dir) = Self::custom_themes_dir() {
            themes.extend(Self::scan_theme_dir(&theme_dir));
        }

        themes
    }

    /// Custom themes found in a directory, sorted by file name
    pub fn scan_theme_dir(dir: &std::path::Path) -> Vec<(String, ThemeSource)> {
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().map(|e| e == "json").unwrap_or(false))
            .collect();
        paths.sort();

        paths
            .into_iter()
            .filter_map(|path| {
                let content = fs::read_to_string(&path).ok()?;
                let config = serde_json::from_str::<ThemeConfig>(&content).ok()?;
                let path_str = path.to_string_lossy().to_string();
                Some((config.name, ThemeSource::Custom(path_str)))
            })
            .collect()
    }

    /// Get the custom themes directory path
    pub fn custom_themes_dir() -> Option<PathBuf> {
        let config_dir = dirs::config_dir()?;
        Some(config_dir.join("raci").join("themes"))
    }
}
