// Configuration loading

pub mod settings;
pub mod theme;

use std::fmt;

/// Opaque RGB color packed as 0xRRGGBB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0xFF_FFFF)
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_hex)
    }

    pub fn to_rgb_u32(self) -> u32 {
        self.0
    }

    /// CSS/SVG form, `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

/// Error loading or saving configuration files
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read or written.
    Io { path: String, message: String },
    /// File content is not valid JSON for the expected shape.
    Parse { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{path}: {message}"),
            Self::Parse { path, message } => write!(f, "{path}: invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}
