//! Style configuration: semantic colors, network parameters, frame and logo
//!
//! Styles are loaded from TOML files or picked from the built-in presets and
//! validated before any rendering happens. Out-of-range values are rejected,
//! never clamped.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use crate::error::ConfigError;

/// A hex color in `#rgb` or `#rrggbb` form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Parse a hex color, keeping its original spelling
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        let valid_len = hex.len() == 3 || hex.len() == 6;
        if valid_len && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Color(value.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.0[1..];
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        if hex.len() == 3 {
            let expand = |i: usize| {
                let d = &hex[i..i + 1];
                channel(&format!("{}{}", d, d))
            };
            (expand(0), expand(1), expand(2))
        } else {
            (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]))
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three semantic colors of a render
#[derive(Debug, Clone, PartialEq)]
pub struct Colors {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
}

impl Colors {
    pub fn new(background: &str, foreground: &str, accent: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            background: parse_color("background", background)?,
            foreground: parse_color("foreground", foreground)?,
            accent: parse_color("accent", accent)?,
        })
    }
}

fn parse_color(field: &'static str, value: &str) -> Result<Color, ConfigError> {
    Color::parse(value).ok_or_else(|| ConfigError::InvalidColor {
        field,
        value: value.to_string(),
    })
}

/// Logo embedded at the center of the symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LogoConfig {
    /// Image href: a URL, a path, or a `data:` URI
    pub image_ref: String,
}

impl LogoConfig {
    pub fn new(image_ref: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
        }
    }

    /// Read an image file and embed it as a base64 data URI
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Embed raw image bytes as a base64 data URI
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mime = sniff_mime(bytes);
        Self::new(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else if bytes.starts_with(b"<svg") || bytes.starts_with(b"<?xml") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}

/// Complete style of one render
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Optional name (from TOML metadata or preset)
    pub name: Option<String>,
    /// Text encoded into the symbol
    pub content: String,
    pub colors: Colors,
    /// Edge opacity, in [0, 1]
    pub connectivity: f64,
    /// Dot radius relative to half a cell, in [0.1, 1]
    pub dot_scale: f64,
    /// Density of the decorative frame, in [0, 1]
    pub mandala_complexity: f64,
    pub show_frame: bool,
    pub logo: Option<LogoConfig>,
}

#[derive(Deserialize)]
struct TomlStyle {
    metadata: Option<TomlMetadata>,
    content: Option<String>,
    colors: TomlColors,
    style: Option<TomlParams>,
    logo: Option<TomlLogo>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
}

#[derive(Deserialize)]
struct TomlColors {
    background: String,
    foreground: String,
    accent: String,
}

#[derive(Deserialize, Default)]
struct TomlParams {
    connectivity: Option<f64>,
    dot_scale: Option<f64>,
    mandala_complexity: Option<f64>,
    show_frame: Option<bool>,
}

#[derive(Deserialize)]
struct TomlLogo {
    href: Option<String>,
    path: Option<String>,
}

const DEFAULT_CONTENT: &str = "https://llegue.app";

const DEFAULT_STYLE: &str = r##"
[metadata]
name = "cyberpunk"

[colors]
background = "#09090b"
foreground = "#06b6d4"
accent = "#d946ef"

[style]
connectivity = 0.8
dot_scale = 0.7
mandala_complexity = 0.5
show_frame = false
"##;

/// Built-in palettes
const PRESETS: &[(&str, &str)] = &[
    ("cyberpunk", DEFAULT_STYLE),
    (
        "royal",
        r##"
[metadata]
name = "royal"

[colors]
background = "#1e1b4b"
foreground = "#fbbf24"
accent = "#f59e0b"

[style]
connectivity = 0.6
dot_scale = 0.8
mandala_complexity = 0.8
show_frame = true
"##,
    ),
    (
        "matrix",
        r##"
[metadata]
name = "matrix"

[colors]
background = "#022c22"
foreground = "#4ade80"
accent = "#22c55e"

[style]
connectivity = 1.0
dot_scale = 1.0
mandala_complexity = 0.2
show_frame = false
"##,
    ),
    (
        "print-safe",
        r##"
[metadata]
name = "print-safe"

[colors]
background = "#ffffff"
foreground = "#000000"
accent = "#000000"

[style]
connectivity = 1.0
dot_scale = 0.9
mandala_complexity = 0.0
show_frame = false
"##,
    ),
];

impl StyleConfig {
    /// Load a style from a TOML file.
    ///
    /// A `[logo] path` is resolved relative to the style file and embedded.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::parse_toml(&content, base)
    }

    /// Load a style from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse_toml(content, Path::new("."))
    }

    fn parse_toml(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let parsed: TomlStyle = toml::from_str(content)?;
        let params = parsed.style.unwrap_or_default();
        let logo = match parsed.logo {
            Some(TomlLogo {
                href: Some(href), ..
            }) => Some(LogoConfig::new(href)),
            Some(TomlLogo {
                path: Some(path), ..
            }) => Some(LogoConfig::from_file(&base.join(path))?),
            _ => None,
        };

        let style = StyleConfig {
            name: parsed.metadata.and_then(|m| m.name),
            content: parsed.content.unwrap_or_else(|| DEFAULT_CONTENT.to_string()),
            colors: Colors::new(
                &parsed.colors.background,
                &parsed.colors.foreground,
                &parsed.colors.accent,
            )?,
            connectivity: params.connectivity.unwrap_or(0.8),
            dot_scale: params.dot_scale.unwrap_or(0.7),
            mandala_complexity: params.mandala_complexity.unwrap_or(0.5),
            show_frame: params.show_frame.unwrap_or(false),
            logo,
        };
        style.validate()?;
        Ok(style)
    }

    /// Look up a built-in preset by name
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
            .and_then(|(_, toml)| Self::from_toml(toml))
    }

    /// Names of the built-in presets
    pub fn preset_names() -> impl Iterator<Item = &'static str> {
        PRESETS.iter().map(|(name, _)| *name)
    }

    /// Reject parameters outside their documented domains
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("connectivity", self.connectivity, 0.0, 1.0)?;
        check_range("dot_scale", self.dot_scale, 0.1, 1.0)?;
        check_range("mandala_complexity", self.mandala_complexity, 0.0, 1.0)?;
        Ok(())
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_connectivity(mut self, connectivity: f64) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_dot_scale(mut self, dot_scale: f64) -> Self {
        self.dot_scale = dot_scale;
        self
    }

    pub fn with_complexity(mut self, complexity: f64) -> Self {
        self.mandala_complexity = complexity;
        self
    }

    pub fn with_frame(mut self, show: bool) -> Self {
        self.show_frame = show;
        self
    }

    pub fn with_logo(mut self, logo: LogoConfig) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn without_logo(mut self) -> Self {
        self.logo = None;
        self
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons and is rejected too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::from_toml(DEFAULT_STYLE).expect("Default style should be valid TOML")
    }
}
