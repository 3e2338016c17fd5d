//! QR Mandala - stylized, still-scannable QR codes
//!
//! This library encodes text into a QR bit matrix, renders it as a layered
//! scene of dots, edges, finder ornaments, a decorative frame and an optional
//! circular logo, and exports the scene as SVG or PNG.
//!
//! # Example
//!
//! ```rust
//! use qr_mandala::{export, generate, EcLevel, ExportFormat, StyleConfig};
//!
//! let style = StyleConfig::default().with_content("HELLO");
//! let scene = generate(&style, EcLevel::H, 300.0).unwrap();
//! let svg = String::from_utf8(export(&scene, ExportFormat::Vector).unwrap()).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod error;
pub mod matrix;
pub mod parser;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod style;

pub use error::{ConfigError, EncodingError, MarkupError, RasterError};
pub use matrix::{encode, encode_for_style, BitMatrix, EcLevel, ZoneClassifier};
pub use parser::read_scene;
pub use renderer::{rasterize, render_svg, RasterImage, SvgConfig};
pub use scene::{Layer, Primitive, Scene, SceneConfig};
pub use session::{LatestOnly, Previewer};
pub use style::{Color, Colors, LogoConfig, StyleConfig};

use std::fmt;
use std::str::FromStr;

use log::warn;
use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Content could not be encoded
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Style, matrix or draw width rejected
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while exporting a scene
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("raster export failed: {0}")]
    Raster(#[from] RasterError),
}

/// Output format of [`export`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// SVG markup
    #[default]
    Vector,
    /// PNG image at the scene's pixel size
    Raster,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Vector => write!(f, "svg"),
            ExportFormat::Raster => write!(f, "png"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" | "vector" => Ok(ExportFormat::Vector),
            "png" | "raster" => Ok(ExportFormat::Raster),
            other => Err(format!("unknown format '{}' (expected svg or png)", other)),
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Scene geometry ratios
    pub scene: SceneConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Reject logo carve-outs larger than the correction capacity
    pub strict_capacity: bool,
    /// Debug mode: print scene statistics to stderr
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scene configuration
    pub fn with_scene(mut self, config: SceneConfig) -> Self {
        self.scene = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Enable or disable the strict carve-out budget check
    pub fn with_strict_capacity(mut self, strict: bool) -> Self {
        self.strict_capacity = strict;
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Render a matrix with default configuration
///
/// # Example
///
/// ```rust
/// use qr_mandala::{encode, render, EcLevel, StyleConfig};
///
/// let matrix = encode("HELLO", EcLevel::H).unwrap();
/// let scene = render(&matrix, &StyleConfig::default(), 420.0).unwrap();
/// assert_eq!(scene.size, 420.0);
/// assert_eq!(scene.finders().count(), 3);
/// ```
pub fn render(
    matrix: &BitMatrix,
    style: &StyleConfig,
    draw_width: f64,
) -> Result<Scene, RenderError> {
    render_with_config(matrix, style, draw_width, &RenderConfig::default())
}

/// Render a matrix with custom configuration
pub fn render_with_config(
    matrix: &BitMatrix,
    style: &StyleConfig,
    draw_width: f64,
    config: &RenderConfig,
) -> Result<Scene, RenderError> {
    style.validate()?;
    if !draw_width.is_finite() || draw_width <= 0.0 {
        return Err(ConfigError::InvalidDrawWidth(draw_width).into());
    }

    // Matrices built by hand carry no level; assume the strongest
    let level = matrix.level().unwrap_or(EcLevel::H);
    let classifier = ZoneClassifier::new(matrix.size(), style.logo.is_some());
    if !classifier.fits_budget(level) {
        let fraction = classifier.carve_out_fraction();
        let capacity = level.correction_capacity();
        if config.strict_capacity {
            return Err(ConfigError::CapacityExceeded {
                fraction,
                capacity,
                level,
            }
            .into());
        }
        warn!(
            "carve-out {:.3} of a {}x{} symbol exceeds level {} capacity {:.2}; the code may not scan",
            fraction,
            matrix.size(),
            matrix.size(),
            level,
            capacity
        );
    }

    let scene = scene::compose(matrix, style, draw_width, &config.scene);

    if config.debug {
        eprintln!("=== Scene Debug ===");
        eprintln!(
            "N={} version={} level={} size={}",
            matrix.size(),
            matrix
                .version()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string()),
            level,
            scene.size
        );
        for layer in [
            Layer::Frame,
            Layer::Edges,
            Layer::Dots,
            Layer::Finders,
            Layer::Logo,
        ] {
            eprintln!("  {:?}: {}", layer, scene.count(layer));
        }
        eprintln!("===================");
    }

    Ok(scene)
}

/// Encode the style's content and render it
pub fn generate(style: &StyleConfig, level: EcLevel, draw_width: f64) -> Result<Scene, RenderError> {
    generate_with_config(style, level, draw_width, &RenderConfig::default())
}

/// Encode the style's content and render it with custom configuration
pub fn generate_with_config(
    style: &StyleConfig,
    level: EcLevel,
    draw_width: f64,
    config: &RenderConfig,
) -> Result<Scene, RenderError> {
    let matrix = encode_for_style(&style.content, level, style.logo.is_some())?;
    render_with_config(&matrix, style, draw_width, config)
}

/// Export a scene as SVG bytes or PNG bytes
pub fn export(scene: &Scene, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    export_with_config(scene, format, &SvgConfig::default())
}

/// Export a scene, using `svg` for vector output
pub fn export_with_config(
    scene: &Scene,
    format: ExportFormat,
    svg: &SvgConfig,
) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Vector => Ok(render_svg(scene, svg).into_bytes()),
        ExportFormat::Raster => {
            let side = scene.size.round().max(1.0) as u32;
            let image = rasterize(scene, side, side)?;
            Ok(image.to_png()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_rejects_bad_draw_width() {
        let matrix = encode("HELLO", EcLevel::H).unwrap();
        for width in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let result = render(&matrix, &StyleConfig::default(), width);
            assert!(matches!(
                result,
                Err(RenderError::Config(ConfigError::InvalidDrawWidth(_)))
            ));
        }
    }

    #[test]
    fn test_render_rejects_out_of_range_style() {
        let matrix = encode("HELLO", EcLevel::H).unwrap();
        let style = StyleConfig::default().with_connectivity(1.5);
        let result = render(&matrix, &style, 300.0);
        assert!(matches!(
            result,
            Err(RenderError::Config(ConfigError::OutOfRange {
                field: "connectivity",
                ..
            }))
        ));
    }

    #[test]
    fn test_strict_capacity() {
        let matrix = encode("HELLO", EcLevel::H).unwrap();
        let style = StyleConfig::default().with_logo(LogoConfig::new("logo.png"));

        assert!(render(&matrix, &style, 300.0).is_ok());

        let strict = RenderConfig::new().with_strict_capacity(true);
        let result = render_with_config(&matrix, &style, 300.0, &strict);
        assert!(matches!(
            result,
            Err(RenderError::Config(ConfigError::CapacityExceeded { .. }))
        ));
    }

    #[test]
    fn test_generate_with_logo_fits_budget() {
        let style = StyleConfig::default()
            .with_content("HELLO")
            .with_logo(LogoConfig::new("logo.png"));
        let strict = RenderConfig::new().with_strict_capacity(true);
        let scene = generate_with_config(&style, EcLevel::H, 300.0, &strict).unwrap();
        assert!(scene.logo().is_some());
    }

    #[test]
    fn test_generate_empty_content() {
        let style = StyleConfig::default().with_content("");
        assert!(matches!(
            generate(&style, EcLevel::M, 300.0),
            Err(RenderError::Encoding(EncodingError::EmptyContent))
        ));
    }

    #[test]
    fn test_export_formats() {
        let scene = generate(&StyleConfig::default().with_content("HELLO"), EcLevel::L, 64.0).unwrap();
        let svg = export(&scene, ExportFormat::Vector).unwrap();
        assert!(svg.starts_with(b"<?xml"));
        let png = export(&scene, ExportFormat::Raster).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("SVG".parse::<ExportFormat>(), Ok(ExportFormat::Vector));
        assert_eq!("png".parse::<ExportFormat>(), Ok(ExportFormat::Raster));
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
