//! SVG generation from scenes

use crate::scene::{
    Dot, Edge, FinderOrnament, FrameOrnament, LogoOverlay, Point, Primitive, Scene,
};
use crate::style::Color;

use super::SvgConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    background: Option<String>,
    defs: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            background: None,
            defs: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    fn class(&self, name: &str) -> String {
        self.config.class(name)
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Set the opaque full-canvas background rectangle
    pub fn set_background(&mut self, size: f64, color: &Color) {
        self.background = Some(format!(
            r#"<rect class="{}" x="0" y="0" width="{}" height="{}" fill="{}"/>"#,
            self.class("background"),
            size,
            size,
            color
        ));
    }

    /// Add the soft glow filter used by outer finder rings
    pub fn add_glow_filter(&mut self) {
        let id = self.class("glow");
        self.defs.push(format!(
            r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feGaussianBlur stdDeviation="2" result="blur"/><feMerge><feMergeNode in="blur"/><feMergeNode in="SourceGraphic"/></feMerge></filter>"#
        ));
    }

    /// Add the circular clip path for the logo overlay
    pub fn add_logo_clip(&mut self, center: Point, radius: f64) {
        self.defs.push(format!(
            r#"<clipPath id="{}"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
            self.class("logo-clip"),
            center.x,
            center.y,
            radius
        ));
    }

    /// Add a filled circle
    pub fn add_dot(&mut self, class: &str, center: Point, radius: f64, fill: &Color) {
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
            self.indent_str(),
            self.class(class),
            center.x,
            center.y,
            radius,
            fill
        ));
    }

    /// Add a stroked, unfilled circle
    pub fn add_ring(
        &mut self,
        class: &str,
        center: Point,
        radius: f64,
        width: f64,
        stroke: &Color,
        glow: bool,
    ) {
        let filter = if glow {
            format!(r#" filter="url(#{})""#, self.class("glow"))
        } else {
            String::new()
        };
        self.elements.push(format!(
            r#"{}<circle class="{}" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"{}/>"#,
            self.indent_str(),
            self.class(class),
            center.x,
            center.y,
            radius,
            stroke,
            width,
            filter
        ));
    }

    /// Add a straight, round-capped line
    pub fn add_line(&mut self, class: &str, edge: &Edge) {
        self.elements.push(format!(
            r#"{}<line class="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linecap="round"/>"#,
            self.indent_str(),
            self.class(class),
            edge.from.x,
            edge.from.y,
            edge.to.x,
            edge.to.y,
            edge.color,
            edge.width,
            edge.opacity
        ));
    }

    /// Add an unfilled stroked path, optionally transformed
    pub fn add_path(
        &mut self,
        class: &str,
        d: &str,
        transform: Option<&str>,
        width: f64,
        stroke: &Color,
    ) {
        let transform_attr = transform
            .map(|t| format!(r#" transform="{}""#, t))
            .unwrap_or_default();
        self.elements.push(format!(
            r#"{}<path class="{}"{} d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            self.indent_str(),
            self.class(class),
            transform_attr,
            d,
            stroke,
            width
        ));
    }

    /// Add the clipped logo image
    pub fn add_image(&mut self, logo: &LogoOverlay) {
        self.elements.push(format!(
            r#"{}<image class="{}" x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="xMidYMid slice" clip-path="url(#{})"/>"#,
            self.indent_str(),
            self.class("logo"),
            logo.x,
            logo.y,
            logo.width,
            logo.height,
            escape_xml(&logo.image_ref),
            self.class("logo-clip")
        ));
    }

    /// Open a group element with a class
    pub fn start_group(&mut self, class: &str) {
        self.elements.push(format!(
            r#"{}<g class="{}">"#,
            self.indent_str(),
            self.class(class)
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, size: f64) -> String {
        let nl = self.newline();
        let inner = if self.config.pretty_print { "  " } else { "" };

        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            size, size, size, size
        ));
        svg.push_str(nl);

        // Background always comes first
        if let Some(background) = &self.background {
            svg.push_str(inner);
            svg.push_str(background);
            svg.push_str(nl);
        }

        if !self.defs.is_empty() {
            svg.push_str(inner);
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(inner);
                svg.push_str(inner);
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(inner);
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Serialize a scene to self-contained SVG markup
pub fn render_svg(scene: &Scene, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    builder.set_background(scene.size, &scene.background);

    let has_finders = scene.finders().next().is_some();
    if config.glow && has_finders {
        builder.add_glow_filter();
    }
    if let Some(logo) = scene.logo() {
        builder.add_logo_clip(logo.center(), logo.clip_radius);
    }

    for primitive in &scene.primitives {
        match primitive {
            Primitive::Frame(ornament) => render_frame_ornament(ornament, &mut builder),
            Primitive::Edge(edge) => builder.add_line("edge", edge),
            Primitive::Dot(Dot {
                center,
                radius,
                color,
            }) => builder.add_dot("dot", *center, *radius, color),
            Primitive::Finder(finder) => render_finder(finder, config.glow, &mut builder),
            Primitive::Logo(logo) => builder.add_image(logo),
        }
    }

    builder.build(scene.size)
}

fn render_frame_ornament(ornament: &FrameOrnament, builder: &mut SvgBuilder) {
    match ornament {
        FrameOrnament::Arc {
            from,
            to,
            radius,
            width,
            color,
        } => {
            let d = arc_to_d(*from, *to, *radius);
            builder.add_path("frame-arc", &d, None, *width, color);
        }
        FrameOrnament::Bead {
            center,
            radius,
            color,
        } => builder.add_dot("frame-bead", *center, *radius, color),
        FrameOrnament::Rune {
            center,
            arm,
            rotation,
            width,
            color,
        } => {
            let transform = format!("translate({} {}) rotate({})", center.x, center.y, rotation);
            builder.add_path("frame-rune", &cross_to_d(*arm), Some(&transform), *width, color);
        }
    }
}

fn render_finder(finder: &FinderOrnament, glow: bool, builder: &mut SvgBuilder) {
    builder.start_group("finder");
    for (i, ring) in finder.rings.iter().enumerate() {
        // Only the outermost ring glows
        builder.add_ring(
            "finder-ring",
            finder.center,
            ring.radius,
            ring.width,
            &finder.color,
            glow && i == 0,
        );
    }
    builder.add_dot("finder-core", finder.center, finder.core_radius, &finder.color);
    builder.end_group();
}

/// Convert a clockwise minor arc to SVG path data
fn arc_to_d(from: Point, to: Point, radius: f64) -> String {
    format!(
        "M {} {} A {} {} 0 0 1 {} {}",
        from.x, from.y, radius, radius, to.x, to.y
    )
}

/// Cross-mark glyph centered on the origin
fn cross_to_d(arm: f64) -> String {
    format!("M {} 0 L {} 0 M 0 {} L 0 {}", -arm, arm, -arm, arm)
}

/// Escape special XML characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
