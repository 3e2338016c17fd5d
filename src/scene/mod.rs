//! Layered scene model and the renderers that populate it
//!
//! A [`Scene`] is a plain value: an ordered list of drawable primitives plus
//! the canvas size and background color. Renderers in the submodules are pure
//! functions of the matrix and style, so identical inputs always produce equal
//! scenes.

pub mod compose;
pub mod config;
pub mod finder;
pub mod frame;
pub mod network;

pub use compose::compose;
pub use config::SceneConfig;

use crate::style::Color;

/// A 2D point in drawing coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `self` in direction `angle` (radians, y down)
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    pub fn distance(self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One data module drawn as a filled circle
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub center: Point,
    pub radius: f64,
    pub color: Color,
}

/// Link between two horizontally or vertically adjacent data modules
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub opacity: f64,
    pub color: Color,
}

/// A stroked circle of a finder ornament
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f64,
    pub width: f64,
}

/// Concentric replacement for one finder pattern
#[derive(Debug, Clone, PartialEq)]
pub struct FinderOrnament {
    pub center: Point,
    /// Outer ring first
    pub rings: Vec<Ring>,
    pub core_radius: f64,
    pub color: Color,
}

impl FinderOrnament {
    pub fn ring_radii(&self) -> Vec<f64> {
        self.rings.iter().map(|r| r.radius).collect()
    }
}

/// Cosmetic element of the decorative frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOrnament {
    /// Circular arc dash, drawn clockwise from `from` to `to`
    Arc {
        from: Point,
        to: Point,
        radius: f64,
        width: f64,
        color: Color,
    },
    /// Filled bead on the dotted ring
    Bead {
        center: Point,
        radius: f64,
        color: Color,
    },
    /// Cross-mark glyph, rotated by `rotation` degrees
    Rune {
        center: Point,
        arm: f64,
        rotation: f64,
        width: f64,
        color: Color,
    },
}

/// Embedded logo image, clipped to a circle
#[derive(Debug, Clone, PartialEq)]
pub struct LogoOverlay {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub image_ref: String,
    pub clip_radius: f64,
}

impl LogoOverlay {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Compositing layer, ordered back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Frame,
    Edges,
    Dots,
    Finders,
    Logo,
}

/// A drawable element of a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Dot(Dot),
    Edge(Edge),
    Finder(FinderOrnament),
    Frame(FrameOrnament),
    Logo(LogoOverlay),
}

impl Primitive {
    pub fn layer(&self) -> Layer {
        match self {
            Primitive::Frame(_) => Layer::Frame,
            Primitive::Edge(_) => Layer::Edges,
            Primitive::Dot(_) => Layer::Dots,
            Primitive::Finder(_) => Layer::Finders,
            Primitive::Logo(_) => Layer::Logo,
        }
    }
}

/// The immutable, layered result of one render pass
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Side of the square drawing area
    pub size: f64,
    pub background: Color,
    /// Primitives in paint order
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(size: f64, background: Color) -> Self {
        Self {
            size,
            background,
            primitives: vec![],
        }
    }

    pub fn dots(&self) -> impl Iterator<Item = &Dot> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Dot(d) => Some(d),
            _ => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Edge(e) => Some(e),
            _ => None,
        })
    }

    pub fn finders(&self) -> impl Iterator<Item = &FinderOrnament> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Finder(f) => Some(f),
            _ => None,
        })
    }

    pub fn frame_ornaments(&self) -> impl Iterator<Item = &FrameOrnament> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Frame(f) => Some(f),
            _ => None,
        })
    }

    pub fn logo(&self) -> Option<&LogoOverlay> {
        self.primitives.iter().find_map(|p| match p {
            Primitive::Logo(l) => Some(l),
            _ => None,
        })
    }

    /// Number of primitives on `layer`
    pub fn count(&self, layer: Layer) -> usize {
        self.primitives.iter().filter(|p| p.layer() == layer).count()
    }

    /// True when primitives appear in back-to-front layer order
    pub fn is_layered(&self) -> bool {
        self.primitives
            .windows(2)
            .all(|pair| pair[0].layer() <= pair[1].layer())
    }
}
