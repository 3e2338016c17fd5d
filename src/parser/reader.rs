//! Rebuild a [`Scene`] from markup produced by [`crate::renderer::render_svg`]
//!
//! Primitives are recognised by their prefixed class names and rebuilt from
//! their attributes. Numbers are printed with Rust's shortest round-trip
//! formatting, so reading back an emitted scene yields an equal value.

use crate::error::MarkupError;
use crate::renderer::SvgConfig;
use crate::scene::{
    Dot, Edge, FinderOrnament, FrameOrnament, LogoOverlay, Point, Primitive, Ring, Scene,
};
use crate::style::Color;

use super::ast::Element;
use super::grammar::parse;

/// Parse emitted markup back into a scene
pub fn read_scene(markup: &str, config: &SvgConfig) -> Result<Scene, MarkupError> {
    let root = parse(markup).map_err(|errors| {
        errors
            .into_iter()
            .next()
            .unwrap_or_else(|| MarkupError::structure("empty markup"))
    })?;
    SceneReader { config }.read(&root)
}

struct SceneReader<'a> {
    config: &'a SvgConfig,
}

impl SceneReader<'_> {
    fn kind<'e>(&self, element: &'e Element) -> Option<&'e str> {
        element
            .attr("class")?
            .strip_prefix(self.config.class_prefix.as_str())
    }

    fn read(&self, root: &Element) -> Result<Scene, MarkupError> {
        if root.name != "svg" {
            return Err(MarkupError::structure(format!(
                "root element is <{}>, expected <svg>",
                root.name
            )));
        }
        let size = number(root, "width")?;

        let mut children = root.children.iter();
        let background = match children.next() {
            Some(first) if first.name == "rect" && self.kind(first) == Some("background") => {
                color(first, "fill")?
            }
            _ => {
                return Err(MarkupError::structure(
                    "first element must be the background rectangle",
                ))
            }
        };

        let mut scene = Scene::new(size, background);
        let mut clip_radius = None;
        for element in children {
            if element.name == "defs" {
                clip_radius = self.read_clip_radius(element)?.or(clip_radius);
                continue;
            }
            let primitive = self.read_primitive(element, clip_radius)?;
            scene.primitives.push(primitive);
        }
        Ok(scene)
    }

    fn read_clip_radius(&self, defs: &Element) -> Result<Option<f64>, MarkupError> {
        let clip_id = self.config.class("logo-clip");
        for clip in defs.children_named("clipPath") {
            if clip.attr("id") == Some(clip_id.as_str()) {
                let circle = clip
                    .children_named("circle")
                    .next()
                    .ok_or_else(|| MarkupError::structure("logo clip path has no circle"))?;
                return Ok(Some(number(circle, "r")?));
            }
        }
        Ok(None)
    }

    fn read_primitive(
        &self,
        element: &Element,
        clip_radius: Option<f64>,
    ) -> Result<Primitive, MarkupError> {
        let kind = self.kind(element).unwrap_or_default();
        let primitive = match (element.name.as_str(), kind) {
            ("circle", "dot") => Primitive::Dot(Dot {
                center: center(element)?,
                radius: number(element, "r")?,
                color: color(element, "fill")?,
            }),
            ("line", "edge") => Primitive::Edge(Edge {
                from: Point::new(number(element, "x1")?, number(element, "y1")?),
                to: Point::new(number(element, "x2")?, number(element, "y2")?),
                width: number(element, "stroke-width")?,
                opacity: number(element, "stroke-opacity")?,
                color: color(element, "stroke")?,
            }),
            ("circle", "frame-bead") => Primitive::Frame(FrameOrnament::Bead {
                center: center(element)?,
                radius: number(element, "r")?,
                color: color(element, "fill")?,
            }),
            ("path", "frame-arc") => Primitive::Frame(read_arc(element)?),
            ("path", "frame-rune") => Primitive::Frame(read_rune(element)?),
            ("g", "finder") => Primitive::Finder(self.read_finder(element)?),
            ("image", "logo") => Primitive::Logo(LogoOverlay {
                x: number(element, "x")?,
                y: number(element, "y")?,
                width: number(element, "width")?,
                height: number(element, "height")?,
                image_ref: unescape_xml(required(element, "href")?),
                clip_radius: clip_radius
                    .ok_or_else(|| MarkupError::structure("logo without clip path"))?,
            }),
            (name, _) => {
                return Err(MarkupError::structure(format!(
                    "unrecognised <{}> element with class '{}'",
                    name, kind
                )))
            }
        };
        Ok(primitive)
    }

    fn read_finder(&self, group: &Element) -> Result<FinderOrnament, MarkupError> {
        let mut rings = vec![];
        let mut core = None;
        for child in &group.children {
            match self.kind(child) {
                Some("finder-ring") => rings.push(Ring {
                    radius: number(child, "r")?,
                    width: number(child, "stroke-width")?,
                }),
                Some("finder-core") => core = Some(child),
                _ => return Err(MarkupError::structure("unexpected element in finder group")),
            }
        }
        let core = core.ok_or_else(|| MarkupError::structure("finder group without core"))?;
        Ok(FinderOrnament {
            center: center(core)?,
            rings,
            core_radius: number(core, "r")?,
            color: color(core, "fill")?,
        })
    }
}

fn read_arc(element: &Element) -> Result<FrameOrnament, MarkupError> {
    let d = required(element, "d")?;
    let parts: Vec<&str> = d.split_whitespace().collect();
    if parts.len() != 11 || parts[0] != "M" || parts[3] != "A" {
        return Err(MarkupError::structure(format!("unsupported arc path '{}'", d)));
    }
    Ok(FrameOrnament::Arc {
        from: Point::new(parse_f64(parts[1])?, parse_f64(parts[2])?),
        to: Point::new(parse_f64(parts[9])?, parse_f64(parts[10])?),
        radius: parse_f64(parts[4])?,
        width: number(element, "stroke-width")?,
        color: color(element, "stroke")?,
    })
}

fn read_rune(element: &Element) -> Result<FrameOrnament, MarkupError> {
    let transform = required(element, "transform")?.replace(['(', ')'], " ");
    let t: Vec<&str> = transform.split_whitespace().collect();
    if t.len() != 5 || t[0] != "translate" || t[3] != "rotate" {
        return Err(MarkupError::structure(format!(
            "unsupported rune transform '{}'",
            transform
        )));
    }
    let d = required(element, "d")?;
    let parts: Vec<&str> = d.split_whitespace().collect();
    if parts.len() != 12 || parts[3] != "L" {
        return Err(MarkupError::structure(format!("unsupported rune path '{}'", d)));
    }
    Ok(FrameOrnament::Rune {
        center: Point::new(parse_f64(t[1])?, parse_f64(t[2])?),
        arm: parse_f64(parts[4])?,
        rotation: parse_f64(t[4])?,
        width: number(element, "stroke-width")?,
        color: color(element, "stroke")?,
    })
}

fn required<'e>(element: &'e Element, key: &str) -> Result<&'e str, MarkupError> {
    element.attr(key).ok_or_else(|| {
        MarkupError::structure(format!("<{}> is missing '{}'", element.name, key))
    })
}

fn parse_f64(value: &str) -> Result<f64, MarkupError> {
    value
        .parse()
        .map_err(|_| MarkupError::structure(format!("'{}' is not a number", value)))
}

fn number(element: &Element, key: &str) -> Result<f64, MarkupError> {
    parse_f64(required(element, key)?)
}

fn center(element: &Element) -> Result<Point, MarkupError> {
    Ok(Point::new(number(element, "cx")?, number(element, "cy")?))
}

fn color(element: &Element, key: &str) -> Result<Color, MarkupError> {
    let value = required(element, key)?;
    Color::parse(value)
        .ok_or_else(|| MarkupError::structure(format!("'{}' is not a hex color", value)))
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
