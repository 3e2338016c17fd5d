//! Export of finished scenes
//!
//! `svg` serializes a [`crate::scene::Scene`] to self-contained markup and
//! `raster` turns that markup into pixels.

pub mod config;
pub mod raster;
pub mod svg;

pub use config::SvgConfig;
pub use raster::{rasterize, rasterize_markup, spawn_rasterize, RasterImage, VectorBlob};
pub use svg::{render_svg, SvgBuilder};
