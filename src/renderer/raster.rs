//! Rasterization of serialized scenes with resvg
//!
//! A raster pass serializes the scene, wraps the markup in a scoped
//! [`VectorBlob`], decodes it with `usvg`, and draws it into a pixmap owned by
//! that call alone. The blob is released when it goes out of scope, on
//! success and on every error path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use log::debug;
use resvg::{tiny_skia, usvg};

use crate::error::RasterError;
use crate::scene::Scene;
use crate::style::Color;

use super::{render_svg, SvgConfig};

static NEXT_BLOB_ID: AtomicU64 = AtomicU64::new(1);

/// Pixels of pre-filled background kept around a scene drawing
const BACKGROUND_INSET: f32 = 2.0;

/// Temporary in-memory handle to serialized vector markup
pub struct VectorBlob {
    id: u64,
    bytes: Vec<u8>,
}

impl VectorBlob {
    pub fn acquire(markup: String) -> Self {
        let id = NEXT_BLOB_ID.fetch_add(1, Ordering::Relaxed);
        debug!("acquired vector blob #{} ({} bytes)", id, markup.len());
        Self {
            id,
            bytes: markup.into_bytes(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Decode the blob into a render tree
    pub fn decode(&self) -> Result<usvg::Tree, RasterError> {
        let options = usvg::Options::default();
        usvg::Tree::from_data(&self.bytes, &options).map_err(|e| RasterError::Decode(e.to_string()))
    }
}

impl Drop for VectorBlob {
    fn drop(&mut self) {
        debug!("released vector blob #{}", self.id);
    }
}

/// Straight-alpha RGBA pixel buffer
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at `(x, y)`, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Encode the buffer as PNG
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height).ok_or(
            RasterError::Allocation {
                width: self.width,
                height: self.height,
            },
        )?;
        let mut premultiplied = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let c = tiny_skia::ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
            premultiplied.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        let pixmap = tiny_skia::Pixmap::from_vec(premultiplied, size).ok_or(
            RasterError::Allocation {
                width: self.width,
                height: self.height,
            },
        )?;
        pixmap
            .encode_png()
            .map_err(|e| RasterError::Encode(e.to_string()))
    }
}

/// Rasterize a scene at `width` x `height` pixels
pub fn rasterize(scene: &Scene, width: u32, height: u32) -> Result<RasterImage, RasterError> {
    let markup = render_svg(scene, &SvgConfig::default().with_pretty_print(false));
    rasterize_markup(markup, width, height, Some(&scene.background))
}

/// Rasterize arbitrary SVG markup.
///
/// When `background` is given the buffer is filled with it and the drawing is
/// inset by two pixels on every side, so the outermost pixel ring stays the
/// opaque background even when data modules reach the symbol edge.
pub fn rasterize_markup(
    markup: String,
    width: u32,
    height: u32,
    background: Option<&Color>,
) -> Result<RasterImage, RasterError> {
    let blob = VectorBlob::acquire(markup);
    let tree = blob.decode()?;

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::Allocation { width, height })?;
    if let Some(color) = background {
        let (r, g, b) = color.rgb();
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
    }

    let inset = if background.is_some() && width > 4 && height > 4 {
        BACKGROUND_INSET
    } else {
        0.0
    };
    let size = tree.size();
    let transform = tiny_skia::Transform::from_row(
        (width as f32 - 2.0 * inset) / size.width(),
        0.0,
        0.0,
        (height as f32 - 2.0 * inset) / size.height(),
        inset,
        inset,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    debug!("rasterized blob #{} at {}x{}", blob.id(), width, height);

    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(RasterImage {
        width,
        height,
        data,
    })
}

/// Rasterize on a dedicated thread; each call owns its scene copy and buffer
pub fn spawn_rasterize(
    scene: Scene,
    width: u32,
    height: u32,
) -> JoinHandle<Result<RasterImage, RasterError>> {
    thread::spawn(move || rasterize(&scene, width, height))
}

/// Wait for a background rasterization
pub fn join_rasterize(
    handle: JoinHandle<Result<RasterImage, RasterError>>,
) -> Result<RasterImage, RasterError> {
    handle.join().map_err(|_| RasterError::Join)?
}
