//! Concentric ornaments replacing the three finder patterns

use crate::matrix::{FinderCorner, FINDER_SIZE};
use crate::style::Color;

use super::{FinderOrnament, Point, Ring, SceneConfig};

/// Geometric center of the finder zone at `corner`
pub fn finder_center(corner: FinderCorner, n: usize, cell_size: f64) -> Point {
    let (row, col) = corner.origin(n);
    let half = FINDER_SIZE as f64 / 2.0;
    Point::new(
        (col as f64 + half) * cell_size,
        (row as f64 + half) * cell_size,
    )
}

/// One ornament per finder corner, in top-left, top-right, bottom-left order.
///
/// Module values inside the zones are never read.
pub fn render_finders(
    n: usize,
    cell_size: f64,
    color: &Color,
    config: &SceneConfig,
) -> Vec<FinderOrnament> {
    FinderCorner::ALL
        .iter()
        .map(|&corner| {
            let mut rings = vec![Ring {
                radius: 3.0 * cell_size,
                width: 0.8 * cell_size,
            }];
            if config.finder_middle_ring {
                rings.push(Ring {
                    radius: 1.5 * cell_size,
                    width: 0.5 * cell_size,
                });
            }
            FinderOrnament {
                center: finder_center(corner, n, cell_size),
                rings,
                core_radius: config.finder_core_ratio * cell_size,
                color: color.clone(),
            }
        })
        .collect()
}
