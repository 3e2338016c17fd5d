//! Data-network renderer: dots for data modules, edges between neighbours

use crate::matrix::{BitMatrix, ZoneClassifier};
use crate::style::Color;

use super::{Dot, Edge, Point};

/// Parameters of one network pass.
///
/// Values are taken as given; range checks belong to the style layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkStyle {
    pub cell_size: f64,
    pub dot_scale: f64,
    pub connectivity: f64,
    pub edge_width_ratio: f64,
}

/// Dots and edges of the data network, each in row-major emission order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Network {
    pub dots: Vec<Dot>,
    pub edges: Vec<Edge>,
}

/// Center of cell `(row, col)` in drawing coordinates
pub fn cell_center(row: usize, col: usize, cell_size: f64) -> Point {
    Point::new(
        (col as f64 + 0.5) * cell_size,
        (row as f64 + 0.5) * cell_size,
    )
}

/// Convert every active, zone-free module into a dot, and link it to its
/// right and bottom neighbours when those are active and zone-free too.
///
/// Only right/bottom neighbours are tested so each adjacency yields exactly
/// one edge.
pub fn render_network(
    matrix: &BitMatrix,
    classifier: &ZoneClassifier,
    style: &NetworkStyle,
    color: &Color,
) -> Network {
    let n = matrix.size();
    let cell = style.cell_size;
    let radius = cell / 2.0 * style.dot_scale;
    let edge_width = cell * style.edge_width_ratio;
    let linked = |row: usize, col: usize| matrix.get(row, col) && classifier.is_free(row, col);

    let mut network = Network::default();
    for (row, col) in matrix.active_cells() {
        if !classifier.is_free(row, col) {
            continue;
        }
        let center = cell_center(row, col, cell);
        network.dots.push(Dot {
            center,
            radius,
            color: color.clone(),
        });

        let neighbours = [(row, col + 1), (row + 1, col)];
        for (nr, nc) in neighbours {
            if nr < n && nc < n && linked(nr, nc) {
                network.edges.push(Edge {
                    from: center,
                    to: cell_center(nr, nc, cell),
                    width: edge_width,
                    opacity: style.connectivity,
                    color: color.clone(),
                });
            }
        }
    }
    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn style(dot_scale: f64, connectivity: f64) -> NetworkStyle {
        NetworkStyle {
            cell_size: 10.0,
            dot_scale,
            connectivity,
            edge_width_ratio: 0.2,
        }
    }

    fn fg() -> Color {
        Color::parse("#06b6d4").unwrap()
    }

    /// 21x21 matrix with a plus-shaped cluster around (10, 10)
    fn plus_matrix() -> BitMatrix {
        let mut rows = vec![".".repeat(21); 21];
        rows[9] = format!("{}#{}", ".".repeat(10), ".".repeat(10));
        rows[10] = format!("{}###{}", ".".repeat(9), ".".repeat(9));
        rows[11] = format!("{}#{}", ".".repeat(10), ".".repeat(10));
        BitMatrix::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_plus_cluster() {
        let matrix = plus_matrix();
        let classifier = ZoneClassifier::new(21, false);
        let net = render_network(&matrix, &classifier, &style(1.0, 1.0), &fg());
        assert_eq!(net.dots.len(), 5);
        assert_eq!(net.edges.len(), 4);
        assert_eq!(net.dots[0].center, Point::new(105.0, 95.0));
        assert_eq!(net.dots[0].radius, 5.0);
        assert_eq!(net.edges[0].width, 2.0);
    }

    #[test]
    fn test_dot_scale_zero_keeps_entries() {
        let matrix = plus_matrix();
        let classifier = ZoneClassifier::new(21, false);
        let full = render_network(&matrix, &classifier, &style(1.0, 1.0), &fg());
        let hidden = render_network(&matrix, &classifier, &style(0.0, 1.0), &fg());
        assert_eq!(full.dots.len(), hidden.dots.len());
        assert!(hidden.dots.iter().all(|d| d.radius == 0.0));
        assert_eq!(full.edges, hidden.edges);
    }

    #[test]
    fn test_connectivity_zero_keeps_edges() {
        let matrix = plus_matrix();
        let classifier = ZoneClassifier::new(21, false);
        let net = render_network(&matrix, &classifier, &style(1.0, 0.0), &fg());
        assert_eq!(net.edges.len(), 4);
        assert!(net.edges.iter().all(|e| e.opacity == 0.0));
    }

    #[test]
    fn test_full_matrix_has_no_duplicate_edges() {
        let matrix = BitMatrix::from_modules(21, vec![true; 21 * 21]).unwrap();
        let classifier = ZoneClassifier::new(21, false);
        let net = render_network(&matrix, &classifier, &style(1.0, 1.0), &fg());

        let keys: HashSet<_> = net
            .edges
            .iter()
            .map(|e| (e.from.x as i64, e.from.y as i64, e.to.x as i64, e.to.y as i64))
            .collect();
        assert_eq!(keys.len(), net.edges.len());
        assert_eq!(net.dots.len(), 21 * 21 - 147);
    }

    #[test]
    fn test_no_edges_into_logo_zone() {
        let matrix = BitMatrix::from_modules(29, vec![true; 29 * 29]).unwrap();
        let classifier = ZoneClassifier::new(29, true);
        let net = render_network(&matrix, &classifier, &style(1.0, 1.0), &fg());
        for edge in &net.edges {
            for p in [edge.from, edge.to] {
                let row = (p.y / 10.0).floor() as usize;
                let col = (p.x / 10.0).floor() as usize;
                assert!(classifier.is_free(row, col));
            }
        }
    }
}
