//! Geometric properties of rendered scenes

use pretty_assertions::assert_eq;

use qr_mandala::matrix::{Zone, MIN_SIZE};
use qr_mandala::scene::frame::{FrameCounts, RUNE_COUNT, RUNE_THRESHOLD};
use qr_mandala::scene::{FrameOrnament, Point};
use qr_mandala::{
    encode, render, BitMatrix, EcLevel, Layer, LogoConfig, StyleConfig, ZoneClassifier,
};

fn hello() -> BitMatrix {
    encode("HELLO", EcLevel::H).expect("HELLO should encode")
}

fn all_active(n: usize) -> BitMatrix {
    BitMatrix::from_modules(n, vec![true; n * n]).unwrap()
}

#[test]
fn test_dots_match_free_active_cells() {
    let matrix = hello();
    for has_logo in [false, true] {
        let mut style = StyleConfig::default();
        if has_logo {
            style = style.with_logo(LogoConfig::new("logo.png"));
        }
        let scene = render(&matrix, &style, 300.0).unwrap();
        let classifier = ZoneClassifier::new(matrix.size(), has_logo);
        let expected = matrix
            .active_cells()
            .filter(|&(r, c)| classifier.is_free(r, c))
            .count();
        assert_eq!(scene.count(Layer::Dots), expected);
    }
}

#[test]
fn test_one_edge_per_adjacency() {
    let matrix = hello();
    let n = matrix.size();
    let classifier = ZoneClassifier::new(n, false);
    let free = |r: usize, c: usize| matrix.get(r, c) && classifier.is_free(r, c);

    let mut adjacencies = 0;
    for r in 0..n {
        for c in 0..n {
            if free(r, c) {
                if c + 1 < n && free(r, c + 1) {
                    adjacencies += 1;
                }
                if r + 1 < n && free(r + 1, c) {
                    adjacencies += 1;
                }
            }
        }
    }

    let scene = render(&matrix, &StyleConfig::default(), 300.0).unwrap();
    assert_eq!(scene.count(Layer::Edges), adjacencies);

    // No edge is emitted twice in either direction
    let mut seen = std::collections::HashSet::new();
    for edge in scene.edges() {
        let key = |p: Point| (p.x.to_bits(), p.y.to_bits());
        let pair = if key(edge.from) < key(edge.to) {
            (key(edge.from), key(edge.to))
        } else {
            (key(edge.to), key(edge.from))
        };
        assert!(seen.insert(pair), "duplicate edge {:?}", edge);
    }
}

#[test]
fn test_finder_ornament_centers() {
    let scene = render(&hello(), &StyleConfig::default(), 210.0).unwrap();
    let centers: Vec<Point> = scene.finders().map(|f| f.center).collect();
    assert_eq!(
        centers,
        vec![
            Point::new(35.0, 35.0),
            Point::new(175.0, 35.0),
            Point::new(35.0, 175.0),
        ]
    );
    for finder in scene.finders() {
        assert_eq!(finder.ring_radii(), vec![30.0, 15.0]);
        assert_eq!(finder.core_radius, 5.0);
    }
}

#[test]
fn test_zero_connectivity_keeps_edges_invisible() {
    let style = StyleConfig::default().with_connectivity(0.0);
    let scene = render(&all_active(MIN_SIZE), &style, 210.0).unwrap();
    assert!(scene.count(Layer::Edges) > 0);
    assert!(scene.edges().all(|e| e.opacity == 0.0));
}

#[test]
fn test_full_dot_scale_touches_neighbours() {
    let style = StyleConfig::default().with_dot_scale(1.0);
    let scene = render(&all_active(MIN_SIZE), &style, 210.0).unwrap();
    for dot in scene.dots() {
        assert_eq!(dot.radius, 5.0);
    }
}

#[test]
fn test_logo_zone_suppresses_center() {
    let n = 29;
    let style = StyleConfig::default().with_logo(LogoConfig::new("logo.png"));
    let scene = render(&all_active(n), &style, 290.0).unwrap();
    let classifier = ZoneClassifier::new(n, true);

    let center = Point::new(145.0, 145.0);
    for dot in scene.dots() {
        let row = (dot.center.y / 10.0).floor() as usize;
        let col = (dot.center.x / 10.0).floor() as usize;
        assert_ne!(classifier.zone_of(row, col), Some(Zone::LogoSafe));
    }
    assert!(scene
        .dots()
        .all(|d| d.center.distance(center) >= classifier.logo_safe_radius() * 10.0 - 1e-9));

    let logo = scene.logo().unwrap();
    assert!(logo.center().distance(center) < 1e-9);
    assert_eq!(logo.width, 290.0 * 0.3);
    assert_eq!(logo.clip_radius, logo.width / 2.0);
}

#[test]
fn test_frame_counts_monotonic() {
    let mut previous = FrameCounts::for_complexity(0.0);
    for step in 1..=100 {
        let counts = FrameCounts::for_complexity(step as f64 / 100.0);
        assert!(counts.dash_count >= previous.dash_count);
        assert!(counts.dot_count >= previous.dot_count);
        previous = counts;
    }
    assert_eq!(FrameCounts::for_complexity(0.0).dash_count, 12);
    assert_eq!(FrameCounts::for_complexity(1.0).dot_count, 60);
}

#[test]
fn test_rune_threshold() {
    let runes = |complexity: f64| {
        let style = StyleConfig::default()
            .with_frame(true)
            .with_complexity(complexity);
        let scene = render(&hello(), &style, 400.0).unwrap();
        scene
            .frame_ornaments()
            .filter(|o| matches!(o, FrameOrnament::Rune { .. }))
            .count()
    };
    assert_eq!(runes(RUNE_THRESHOLD), 0);
    assert_eq!(runes(0.31), RUNE_COUNT);
    assert_eq!(runes(1.0), RUNE_COUNT);
}

#[test]
fn test_frame_hidden_without_flag() {
    let style = StyleConfig::default().with_frame(false).with_complexity(1.0);
    let scene = render(&hello(), &style, 400.0).unwrap();
    assert_eq!(scene.count(Layer::Frame), 0);
}

#[test]
fn test_capacity_bound_for_large_symbols() {
    for version in 3..=40 {
        let n = 17 + 4 * version;
        let classifier = ZoneClassifier::new(n, true);
        for level in [EcLevel::Q, EcLevel::H] {
            assert!(
                classifier.fits_budget(level),
                "N={} carve-out {:.3} exceeds level {}",
                n,
                classifier.carve_out_fraction(),
                level
            );
        }
    }
}

#[test]
fn test_scene_is_layered_and_deterministic() {
    let style = StyleConfig::preset("royal")
        .unwrap()
        .with_content("HELLO")
        .with_logo(LogoConfig::new("logo.png"));
    let first = qr_mandala::generate(&style, EcLevel::H, 500.0).unwrap();
    let second = qr_mandala::generate(&style, EcLevel::H, 500.0).unwrap();
    assert!(first.is_layered());
    assert_eq!(first, second);
}

#[test]
fn test_connectivity_does_not_change_dots() {
    let matrix = hello();
    let hidden = render(&matrix, &StyleConfig::default().with_connectivity(0.0), 300.0).unwrap();
    let opaque = render(&matrix, &StyleConfig::default().with_connectivity(1.0), 300.0).unwrap();
    assert_eq!(hidden.count(Layer::Dots), opaque.count(Layer::Dots));
    assert_eq!(
        hidden.dots().collect::<Vec<_>>(),
        opaque.dots().collect::<Vec<_>>()
    );
    assert_eq!(hidden.count(Layer::Edges), opaque.count(Layer::Edges));
}

#[test]
fn test_finder_centers_ignore_style() {
    let matrix = hello();
    let expected: Vec<Point> = render(&matrix, &StyleConfig::default(), 210.0)
        .unwrap()
        .finders()
        .map(|f| f.center)
        .collect();

    let styles = [
        StyleConfig::default().with_connectivity(0.0),
        StyleConfig::default().with_connectivity(1.0).with_dot_scale(0.1),
        StyleConfig::default().with_dot_scale(1.0),
        StyleConfig::default().with_frame(true).with_complexity(1.0),
        StyleConfig::default().with_logo(LogoConfig::new("logo.png")),
        StyleConfig::preset("print-safe").unwrap(),
    ];
    for style in &styles {
        let scene = render(&matrix, style, 210.0).unwrap();
        let centers: Vec<Point> = scene.finders().map(|f| f.center).collect();
        assert_eq!(centers, expected);
    }
}
