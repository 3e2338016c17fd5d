//! Scene compositor
//!
//! Layering, back to front: frame, edges, dots, finder ornaments, logo.

use log::debug;

use crate::matrix::{BitMatrix, ZoneClassifier};
use crate::style::StyleConfig;

use super::finder::render_finders;
use super::frame::render_frame;
use super::network::{render_network, NetworkStyle};
use super::{LogoOverlay, Primitive, Scene, SceneConfig};

/// Assemble the full scene for `matrix` drawn on a `size` x `size` canvas.
///
/// Inputs are expected to be validated already; see [`crate::render`].
pub fn compose(
    matrix: &BitMatrix,
    style: &StyleConfig,
    size: f64,
    config: &SceneConfig,
) -> Scene {
    let n = matrix.size();
    let cell_size = size / n as f64;
    let classifier = ZoneClassifier::new(n, style.logo.is_some());

    let frame = render_frame(
        size,
        &style.colors.accent,
        style.mandala_complexity,
        style.show_frame,
        config,
    );
    let network = render_network(
        matrix,
        &classifier,
        &NetworkStyle {
            cell_size,
            dot_scale: style.dot_scale,
            connectivity: style.connectivity,
            edge_width_ratio: config.edge_width_ratio,
        },
        &style.colors.foreground,
    );
    let finders = render_finders(n, cell_size, &style.colors.accent, config);

    debug!(
        "composed N={} cell={:.3}: {} frame, {} edges, {} dots, {} finders",
        n,
        cell_size,
        frame.len(),
        network.edges.len(),
        network.dots.len(),
        finders.len()
    );

    let mut scene = Scene::new(size, style.colors.background.clone());
    scene
        .primitives
        .extend(frame.into_iter().map(Primitive::Frame));
    scene
        .primitives
        .extend(network.edges.into_iter().map(Primitive::Edge));
    scene
        .primitives
        .extend(network.dots.into_iter().map(Primitive::Dot));
    scene
        .primitives
        .extend(finders.into_iter().map(Primitive::Finder));

    if let Some(logo) = &style.logo {
        let side = size * config.logo_size_ratio;
        scene.primitives.push(Primitive::Logo(LogoOverlay {
            x: (size - side) / 2.0,
            y: (size - side) / 2.0,
            width: side,
            height: side,
            image_ref: logo.image_ref.clone(),
            clip_radius: side / 2.0,
        }));
    }
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Layer;
    use crate::style::LogoConfig;

    fn matrix() -> BitMatrix {
        BitMatrix::from_modules(29, vec![true; 29 * 29]).unwrap()
    }

    #[test]
    fn test_layer_order_with_everything() {
        let style = StyleConfig::default()
            .with_frame(true)
            .with_complexity(1.0)
            .with_logo(LogoConfig::new("logo.png"));
        let scene = compose(&matrix(), &style, 500.0, &SceneConfig::default());
        assert!(scene.is_layered());
        assert!(matches!(scene.primitives.first(), Some(Primitive::Frame(_))));
        assert!(matches!(scene.primitives.last(), Some(Primitive::Logo(_))));
        assert_eq!(scene.count(Layer::Finders), 3);
    }

    #[test]
    fn test_logo_centered_and_clipped() {
        let style = StyleConfig::default().with_logo(LogoConfig::new("logo.png"));
        let scene = compose(&matrix(), &style, 500.0, &SceneConfig::default());
        let logo = scene.logo().expect("logo overlay");
        assert_eq!(logo.width, 150.0);
        assert_eq!(logo.x, 175.0);
        assert_eq!(logo.center().x, 250.0);
        assert_eq!(logo.clip_radius, 75.0);
    }

    #[test]
    fn test_deterministic() {
        let style = StyleConfig::default().with_frame(true);
        let a = compose(&matrix(), &style, 480.0, &SceneConfig::default());
        let b = compose(&matrix(), &style, 480.0, &SceneConfig::default());
        assert_eq!(a, b);
    }
}
