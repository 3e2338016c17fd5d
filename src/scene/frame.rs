//! Decorative mandala frame
//!
//! Three concentric rings around the drawing center: arc dashes, beads and
//! (above a complexity threshold) eight cross-mark runes. The frame carries
//! no QR data.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::style::Color;

use super::{FrameOrnament, Point, SceneConfig};

/// Complexity above which the rune ring appears
pub const RUNE_THRESHOLD: f64 = 0.3;

/// Number of runes on the outer ring
pub const RUNE_COUNT: usize = 8;

/// Fraction of a dash slice covered by its arc
const ARC_SPAN: f64 = 0.7;

const ARC_RING: f64 = 0.65;
const BEAD_RING: f64 = 0.8;
const RUNE_RING: f64 = 0.95;

/// Element counts implied by a complexity value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCounts {
    /// Dash slots on ring 1; only odd-indexed slots are drawn
    pub dash_count: usize,
    pub dot_count: usize,
    pub runes: bool,
}

impl FrameCounts {
    pub fn for_complexity(complexity: f64) -> Self {
        Self {
            dash_count: (12.0 + complexity * 24.0).floor() as usize,
            dot_count: (20.0 + complexity * 40.0).floor() as usize,
            runes: complexity > RUNE_THRESHOLD,
        }
    }

    /// Arcs actually emitted on ring 1
    pub fn arc_count(&self) -> usize {
        self.dash_count / 2
    }
}

/// Build the frame for a square drawing of side `size`; empty when `show` is false
pub fn render_frame(
    size: f64,
    color: &Color,
    complexity: f64,
    show: bool,
    config: &SceneConfig,
) -> Vec<FrameOrnament> {
    if !show {
        return vec![];
    }
    let counts = FrameCounts::for_complexity(complexity);
    let half = size / 2.0;
    let center = Point::new(half, half);
    let mut ornaments = vec![];

    // Ring 1: odd-indexed dashes as short arcs
    let radius = half * ARC_RING;
    let slice = 2.0 * PI / counts.dash_count as f64;
    for i in (1..counts.dash_count).step_by(2) {
        let start = i as f64 * slice - FRAC_PI_2;
        ornaments.push(FrameOrnament::Arc {
            from: center.polar(radius, start),
            to: center.polar(radius, start + slice * ARC_SPAN),
            radius,
            width: size * config.frame_arc_width_ratio,
            color: color.clone(),
        });
    }

    // Ring 2: evenly spaced beads
    let radius = half * BEAD_RING;
    let step = 2.0 * PI / counts.dot_count as f64;
    for i in 0..counts.dot_count {
        ornaments.push(FrameOrnament::Bead {
            center: center.polar(radius, i as f64 * step - FRAC_PI_2),
            radius: size * config.frame_bead_ratio,
            color: color.clone(),
        });
    }

    // Ring 3: runes
    if counts.runes {
        let radius = half * RUNE_RING;
        let step = 2.0 * PI / RUNE_COUNT as f64;
        for i in 0..RUNE_COUNT {
            ornaments.push(FrameOrnament::Rune {
                center: center.polar(radius, i as f64 * step - FRAC_PI_2),
                arm: size * config.frame_rune_ratio,
                rotation: (i * 360 / RUNE_COUNT) as f64,
                width: size * config.frame_arc_width_ratio / 2.0,
                color: color.clone(),
            });
        }
    }
    ornaments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accent() -> Color {
        Color::parse("#d946ef").unwrap()
    }

    fn counts(ornaments: &[FrameOrnament]) -> (usize, usize, usize) {
        let mut c = (0, 0, 0);
        for o in ornaments {
            match o {
                FrameOrnament::Arc { .. } => c.0 += 1,
                FrameOrnament::Bead { .. } => c.1 += 1,
                FrameOrnament::Rune { .. } => c.2 += 1,
            }
        }
        c
    }

    #[test]
    fn test_hidden_frame_is_empty() {
        assert!(render_frame(500.0, &accent(), 1.0, false, &SceneConfig::default()).is_empty());
    }

    #[test]
    fn test_counts_at_extremes() {
        assert_eq!(
            FrameCounts::for_complexity(0.0),
            FrameCounts {
                dash_count: 12,
                dot_count: 20,
                runes: false
            }
        );
        assert_eq!(
            FrameCounts::for_complexity(1.0),
            FrameCounts {
                dash_count: 36,
                dot_count: 60,
                runes: true
            }
        );
    }

    #[test]
    fn test_emitted_elements_match_counts() {
        let ornaments = render_frame(500.0, &accent(), 0.5, true, &SceneConfig::default());
        let expected = FrameCounts::for_complexity(0.5);
        assert_eq!(
            counts(&ornaments),
            (expected.arc_count(), expected.dot_count, RUNE_COUNT)
        );
    }

    #[test]
    fn test_monotonic_in_complexity() {
        let mut previous = FrameCounts::for_complexity(0.0);
        for step in 1..=1000 {
            let current = FrameCounts::for_complexity(step as f64 / 1000.0);
            assert!(current.dash_count >= previous.dash_count);
            assert!(current.dot_count >= previous.dot_count);
            previous = current;
        }
    }

    #[test]
    fn test_rune_threshold_is_a_step() {
        assert!(!FrameCounts::for_complexity(0.3).runes);
        assert!(FrameCounts::for_complexity(0.3001).runes);
        let below = render_frame(500.0, &accent(), 0.3, true, &SceneConfig::default());
        let above = render_frame(500.0, &accent(), 0.31, true, &SceneConfig::default());
        assert_eq!(counts(&below).2, 0);
        assert_eq!(counts(&above).2, RUNE_COUNT);
    }

    #[test]
    fn test_rings_radii() {
        let ornaments = render_frame(400.0, &accent(), 1.0, true, &SceneConfig::default());
        let center = Point::new(200.0, 200.0);
        for o in &ornaments {
            let (p, expected) = match o {
                FrameOrnament::Arc { from, .. } => (*from, 130.0),
                FrameOrnament::Bead { center, .. } => (*center, 160.0),
                FrameOrnament::Rune { center, .. } => (*center, 190.0),
            };
            assert!((p.distance(center) - expected).abs() < 1e-9);
        }
    }
}
