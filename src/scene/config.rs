//! Geometry constants for scene construction

/// Configuration options for scene construction
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Edge stroke width as a fraction of the cell size
    pub edge_width_ratio: f64,

    /// Whether finder ornaments carry the middle ring
    pub finder_middle_ring: bool,

    /// Finder core dot radius as a fraction of the cell size
    pub finder_core_ratio: f64,

    /// Logo overlay side as a fraction of the drawing size
    pub logo_size_ratio: f64,

    /// Frame arc stroke width as a fraction of the drawing size
    pub frame_arc_width_ratio: f64,

    /// Frame bead radius as a fraction of the drawing size
    pub frame_bead_ratio: f64,

    /// Rune arm length as a fraction of the drawing size
    pub frame_rune_ratio: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            edge_width_ratio: 0.2,
            finder_middle_ring: true,
            finder_core_ratio: 0.5,
            logo_size_ratio: 0.3,
            frame_arc_width_ratio: 0.008,
            frame_bead_ratio: 0.005,
            frame_rune_ratio: 0.015,
        }
    }
}

impl SceneConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the edge width ratio
    pub fn with_edge_width_ratio(mut self, ratio: f64) -> Self {
        self.edge_width_ratio = ratio;
        self
    }

    /// Enable or disable the finder middle ring
    pub fn with_finder_middle_ring(mut self, enabled: bool) -> Self {
        self.finder_middle_ring = enabled;
        self
    }

    /// Set the logo size ratio
    pub fn with_logo_size_ratio(mut self, ratio: f64) -> Self {
        self.logo_size_ratio = ratio;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SceneConfig::default();
        assert_eq!(config.edge_width_ratio, 0.2);
        assert!(config.finder_middle_ring);
        assert_eq!(config.logo_size_ratio, 0.3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SceneConfig::new()
            .with_edge_width_ratio(0.1)
            .with_finder_middle_ring(false);

        assert_eq!(config.edge_width_ratio, 0.1);
        assert!(!config.finder_middle_ring);
    }
}
