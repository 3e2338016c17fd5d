//! Zone membership for matrix cells
//!
//! Every renderer consults [`ZoneClassifier::zone_of`] to decide whether a
//! module belongs to a finder pattern or to the logo safe zone. Membership is
//! pure arithmetic on `(row, col, N)` and never reads module values.

use super::EcLevel;

/// Side length of a finder pattern in modules
pub const FINDER_SIZE: usize = 7;

/// Logo safe-zone radius as a fraction of the matrix side
pub const LOGO_SAFE_RADIUS_RATIO: f64 = 0.15;

/// The three matrix corners that carry a finder pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderCorner {
    TopLeft,
    TopRight,
    BottomLeft,
}

impl FinderCorner {
    pub const ALL: [FinderCorner; 3] = [
        FinderCorner::TopLeft,
        FinderCorner::TopRight,
        FinderCorner::BottomLeft,
    ];

    /// Top-left `(row, col)` of the 7x7 zone in a matrix of side `n`
    pub fn origin(self, n: usize) -> (usize, usize) {
        let far = n - FINDER_SIZE;
        match self {
            FinderCorner::TopLeft => (0, 0),
            FinderCorner::TopRight => (0, far),
            FinderCorner::BottomLeft => (far, 0),
        }
    }
}

/// Region of the matrix excluded from data-module rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Finder(FinderCorner),
    LogoSafe,
}

/// Membership predicate for a matrix of side `n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneClassifier {
    n: usize,
    has_logo: bool,
}

impl ZoneClassifier {
    pub fn new(n: usize, has_logo: bool) -> Self {
        Self { n, has_logo }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn has_logo(&self) -> bool {
        self.has_logo
    }

    /// Zone containing `(row, col)`, finder zones taking precedence
    pub fn zone_of(&self, row: usize, col: usize) -> Option<Zone> {
        if let Some(corner) = self.finder_at(row, col) {
            return Some(Zone::Finder(corner));
        }
        if self.has_logo && self.in_logo_disk(row, col) {
            return Some(Zone::LogoSafe);
        }
        None
    }

    /// True when `(row, col)` lies outside every zone
    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.zone_of(row, col).is_none()
    }

    fn finder_at(&self, row: usize, col: usize) -> Option<FinderCorner> {
        let far = self.n.saturating_sub(FINDER_SIZE);
        let top = row < FINDER_SIZE;
        let left = col < FINDER_SIZE;
        if top && left {
            Some(FinderCorner::TopLeft)
        } else if top && col >= far {
            Some(FinderCorner::TopRight)
        } else if row >= far && left {
            Some(FinderCorner::BottomLeft)
        } else {
            None
        }
    }

    fn in_logo_disk(&self, row: usize, col: usize) -> bool {
        let center = self.n as f64 / 2.0;
        let dy = row as f64 + 0.5 - center;
        let dx = col as f64 + 0.5 - center;
        (dx * dx + dy * dy).sqrt() < self.logo_safe_radius()
    }

    /// Logo safe-zone radius in modules
    pub fn logo_safe_radius(&self) -> f64 {
        self.n as f64 * LOGO_SAFE_RADIUS_RATIO
    }

    /// Module count covered by the three finder zones
    pub fn finder_area(&self) -> usize {
        FinderCorner::ALL.len() * FINDER_SIZE * FINDER_SIZE
    }

    /// Module count classified as logo-safe (zero without a logo)
    pub fn logo_safe_area(&self) -> usize {
        if !self.has_logo {
            return 0;
        }
        (0..self.n)
            .flat_map(|row| (0..self.n).map(move |col| (row, col)))
            .filter(|&(row, col)| self.zone_of(row, col) == Some(Zone::LogoSafe))
            .count()
    }

    /// Fraction of all modules carved out of data rendering
    pub fn carve_out_fraction(&self) -> f64 {
        let total = (self.n * self.n) as f64;
        (self.finder_area() + self.logo_safe_area()) as f64 / total
    }

    /// Whether the carve-out stays within the correction capacity of `level`
    pub fn fits_budget(&self, level: EcLevel) -> bool {
        self.carve_out_fraction() <= level.correction_capacity()
    }
}
