//! QR bit-matrix model and the encoder boundary
//!
//! The symbol encoding itself (mode selection, Reed-Solomon, masking) is
//! delegated to the `qrcode` crate. This module only adapts its output into
//! an immutable [`BitMatrix`] and selects versions large enough to keep the
//! logo carve-out inside the error-correction budget.

pub mod classifier;

use std::fmt;

use log::{debug, warn};
use serde::Deserialize;

use crate::error::{ConfigError, EncodingError};

pub use classifier::{FinderCorner, Zone, ZoneClassifier, FINDER_SIZE, LOGO_SAFE_RADIUS_RATIO};

/// Smallest side length of a standard QR symbol (version 1)
pub const MIN_SIZE: usize = 21;

/// Largest side length of a standard QR symbol (version 40)
pub const MAX_SIZE: usize = 177;

/// Error-correction level a matrix was encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    /// Approximate fraction of modules that may be lost while the symbol stays decodable
    pub fn correction_capacity(self) -> f64 {
        match self {
            EcLevel::L => 0.07,
            EcLevel::M => 0.15,
            EcLevel::Q => 0.25,
            EcLevel::H => 0.30,
        }
    }

    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for EcLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            other => Err(format!("unknown error-correction level '{}'", other)),
        }
    }
}

/// Square grid of QR modules, `true` meaning active (dark)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    size: usize,
    modules: Vec<bool>,
    level: Option<EcLevel>,
}

impl BitMatrix {
    /// Build a matrix from row-major modules.
    ///
    /// The side must be odd and at least [`MIN_SIZE`], and `modules` must hold
    /// exactly `size * size` entries.
    pub fn from_modules(size: usize, modules: Vec<bool>) -> Result<Self, ConfigError> {
        if size < MIN_SIZE {
            return Err(ConfigError::InvalidMatrix(format!(
                "side {} is smaller than {}",
                size, MIN_SIZE
            )));
        }
        if size % 2 == 0 {
            return Err(ConfigError::InvalidMatrix(format!("side {} is even", size)));
        }
        if modules.len() != size * size {
            return Err(ConfigError::InvalidMatrix(format!(
                "expected {} modules for side {}, got {}",
                size * size,
                size,
                modules.len()
            )));
        }
        Ok(Self {
            size,
            modules,
            level: None,
        })
    }

    /// Build a matrix from text rows where `#` or `1` marks an active module
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ConfigError> {
        let size = rows.len();
        let mut modules = Vec::with_capacity(size * size);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != size {
                return Err(ConfigError::InvalidMatrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.chars().count(),
                    size
                )));
            }
            modules.extend(row.chars().map(|c| c == '#' || c == '1'));
        }
        Self::from_modules(size, modules)
    }

    /// Record the error-correction level the modules were encoded with
    pub fn with_level(mut self, level: EcLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn level(&self) -> Option<EcLevel> {
        self.level
    }

    /// Module at (row, col); out-of-range cells read as inactive
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row >= self.size || col >= self.size {
            return false;
        }
        self.modules[row * self.size + col]
    }

    /// Number of active modules in the whole matrix
    pub fn count_active(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }

    /// Iterate `(row, col)` of every active module in row-major order
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, m)| **m)
            .map(move |(i, _)| (i / self.size, i % self.size))
    }

    /// QR version implied by the side length, if it is a standard one
    pub fn version(&self) -> Option<u8> {
        if self.size >= MIN_SIZE && self.size <= MAX_SIZE && (self.size - 17) % 4 == 0 {
            Some(((self.size - 17) / 4) as u8)
        } else {
            None
        }
    }
}

/// Encode content with the smallest version that holds it
pub fn encode(content: &str, level: EcLevel) -> Result<BitMatrix, EncodingError> {
    if content.is_empty() {
        return Err(EncodingError::EmptyContent);
    }
    let code = qrcode::QrCode::with_error_correction_level(content.as_bytes(), level.to_qrcode())
        .map_err(|e| map_qr_error(e, level))?;
    from_code(&code, level)
}

/// Encode content with a version no smaller than `min_version`
pub fn encode_with_min_version(
    content: &str,
    level: EcLevel,
    min_version: u8,
) -> Result<BitMatrix, EncodingError> {
    let natural = encode(content, level)?;
    if min_version <= natural.version().unwrap_or(1) {
        return Ok(natural);
    }
    encode_at_version(content, level, min_version)
}

/// Encode content for a style, growing the version until the logo carve-out
/// fits the level's correction capacity.
///
/// Without a logo this is plain [`encode`]. When no version can satisfy the
/// budget (level L), the smallest encoding is returned and a warning logged.
pub fn encode_for_style(
    content: &str,
    level: EcLevel,
    has_logo: bool,
) -> Result<BitMatrix, EncodingError> {
    let natural = encode(content, level)?;
    if !has_logo {
        return Ok(natural);
    }
    let first = natural.version().unwrap_or(1);
    for version in first..=40 {
        let size = 17 + 4 * version as usize;
        if ZoneClassifier::new(size, true).fits_budget(level) {
            if version == first {
                return Ok(natural);
            }
            debug!(
                "raising QR version {} -> {} so the logo zone fits level {}",
                first, version, level
            );
            return encode_at_version(content, level, version);
        }
    }
    warn!(
        "no QR version keeps the logo zone within level {} capacity; using version {}",
        level, first
    );
    Ok(natural)
}

fn encode_at_version(content: &str, level: EcLevel, version: u8) -> Result<BitMatrix, EncodingError> {
    let code = qrcode::QrCode::with_version(
        content.as_bytes(),
        qrcode::Version::Normal(version as i16),
        level.to_qrcode(),
    )
    .map_err(|e| map_qr_error(e, level))?;
    from_code(&code, level)
}

fn from_code(code: &qrcode::QrCode, level: EcLevel) -> Result<BitMatrix, EncodingError> {
    let size = code.width();
    let modules = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    BitMatrix::from_modules(size, modules)
        .map(|m| m.with_level(level))
        .map_err(|e| EncodingError::Unsupported(e.to_string()))
}

fn map_qr_error(err: qrcode::types::QrError, level: EcLevel) -> EncodingError {
    match err {
        qrcode::types::QrError::DataTooLong => EncodingError::DataTooLong { level },
        other => EncodingError::Unsupported(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_rows(n: usize) -> Vec<String> {
        vec![".".repeat(n); n]
    }

    #[test]
    fn test_from_modules_rejects_even_side() {
        let result = BitMatrix::from_modules(22, vec![false; 22 * 22]);
        assert!(matches!(result, Err(ConfigError::InvalidMatrix(_))));
    }

    #[test]
    fn test_from_modules_rejects_small_side() {
        let result = BitMatrix::from_modules(19, vec![false; 19 * 19]);
        assert!(matches!(result, Err(ConfigError::InvalidMatrix(_))));
    }

    #[test]
    fn test_from_modules_rejects_wrong_length() {
        let result = BitMatrix::from_modules(21, vec![false; 20]);
        assert!(matches!(result, Err(ConfigError::InvalidMatrix(_))));
    }

    #[test]
    fn test_from_rows_reads_active_cells() {
        let mut rows = blank_rows(21);
        rows[10] = format!("{}#{}", ".".repeat(10), ".".repeat(10));
        let matrix = BitMatrix::from_rows(&rows).unwrap();
        assert!(matrix.get(10, 10));
        assert!(!matrix.get(10, 11));
        assert_eq!(matrix.count_active(), 1);
        assert_eq!(matrix.active_cells().collect::<Vec<_>>(), vec![(10, 10)]);
    }

    #[test]
    fn test_out_of_range_reads_inactive() {
        let matrix = BitMatrix::from_modules(21, vec![true; 21 * 21]).unwrap();
        assert!(!matrix.get(21, 0));
        assert!(!matrix.get(0, 21));
    }

    #[test]
    fn test_encode_hello_is_version_one() {
        let matrix = encode("HELLO", EcLevel::H).unwrap();
        assert_eq!(matrix.size(), 21);
        assert_eq!(matrix.version(), Some(1));
        assert_eq!(matrix.level(), Some(EcLevel::H));
    }

    #[test]
    fn test_encode_sizes_follow_version_table() {
        for content in ["a", "https://example.com/some/longer/path?query=1", &"x".repeat(300)] {
            for level in [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H] {
                let matrix = encode(content, level).unwrap();
                let n = matrix.size();
                assert_eq!((n - 17) % 4, 0, "side {} not in version table", n);
                assert!(n >= MIN_SIZE && n <= MAX_SIZE);
            }
        }
    }

    #[test]
    fn test_encode_empty_content_fails() {
        assert_eq!(encode("", EcLevel::H), Err(EncodingError::EmptyContent));
    }

    #[test]
    fn test_encode_too_long_fails() {
        let content = "x".repeat(4000);
        assert_eq!(
            encode(&content, EcLevel::H),
            Err(EncodingError::DataTooLong { level: EcLevel::H })
        );
    }

    #[test]
    fn test_encode_with_min_version() {
        let matrix = encode_with_min_version("HELLO", EcLevel::H, 3).unwrap();
        assert_eq!(matrix.version(), Some(3));
        assert_eq!(matrix.size(), 29);
    }

    #[test]
    fn test_encode_for_style_grows_for_logo() {
        let plain = encode_for_style("HELLO", EcLevel::H, false).unwrap();
        assert_eq!(plain.size(), 21);

        let with_logo = encode_for_style("HELLO", EcLevel::H, true).unwrap();
        assert!(with_logo.size() >= 29);
        assert!(ZoneClassifier::new(with_logo.size(), true).fits_budget(EcLevel::H));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("h".parse::<EcLevel>(), Ok(EcLevel::H));
        assert!("x".parse::<EcLevel>().is_err());
    }
}
