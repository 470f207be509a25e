use std::fmt;

use crate::config::{MAX_TARGET_FPS, MIN_TARGET_FPS};

/// A raw shape code that does not name one of the supported tessellations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnsupportedShapeError(pub u8);

impl fmt::Display for UnsupportedShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unsupported cell form factor {} (expected 3, 4 or 6)",
            self.0
        )
    }
}

impl std::error::Error for UnsupportedShapeError {}

/// Rejected user configuration, reported synchronously by the command that
/// received it.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    EmptyGrid { width: u32, height: u32 },
    InvalidCellSizing { cell_size: f64, full_cell_size: f64 },
    InvalidTargetFps(u32),
    UnsupportedShape(UnsupportedShapeError),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::EmptyGrid { width, height } => {
                write!(f, "grid must be at least 1x1, got {width}x{height}")
            }
            ConfigurationError::InvalidCellSizing {
                cell_size,
                full_cell_size,
            } => write!(
                f,
                "cell size {cell_size} must be positive and at most {full_cell_size}"
            ),
            ConfigurationError::InvalidTargetFps(fps) => write!(
                f,
                "target fps must be between {MIN_TARGET_FPS} and {MAX_TARGET_FPS}, got {fps}"
            ),
            ConfigurationError::UnsupportedShape(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::UnsupportedShape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<UnsupportedShapeError> for ConfigurationError {
    fn from(e: UnsupportedShapeError) -> Self {
        ConfigurationError::UnsupportedShape(e)
    }
}
