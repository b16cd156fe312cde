//! Error types for spot conforming.

use spot_types::SpotError;
use thiserror::Error;

/// Errors that can occur while configuring a conform module.
///
/// Projection itself never fails: a spot the surface query cannot resolve is
/// dropped, and a degenerate configuration disables projection.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConformError {
    /// A configuration field holds NaN or an infinity.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A generated grid has more vertices than `u32` face indices can address.
    #[error("{cells_x}x{cells_z} grid has too many vertices for u32 indices")]
    GridTooLarge {
        /// Cells along X.
        cells_x: u32,
        /// Cells along Z.
        cells_z: u32,
    },

    /// Invalid spot data (e.g. a layer outside the mask).
    #[error(transparent)]
    Spot(#[from] SpotError),
}

impl ConformError {
    /// Create a non-finite field error.
    #[must_use]
    pub const fn non_finite(field: &'static str, value: f64) -> Self {
        Self::NonFinite { field, value }
    }

    /// Check if this is a non-finite field error.
    #[must_use]
    pub const fn is_non_finite(&self) -> bool {
        matches!(self, Self::NonFinite { .. })
    }
}
