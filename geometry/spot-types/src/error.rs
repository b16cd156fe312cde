//! Error types for spot data.

use thiserror::Error;

/// Errors that can occur when building spot data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpotError {
    /// A layer number does not fit in the 32-layer mask.
    #[error("layer {layer} is out of range (valid layers are 0..{max})")]
    LayerOutOfRange {
        /// The requested layer.
        layer: u32,
        /// Number of available layers.
        max: u32,
    },
}
