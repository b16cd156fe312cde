//! Layer masks for filtering surface queries.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::SpotError;

/// A bitset selecting which surface layers participate in a query.
///
/// Bit `n` set means layer `n` is eligible. There are 32 layers, numbered
/// `0..32`.
///
/// # Example
///
/// ```
/// use spot_types::LayerMask;
///
/// let terrain = LayerMask::layer(3).unwrap();
/// let mask = LayerMask::DEFAULT | terrain;
///
/// assert!(mask.contains(0));
/// assert!(mask.contains(3));
/// assert!(!mask.contains(4));
/// assert_eq!(mask.bits(), 0b1001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LayerMask(u32);

impl LayerMask {
    /// Number of layers a mask can address.
    pub const LAYER_COUNT: u32 = 32;

    /// Mask selecting no layers. Queries with this mask never hit.
    pub const NONE: Self = Self(0);

    /// Mask selecting every layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Mask selecting only the default layer (layer 0, bit value `1`).
    pub const DEFAULT: Self = Self(1);

    /// Creates a mask from raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Creates a mask selecting a single layer.
    ///
    /// # Errors
    ///
    /// Returns [`SpotError::LayerOutOfRange`] if `layer >= 32`.
    pub fn layer(layer: u32) -> Result<Self> {
        Self::NONE.with_layer(layer)
    }

    /// Returns a copy of this mask with `layer` added.
    ///
    /// # Errors
    ///
    /// Returns [`SpotError::LayerOutOfRange`] if `layer >= 32`.
    pub fn with_layer(self, layer: u32) -> Result<Self> {
        if layer >= Self::LAYER_COUNT {
            return Err(SpotError::LayerOutOfRange {
                layer,
                max: Self::LAYER_COUNT,
            });
        }
        Ok(Self(self.0 | (1 << layer)))
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Checks whether `layer` is selected. Out-of-range layers are never selected.
    #[must_use]
    pub const fn contains(self, layer: u32) -> bool {
        layer < Self::LAYER_COUNT && self.0 & (1 << layer) != 0
    }

    /// Checks whether the two masks share at least one layer.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Checks whether no layer is selected.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the selected layer numbers in ascending order.
    pub fn layers(self) -> impl Iterator<Item = u32> {
        (0..Self::LAYER_COUNT).filter(move |&layer| self.contains(layer))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u32> for LayerMask {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl BitOr for LayerMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for LayerMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for LayerMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl fmt::Display for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#034b}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_layer_zero() {
        assert_eq!(LayerMask::default(), LayerMask::DEFAULT);
        assert_eq!(LayerMask::DEFAULT.bits(), 1);
        assert!(LayerMask::DEFAULT.contains(0));
        assert!(!LayerMask::DEFAULT.contains(1));
    }

    #[test]
    fn test_layer_out_of_range() {
        assert!(LayerMask::layer(31).is_ok());
        let err = LayerMask::layer(32).unwrap_err();
        assert_eq!(err, SpotError::LayerOutOfRange { layer: 32, max: 32 });
        assert!(!LayerMask::ALL.contains(32));
    }

    #[test]
    fn test_bit_ops() {
        let a = LayerMask::layer(1).unwrap();
        let b = LayerMask::layer(2).unwrap();
        let both = a | b;

        assert!(both.intersects(a));
        assert!(!a.intersects(b));
        assert_eq!(both & a, a);
        assert_eq!(!LayerMask::NONE, LayerMask::ALL);
        assert!(LayerMask::NONE.is_empty());
    }

    #[test]
    fn test_layers_iter() {
        let mask = LayerMask::from_bits(0b1010_0001);
        assert_eq!(mask.layers().collect::<Vec<_>>(), vec![0, 5, 7]);
        assert_eq!(LayerMask::ALL.layers().count(), 32);
    }

    #[test]
    fn test_display() {
        let text = LayerMask::from_bits(0b101).to_string();
        assert!(text.starts_with("0b"));
        assert!(text.ends_with("101"));
        assert_eq!(text.len(), 34);
    }
}
