//! The placement record.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The world-space transform of one placed object.
///
/// `index` identifies the slot the spot was generated for. Modifiers keep it
/// unchanged so that downstream consumers (and debug labels) can still refer to
/// the original placement order after spots have been moved or dropped.
///
/// Spots are plain values: modifiers build new spots instead of editing shared
/// ones.
///
/// # Example
///
/// ```
/// use spot_types::Spot;
/// use nalgebra::{Point3, Vector3};
///
/// let spot = Spot::at(4, Point3::new(0.0, 5.0, 0.0));
/// let moved = spot.translated(&Vector3::new(0.0, -5.0, 0.0));
///
/// assert_eq!(moved.index, 4);
/// assert_eq!(moved.position, Point3::origin());
/// assert_eq!(spot.position.y, 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spot {
    /// Stable index of the placement slot this spot came from.
    pub index: usize,
    /// World-space position.
    pub position: Point3<f64>,
    /// World-space orientation.
    pub rotation: UnitQuaternion<f64>,
    /// Per-axis scale of the placed object.
    pub scale: Vector3<f64>,
}

impl Spot {
    /// Creates a spot with unit scale.
    #[must_use]
    pub fn new(index: usize, position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self {
            index,
            position,
            rotation,
            scale: Vector3::repeat(1.0),
        }
    }

    /// Creates an unrotated, unit-scale spot at `position`.
    #[must_use]
    pub fn at(index: usize, position: Point3<f64>) -> Self {
        Self::new(index, position, UnitQuaternion::identity())
    }

    /// Sets the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = scale;
        self
    }

    /// Returns a copy of this spot moved to `position`.
    ///
    /// Rotation, scale and index are kept.
    #[must_use]
    pub fn with_position(mut self, position: Point3<f64>) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy of this spot moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        self.with_position(self.position + *offset)
    }

    /// Returns the local +Y axis of the spot in world space.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }
}

impl Default for Spot {
    fn default() -> Self {
        Self::at(0, Point3::origin())
    }
}
