//! Read-only debug view of projected spots.
//!
//! Viewers draw an arrow and a numeric label for every spot that survived
//! projection. They get a [`SimulatedSpots`] view borrowed from the
//! authoritative output, so there is no mutation path back into the module.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use spot_types::{Spot, SpotSet};

/// What a viewer draws for one spot.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugMarker {
    /// Stable index of the spot.
    pub index: usize,
    /// Where the marker is drawn.
    pub position: Point3<f64>,
    /// Orientation of the arrow handle: the spot rotation pitched by -90°
    /// about its local X axis, so the arrow shows the spot's up axis.
    pub orientation: UnitQuaternion<f64>,
    /// Direction the arrow points in (the arrow orientation's +Z axis).
    pub direction: Vector3<f64>,
    /// Text drawn next to the arrow.
    pub label: String,
}

impl DebugMarker {
    /// Length of the arrow handle in world units.
    pub const ARROW_SIZE: f64 = 2.0;

    /// Builds the marker for a spot.
    #[must_use]
    pub fn for_spot(spot: &Spot) -> Self {
        let orientation =
            spot.rotation * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2);
        Self {
            index: spot.index,
            position: spot.position,
            orientation,
            direction: orientation * Vector3::z(),
            label: spot.index.to_string(),
        }
    }

    /// End point of the arrow.
    #[must_use]
    pub fn tip(&self) -> Point3<f64> {
        self.position + self.direction * Self::ARROW_SIZE
    }
}

/// Borrowed, read-only view of the spots produced by the last projection.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedSpots<'a> {
    spots: &'a SpotSet,
}

impl<'a> SimulatedSpots<'a> {
    /// Wraps a spot set.
    #[must_use]
    pub const fn new(spots: &'a SpotSet) -> Self {
        Self { spots }
    }

    /// Number of spots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Checks whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Returns the spot at `position` in output order.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a Spot> {
        self.spots.get(position)
    }

    /// Iterates over the spots in output order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Spot> + 'a {
        self.spots.iter()
    }

    /// Iterates over one marker per spot, in output order.
    pub fn markers(&self) -> impl Iterator<Item = DebugMarker> + 'a {
        self.spots.iter().map(DebugMarker::for_spot)
    }

    /// Copies the viewed spots into an independently owned set.
    #[must_use]
    pub fn to_spot_set(&self) -> SpotSet {
        self.spots.clone()
    }
}
