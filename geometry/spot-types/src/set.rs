//! Ordered spot collections.

use std::ops::Index;
use std::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::spot::Spot;

/// An ordered collection of spots.
///
/// Order is significant: it is the placement order seen by downstream
/// consumers and is what index-based debug labels follow. A `SpotSet` owns its
/// spots; cloning one never shares storage with the original.
///
/// # Example
///
/// ```
/// use spot_types::{Spot, SpotSet};
/// use nalgebra::Point3;
///
/// let mut spots = SpotSet::new();
/// spots.push(Spot::at(0, Point3::new(0.0, 5.0, 0.0)));
/// spots.push(Spot::at(2, Point3::new(2.0, 5.0, 0.0)));
///
/// assert_eq!(spots.len(), 2);
/// assert_eq!(spots[1].index, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpotSet {
    spots: Vec<Spot>,
}

impl SpotSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { spots: Vec::new() }
    }

    /// Creates an empty set with room for `capacity` spots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spots: Vec::with_capacity(capacity),
        }
    }

    /// Creates a set from spots in placement order.
    #[must_use]
    pub const fn from_spots(spots: Vec<Spot>) -> Self {
        Self { spots }
    }

    /// Number of spots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// Checks whether the set has no spots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Returns the spot at `position` in placement order.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Spot> {
        self.spots.get(position)
    }

    /// Appends a spot.
    pub fn push(&mut self, spot: Spot) {
        self.spots.push(spot);
    }

    /// Removes all spots.
    pub fn clear(&mut self) {
        self.spots.clear();
    }

    /// Iterates over the spots in placement order.
    pub fn iter(&self) -> slice::Iter<'_, Spot> {
        self.spots.iter()
    }

    /// Iterates over the spots' stable indices in placement order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.spots.iter().map(|spot| spot.index)
    }

    /// Returns the spots as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Spot] {
        &self.spots
    }

    /// Consumes the set, returning the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Spot> {
        self.spots
    }
}

impl Index<usize> for SpotSet {
    type Output = Spot;

    fn index(&self, position: usize) -> &Spot {
        &self.spots[position]
    }
}

impl From<Vec<Spot>> for SpotSet {
    fn from(spots: Vec<Spot>) -> Self {
        Self::from_spots(spots)
    }
}

impl FromIterator<Spot> for SpotSet {
    fn from_iter<I: IntoIterator<Item = Spot>>(iter: I) -> Self {
        Self {
            spots: iter.into_iter().collect(),
        }
    }
}

impl Extend<Spot> for SpotSet {
    fn extend<I: IntoIterator<Item = Spot>>(&mut self, iter: I) {
        self.spots.extend(iter);
    }
}

impl IntoIterator for SpotSet {
    type Item = Spot;
    type IntoIter = std::vec::IntoIter<Spot>;

    fn into_iter(self) -> Self::IntoIter {
        self.spots.into_iter()
    }
}

impl<'a> IntoIterator for &'a SpotSet {
    type Item = &'a Spot;
    type IntoIter = slice::Iter<'a, Spot>;

    fn into_iter(self) -> Self::IntoIter {
        self.spots.iter()
    }
}
