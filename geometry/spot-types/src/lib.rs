//! Spot placement records for spline-driven object placement.
//!
//! A *spot* is the final transform of one placed object: where it sits, how it
//! is oriented and scaled, and which slot of the placement sequence it came
//! from. Generators emit ordered [`SpotSet`]s; modifiers such as surface
//! conforming consume one set and produce a new one.
//!
//! - [`Spot`] - Position, rotation, scale and stable index of one placement
//! - [`SpotSet`] - Ordered collection of spots (order is placement order)
//! - [`LayerMask`] - 32-layer bitset selecting which surfaces participate in queries
//!
//! # Layer 0 Crate
//!
//! This crate has **zero engine dependencies** and only depends on `nalgebra`
//! for its math types.
//!
//! # Example
//!
//! ```
//! use spot_types::{LayerMask, Spot, SpotSet};
//! use nalgebra::Point3;
//!
//! let spots: SpotSet = (0..3)
//!     .map(|i| Spot::at(i, Point3::new(i as f64, 5.0, 0.0)))
//!     .collect();
//! assert_eq!(spots.len(), 3);
//! assert_eq!(spots.indices().collect::<Vec<_>>(), vec![0, 1, 2]);
//!
//! let mask = LayerMask::DEFAULT.with_layer(8).unwrap();
//! assert!(mask.contains(0));
//! assert!(mask.contains(8));
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod layer;
mod set;
mod spot;

pub use error::SpotError;
pub use layer::LayerMask;
pub use set::SpotSet;
pub use spot::Spot;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Result type for spot operations.
pub type Result<T> = std::result::Result<T, SpotError>;
