//! Conform placed spots onto collision surfaces.
//!
//! Spline-driven placement produces spots (object transforms) whose final
//! positions are only known after randomization and offsets. This crate
//! drops those spots onto the ground, or any other surface, after the fact:
//! every spot is raycast along a configured direction and moved to the first
//! hit, plus a signed offset. Spots with nothing beneath them are discarded.
//!
//! - [`project`] - The projection pass over a [`SpotSet`]
//! - [`ProjectionConfig`] - Direction, distance, offset and layer mask
//! - [`SurfaceQuery`] - The raycast seam to a physics or collision backend
//! - [`SurfaceSet`] - Analytic, layered surfaces implementing [`SurfaceQuery`]
//! - [`ConformSpots`] - The pipeline node with revision-based dirty tracking
//! - [`SimulatedSpots`] / [`DebugMarker`] - Read-only output for debug viewers
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Physics engines
//! plug in by implementing [`SurfaceQuery`].
//!
//! # Example
//!
//! ```
//! use spot_conform::{ProjectionConfig, Surface, SurfaceSet, project};
//! use spot_types::{Spot, SpotSet};
//! use nalgebra::Point3;
//!
//! let scene = SurfaceSet::new()
//!     .with_surface(Surface::ground(0.0), 0)?
//!     .with_surface(Surface::sphere(Point3::new(10.0, 0.0, 0.0), 2.0), 0)?;
//!
//! let spots: SpotSet = [0.0, 10.0, 100.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &x)| Spot::at(i, Point3::new(x, 5.0, 0.0)))
//!     .collect();
//!
//! let result = project(&spots, &ProjectionConfig::default(), &scene);
//! let heights: Vec<f64> = result.output().iter().map(|s| s.position.y).collect();
//! assert_eq!(heights, vec![0.0, 2.0, 0.0]);
//! # Ok::<(), spot_conform::ConformError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for [`ProjectionConfig`]

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod config;
mod debug;
mod error;
mod module;
mod projector;
mod query;
mod surface;

pub use config::ProjectionConfig;
pub use debug::{DebugMarker, SimulatedSpots};
pub use error::ConformError;
pub use module::{ConformSpots, RecomputeContext, RecomputeGate};
pub use projector::{Projection, ProjectionStats, project};
pub use query::{Ray, SurfaceHit, SurfaceQuery};
pub use surface::{Surface, SurfaceEntry, SurfaceSet, TriangleMesh};

// Re-export spot types for convenience
pub use spot_types::{LayerMask, Spot, SpotSet};

/// Result type for conform operations.
pub type Result<T> = std::result::Result<T, ConformError>;
