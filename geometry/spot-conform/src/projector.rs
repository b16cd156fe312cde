//! Spot projection onto surfaces.
//!
//! Each spot is cast along the configured direction and moved onto the first
//! surface it hits, then displaced by the configured offset:
//!
//! ```text
//! position' = position + direction * (hit_distance + offset)
//! ```
//!
//! Spots whose ray hits nothing are dropped rather than left floating where
//! they were generated. Rotation, scale and index are carried over unchanged.

use std::fmt;

use spot_types::SpotSet;
use tracing::{debug, info, trace};

use crate::config::ProjectionConfig;
use crate::debug::SimulatedSpots;
use crate::query::{Ray, SurfaceQuery};

/// Counters describing one projection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    /// Number of raycasts issued.
    pub queried: usize,
    /// Number of spots that landed on a surface.
    pub hits: usize,
    /// Number of spots dropped because their ray hit nothing.
    pub dropped: usize,
}

impl ProjectionStats {
    /// Check if projection ran at all (at least one raycast was issued).
    #[must_use]
    pub const fn was_projected(&self) -> bool {
        self.queried > 0
    }
}

/// Result of projecting a spot set.
///
/// Owns the authoritative output. The simulated collection read by debug
/// viewers is a view over the same spots, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    output: SpotSet,
    stats: ProjectionStats,
}

impl Projection {
    /// An empty projection, as produced when projection is disabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            output: SpotSet::new(),
            stats: ProjectionStats {
                queried: 0,
                hits: 0,
                dropped: 0,
            },
        }
    }

    /// The projected spots, in input order minus dropped spots.
    #[must_use]
    pub const fn output(&self) -> &SpotSet {
        &self.output
    }

    /// Read-only view of the projected spots for debug visualization.
    #[must_use]
    pub const fn simulated(&self) -> SimulatedSpots<'_> {
        SimulatedSpots::new(&self.output)
    }

    /// Counters for this pass.
    #[must_use]
    pub const fn stats(&self) -> ProjectionStats {
        self.stats
    }

    /// Consumes the projection, returning the output spots.
    #[must_use]
    pub fn into_output(self) -> SpotSet {
        self.output
    }

    /// Consumes the projection, returning independently owned
    /// `(output, simulated)` collections with identical contents.
    #[must_use]
    pub fn into_parts(self) -> (SpotSet, SpotSet) {
        let simulated = self.output.clone();
        (self.output, simulated)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Projection: {} → {} spots ({} dropped)",
            self.stats.queried,
            self.output.len(),
            self.stats.dropped
        )
    }
}

/// Project every spot in `input` onto the surfaces answered by `query`.
///
/// # Arguments
///
/// * `input` - Spots to project, in placement order
/// * `config` - Projection parameters
/// * `query` - Raycast backend
///
/// # Returns
///
/// A [`Projection`] with the landed spots. If the direction is zero,
/// `max_distance <= 0`, or `input` is empty, no raycasts are issued and the
/// projection is empty.
///
/// # Example
///
/// ```
/// use spot_conform::{ProjectionConfig, Surface, SurfaceSet, project};
/// use spot_types::{Spot, SpotSet};
/// use nalgebra::Point3;
///
/// let scene = SurfaceSet::new().with_surface(Surface::ground(0.0), 0)?;
/// let spots = SpotSet::from_spots(vec![Spot::at(0, Point3::new(0.0, 5.0, 0.0))]);
///
/// let result = project(&spots, &ProjectionConfig::default().with_offset(-1.0), &scene);
/// assert_eq!(result.output()[0].position, Point3::new(0.0, 1.0, 0.0));
/// # Ok::<(), spot_conform::ConformError>(())
/// ```
#[must_use]
pub fn project<Q>(input: &SpotSet, config: &ProjectionConfig, query: &Q) -> Projection
where
    Q: SurfaceQuery + ?Sized,
{
    if input.is_empty() || !config.is_enabled() {
        debug!(
            spots = input.len(),
            enabled = config.is_enabled(),
            "Skipping spot projection"
        );
        return Projection::empty();
    }

    let mut output = SpotSet::with_capacity(input.len());
    for spot in input {
        let ray = Ray::new(spot.position, config.direction);
        match query.raycast(&ray, config.max_distance, config.layer_mask) {
            Some(hit) => {
                let displacement = config.direction * (hit.distance + config.offset);
                output.push(spot.translated(&displacement));
            }
            None => trace!(index = spot.index, "No surface hit, dropping spot"),
        }
    }

    let stats = ProjectionStats {
        queried: input.len(),
        hits: output.len(),
        dropped: input.len() - output.len(),
    };

    if stats.dropped > 0 {
        info!(
            spots = stats.queried,
            hits = stats.hits,
            dropped = stats.dropped,
            "Dropped spots with no surface to land on"
        );
    } else {
        debug!(spots = stats.queried, "Projected all spots");
    }

    Projection { output, stats }
}
