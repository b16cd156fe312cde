//! The conform-spots pipeline node.
//!
//! [`ConformSpots`] is the piece a generator pipeline holds on to: it keeps
//! the user-editable [`ProjectionConfig`], the last projection, and a revision
//! counter that moves whenever the configuration changes. Deciding *when* to
//! recompute belongs to the orchestrator, which keeps a [`RecomputeGate`] and
//! passes a [`RecomputeContext`] on every pull.
//!
//! # Example
//!
//! ```
//! use spot_conform::{ConformSpots, RecomputeContext, RecomputeGate, Surface, SurfaceSet};
//! use spot_types::{Spot, SpotSet};
//! use nalgebra::Point3;
//!
//! let scene = SurfaceSet::new().with_surface(Surface::ground(0.0), 0)?;
//! let spots = SpotSet::from_spots(vec![Spot::at(0, Point3::new(0.0, 5.0, 0.0))]);
//!
//! let mut module = ConformSpots::new();
//! let mut gate = RecomputeGate::new();
//! let ctx = RecomputeContext::new(Some(&spots), 1, &scene);
//!
//! assert!(module.refresh_if_needed(&mut gate, &ctx).is_some());
//! // Nothing changed, nothing to do
//! assert!(module.refresh_if_needed(&mut gate, &ctx).is_none());
//!
//! module.set_offset(-1.0);
//! let output = module.refresh_if_needed(&mut gate, &ctx).unwrap();
//! assert_eq!(output[0].position, Point3::new(0.0, 1.0, 0.0));
//! # Ok::<(), spot_conform::ConformError>(())
//! ```

use nalgebra::Vector3;
use spot_types::{LayerMask, SpotSet};
use tracing::debug;

use crate::Result;
use crate::config::ProjectionConfig;
use crate::debug::SimulatedSpots;
use crate::projector::{Projection, ProjectionStats, project};
use crate::query::SurfaceQuery;

/// Inputs for one recompute, assembled by the orchestrator on each pull.
#[derive(Debug)]
pub struct RecomputeContext<'a, Q: ?Sized> {
    /// Upstream spots. `None` (unconnected input) is treated as zero spots.
    pub input: Option<&'a SpotSet>,
    /// Revision of `input` as tracked by the orchestrator.
    pub input_revision: u64,
    /// Raycast backend for this recompute.
    pub query: &'a Q,
}

impl<'a, Q: ?Sized> RecomputeContext<'a, Q> {
    /// Creates a context.
    #[must_use]
    pub const fn new(input: Option<&'a SpotSet>, input_revision: u64, query: &'a Q) -> Self {
        Self {
            input,
            input_revision,
            query,
        }
    }
}

/// Remembers which revisions a module's cached output was computed from.
///
/// Owned by the orchestrator, one per module. A fresh gate always asks for a
/// recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecomputeGate {
    seen: Option<(u64, u64)>,
}

impl RecomputeGate {
    /// Creates a gate that has seen nothing yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { seen: None }
    }

    /// Checks whether the given revisions differ from the last recorded ones.
    #[must_use]
    pub fn needs_refresh(&self, config_revision: u64, input_revision: u64) -> bool {
        self.seen != Some((config_revision, input_revision))
    }

    /// Records that output was computed from these revisions.
    pub fn mark_clean(&mut self, config_revision: u64, input_revision: u64) {
        self.seen = Some((config_revision, input_revision));
    }

    /// Forgets the recorded revisions so the next check asks for a recompute.
    pub fn invalidate(&mut self) {
        self.seen = None;
    }
}

/// Pipeline node that snaps spots onto the surface beneath them.
///
/// The output slot is always set: empty before the first refresh, after
/// [`clear`](Self::clear), and when projection is disabled.
#[derive(Debug, Clone, Default)]
pub struct ConformSpots {
    config: ProjectionConfig,
    revision: u64,
    projection: Projection,
}

impl ConformSpots {
    /// Creates a module with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a module with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::NonFinite`](crate::ConformError::NonFinite) if
    /// any field is NaN or infinite.
    pub fn with_config(config: ProjectionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Configuration revision. Changes whenever the configuration changes or
    /// the module is reset.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets the raycast direction.
    pub fn set_direction(&mut self, direction: Vector3<f64>) {
        let changed = self
            .config
            .direction
            .iter()
            .zip(direction.iter())
            .any(|(a, b)| a.to_bits() != b.to_bits());
        if changed {
            self.config.direction = direction;
            self.bump();
        }
    }

    /// Sets the maximum raycast distance.
    pub fn set_max_distance(&mut self, max_distance: f64) {
        if self.config.max_distance.to_bits() != max_distance.to_bits() {
            self.config.max_distance = max_distance;
            self.bump();
        }
    }

    /// Sets the offset along the raycast direction.
    pub fn set_offset(&mut self, offset: f64) {
        if self.config.offset.to_bits() != offset.to_bits() {
            self.config.offset = offset;
            self.bump();
        }
    }

    /// Sets which surface layers the raycast may hit.
    pub fn set_layer_mask(&mut self, layer_mask: LayerMask) {
        if self.config.layer_mask != layer_mask {
            self.config.layer_mask = layer_mask;
            self.bump();
        }
    }

    /// Replaces the whole configuration, after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::NonFinite`](crate::ConformError::NonFinite) if
    /// any field is NaN or infinite; the current configuration is kept.
    pub fn try_set_config(&mut self, config: ProjectionConfig) -> Result<()> {
        config.validate()?;
        if self.config != config {
            self.config = config;
            self.bump();
        }
        Ok(())
    }

    /// Restores the default configuration (cast straight down, 200 units,
    /// no offset, default layer only).
    pub fn reset(&mut self) {
        self.config = ProjectionConfig::default();
        self.bump();
        debug!(revision = self.revision, "Reset conform spots config");
    }

    /// Empties the output and simulated spots.
    ///
    /// The revision is left alone, so the output stays empty until the
    /// configuration or the input moves.
    pub fn clear(&mut self) {
        debug!(dropped = self.count(), "Cleared conform spots");
        self.projection = Projection::empty();
    }

    /// Number of spots in the output slot.
    #[must_use]
    pub fn count(&self) -> usize {
        self.projection.output().len()
    }

    /// The output slot.
    #[must_use]
    pub const fn output(&self) -> &SpotSet {
        self.projection.output()
    }

    /// Read-only view of the output for debug visualization.
    #[must_use]
    pub const fn simulated(&self) -> SimulatedSpots<'_> {
        self.projection.simulated()
    }

    /// Counters from the last refresh.
    #[must_use]
    pub const fn last_stats(&self) -> ProjectionStats {
        self.projection.stats()
    }

    /// Recomputes the output from `ctx` and returns it.
    pub fn refresh<Q>(&mut self, ctx: &RecomputeContext<'_, Q>) -> &SpotSet
    where
        Q: SurfaceQuery + ?Sized,
    {
        let empty = SpotSet::new();
        let input = ctx.input.unwrap_or(&empty);
        self.projection = project(input, &self.config, ctx.query);

        debug!(
            revision = self.revision,
            input_revision = ctx.input_revision,
            count = self.count(),
            "Refreshed conform spots"
        );
        self.projection.output()
    }

    /// Recomputes only if `gate` says the configuration or input moved since
    /// the last recompute.
    ///
    /// Returns the new output if a recompute ran.
    pub fn refresh_if_needed<Q>(
        &mut self,
        gate: &mut RecomputeGate,
        ctx: &RecomputeContext<'_, Q>,
    ) -> Option<&SpotSet>
    where
        Q: SurfaceQuery + ?Sized,
    {
        if !gate.needs_refresh(self.revision, ctx.input_revision) {
            return None;
        }
        gate.mark_clean(self.revision, ctx.input_revision);
        Some(self.refresh(ctx))
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
