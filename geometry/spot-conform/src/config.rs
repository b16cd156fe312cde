//! Parameters for spot projection.

use nalgebra::Vector3;
use spot_types::LayerMask;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::ConformError;

/// Parameters for projecting spots onto surfaces.
///
/// All fields may hold degenerate values. A zero `direction` or a
/// non-positive `max_distance` disables projection rather than being an error;
/// the projector performs no clamping or normalization of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProjectionConfig {
    /// Raycast direction in world space. Zero disables projection.
    ///
    /// Used as given when displacing spots, so a non-unit direction scales
    /// the displacement. Default: `(0, -1, 0)`
    pub direction: Vector3<f64>,

    /// Maximum raycast distance in world units. `<= 0` disables projection.
    /// Default: 200.0
    pub max_distance: f64,

    /// Signed displacement along `direction` applied on top of the hit
    /// distance. Positive values push spots past the surface, negative
    /// values leave them short of it. Default: 0.0
    pub offset: f64,

    /// Surface layers the raycast may hit. Default: layer 0 only
    pub layer_mask: LayerMask,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            direction: Self::DEFAULT_DIRECTION,
            max_distance: Self::DEFAULT_MAX_DISTANCE,
            offset: 0.0,
            layer_mask: LayerMask::DEFAULT,
        }
    }
}

impl ProjectionConfig {
    /// Default raycast direction (straight down).
    pub const DEFAULT_DIRECTION: Vector3<f64> = Vector3::new(0.0, -1.0, 0.0);

    /// Default maximum raycast distance.
    pub const DEFAULT_MAX_DISTANCE: f64 = 200.0;

    /// Create params casting along `direction` with default distance and layers.
    #[must_use]
    pub fn along(direction: Vector3<f64>) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Create params with projection switched off.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_distance: 0.0,
            ..Default::default()
        }
    }

    /// Set the raycast direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: Vector3<f64>) -> Self {
        self.direction = direction;
        self
    }

    /// Set the maximum raycast distance.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the offset along the direction.
    #[must_use]
    pub const fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Set the layer mask.
    #[must_use]
    pub const fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    /// Checks whether these params would issue any raycasts.
    ///
    /// False for a zero direction and for a `max_distance` that is not
    /// strictly positive (NaN included).
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        // NaN fails the comparison and so counts as disabled
        self.direction != Vector3::zeros() && self.max_distance > 0.0
    }

    /// Check that every field holds a finite value.
    ///
    /// Degenerate but finite values (zero direction, negative distance) pass;
    /// they are a defined way of disabling projection.
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::NonFinite`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        for (axis, value) in ["direction.x", "direction.y", "direction.z"]
            .into_iter()
            .zip(self.direction.iter())
        {
            if !value.is_finite() {
                return Err(ConformError::non_finite(axis, *value));
            }
        }
        if !self.max_distance.is_finite() {
            return Err(ConformError::non_finite("max_distance", self.max_distance));
        }
        if !self.offset.is_finite() {
            return Err(ConformError::non_finite("offset", self.offset));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = ProjectionConfig::default();
        assert_eq!(params.direction, Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(params.max_distance, 200.0);
        assert_eq!(params.offset, 0.0);
        assert_eq!(params.layer_mask.bits(), 1);
        assert!(params.is_enabled());
    }

    #[test]
    fn test_disabled() {
        assert!(!ProjectionConfig::disabled().is_enabled());
        assert!(!ProjectionConfig::along(Vector3::zeros()).is_enabled());
        assert!(
            !ProjectionConfig::default()
                .with_max_distance(-1.0)
                .is_enabled()
        );
        assert!(
            !ProjectionConfig::default()
                .with_max_distance(f64::NAN)
                .is_enabled()
        );
    }

    #[test]
    fn test_builder() {
        let params = ProjectionConfig::default()
            .with_direction(Vector3::new(1.0, 0.0, 0.0))
            .with_max_distance(3.0)
            .with_offset(-0.5)
            .with_layer_mask(LayerMask::ALL);

        assert_eq!(params.direction, Vector3::x());
        assert_eq!(params.max_distance, 3.0);
        assert_eq!(params.offset, -0.5);
        assert_eq!(params.layer_mask, LayerMask::ALL);
    }

    #[test]
    fn test_validate() {
        assert!(ProjectionConfig::default().validate().is_ok());
        // Degenerate but finite is fine
        assert!(ProjectionConfig::disabled().validate().is_ok());

        let err = ProjectionConfig::default()
            .with_offset(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConformError::NonFinite { field: "offset", .. }));

        let err = ProjectionConfig::along(Vector3::new(0.0, f64::INFINITY, 0.0))
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConformError::NonFinite {
                field: "direction.y",
                ..
            }
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_fills_defaults() {
        let params: ProjectionConfig = serde_json::from_str(r#"{"offset": 1.5}"#).unwrap();
        assert_eq!(params.offset, 1.5);
        assert_eq!(params.max_distance, 200.0);
        assert_eq!(params.layer_mask, LayerMask::DEFAULT);
    }
}
