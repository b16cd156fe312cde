//! The surface query seam.
//!
//! Projection does not know what a surface is. It asks a [`SurfaceQuery`] for
//! the first hit along a ray, and the implementor decides how to answer: a
//! physics engine's collision world, a terrain heightfield, or the analytic
//! [`SurfaceSet`](crate::SurfaceSet) shipped with this crate.

use std::rc::Rc;
use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use spot_types::LayerMask;

/// A ray defined by an origin point and a direction vector.
///
/// The direction does not need to be normalized.
///
/// # Example
///
/// ```
/// use spot_conform::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), Vector3::new(0.0, -2.0, 0.0));
///
/// assert_eq!(ray.unit_direction(), Some(Vector3::new(0.0, -1.0, 0.0)));
/// assert_eq!(ray.point_at_distance(5.0), Some(Point3::origin()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin of the ray.
    pub origin: Point3<f64>,
    /// The direction of the ray (not necessarily normalized).
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Creates a new ray with the given origin and direction.
    #[must_use]
    pub const fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// Returns the direction normalized to unit length.
    ///
    /// Returns `None` for a zero or non-finite direction.
    #[must_use]
    pub fn unit_direction(&self) -> Option<Vector3<f64>> {
        let norm = self.direction.norm();
        if norm < f64::EPSILON || !norm.is_finite() {
            return None;
        }
        Some(self.direction / norm)
    }

    /// Returns the point `distance` world units along the ray.
    ///
    /// Returns `None` if the direction cannot be normalized.
    #[must_use]
    pub fn point_at_distance(&self, distance: f64) -> Option<Point3<f64>> {
        self.unit_direction().map(|dir| self.origin + dir * distance)
    }
}

/// The first surface a ray ran into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Distance from the ray origin to the hit point, in world units.
    pub distance: f64,
    /// Hit point in world coordinates.
    pub point: Point3<f64>,
    /// Surface normal at the hit point, facing the ray origin.
    pub normal: Vector3<f64>,
    /// Layer of the surface that was hit.
    pub layer: u32,
}

impl SurfaceHit {
    /// Create a new surface hit.
    #[must_use]
    pub const fn new(distance: f64, point: Point3<f64>, normal: Vector3<f64>, layer: u32) -> Self {
        Self {
            distance,
            point,
            normal,
            layer,
        }
    }
}

/// A source of raycast answers against a scene.
///
/// # Contract
///
/// - `distance` is measured in world units along the normalized ray direction,
///   like a physics engine's raycast, regardless of the length of
///   `ray.direction`.
/// - Only hits with `0 <= distance <= max_distance` on a layer selected by
///   `layers` are reported; the nearest one wins.
/// - Answers are deterministic for an unchanged scene.
///
/// Implementations that can fault (a scene that is not loaded yet, a
/// disconnected physics server) report that through their own channel; the
/// projector treats `None` as "nothing to land on" and drops the spot.
///
/// # Example
///
/// ```
/// use spot_conform::{Ray, SurfaceHit, SurfaceQuery};
/// use spot_types::LayerMask;
/// use nalgebra::{Point3, Vector3};
///
/// /// Infinite floor at y = 0 on every layer.
/// struct Floor;
///
/// impl SurfaceQuery for Floor {
///     fn raycast(&self, ray: &Ray, max_distance: f64, _layers: LayerMask) -> Option<SurfaceHit> {
///         let dir = ray.unit_direction()?;
///         if dir.y >= 0.0 {
///             return None;
///         }
///         let distance = ray.origin.y / -dir.y;
///         (distance <= max_distance).then(|| {
///             SurfaceHit::new(distance, ray.origin + dir * distance, Vector3::y(), 0)
///         })
///     }
/// }
///
/// let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), -Vector3::y());
/// assert_eq!(Floor.raycast(&ray, 200.0, LayerMask::ALL).map(|h| h.distance), Some(5.0));
/// assert!(Floor.raycast(&ray, 3.0, LayerMask::ALL).is_none());
/// ```
pub trait SurfaceQuery {
    /// Cast `ray` and return the nearest hit within `max_distance` on `layers`.
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit>;
}

impl<Q: SurfaceQuery + ?Sized> SurfaceQuery for &Q {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, layers)
    }
}

impl<Q: SurfaceQuery + ?Sized> SurfaceQuery for Box<Q> {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, layers)
    }
}

impl<Q: SurfaceQuery + ?Sized> SurfaceQuery for Rc<Q> {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, layers)
    }
}

impl<Q: SurfaceQuery + ?Sized> SurfaceQuery for Arc<Q> {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        (**self).raycast(ray, max_distance, layers)
    }
}
