//! Analytic surfaces for raycasting.
//!
//! [`SurfaceSet`] is a small, self-contained [`SurfaceQuery`] backend: a list
//! of layered primitives answered with closed-form ray intersections. It is
//! what tools and tests use when no physics engine is around.
//!
//! # Supported Shapes
//!
//! - Plane: Analytic ray-plane intersection (two-sided)
//! - Sphere: Analytic ray-sphere intersection
//! - Box: Ray-AABB slab test
//! - Triangle: Möller–Trumbore
//! - `TriangleMesh`: Nearest triangle, brute force
//!
//! A ray that starts inside a sphere or box does not hit it, the same way
//! collision raycasts ignore colliders containing their origin.

// Allow suspicious_operation_groupings - false positive for quadratic discriminant formula b*b - c
// Allow many_single_char_names - standard notation for Möller-Trumbore algorithm
#![allow(clippy::suspicious_operation_groupings, clippy::many_single_char_names)]

use nalgebra::{Point3, Vector3};
use spot_types::LayerMask;

use crate::Result;
use crate::error::ConformError;
use crate::query::{Ray, SurfaceHit, SurfaceQuery};

const EPSILON: f64 = 1e-10;

/// Intersection of a ray with one primitive, before a layer is attached.
#[derive(Debug, Clone, Copy)]
struct LocalHit {
    distance: f64,
    point: Point3<f64>,
    normal: Vector3<f64>,
}

/// An indexed triangle mesh used as a raycast target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as indices into `vertices`. Out-of-range faces are skipped.
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh from vertices and faces.
    #[must_use]
    pub const fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Creates a regular grid of quads in the XZ plane, with heights from `height`.
    ///
    /// The grid has `cells_x * cells_z` quads of size `cell_size`, starting at
    /// `origin` (the corner with the smallest x and z). Useful for terrain-like
    /// fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::GridTooLarge`] if the vertex count does not fit
    /// in the `u32` face indices.
    pub fn height_grid<F>(
        origin: Point3<f64>,
        cells_x: u32,
        cells_z: u32,
        cell_size: f64,
        height: F,
    ) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let vertex_count = (u64::from(cells_x) + 1)
            .checked_mul(u64::from(cells_z) + 1)
            .and_then(|count| u32::try_from(count).ok())
            .ok_or(ConformError::GridTooLarge { cells_x, cells_z })?;

        // Every index below is < vertex_count, so u32 arithmetic cannot overflow
        let stride = cells_x + 1;
        let mut vertices = Vec::with_capacity(vertex_count as usize);
        for iz in 0..=cells_z {
            for ix in 0..=cells_x {
                let x = origin.x + f64::from(ix) * cell_size;
                let z = origin.z + f64::from(iz) * cell_size;
                vertices.push(Point3::new(x, origin.y + height(x, z), z));
            }
        }

        let mut faces = Vec::with_capacity((cells_x as usize).saturating_mul(cells_z as usize).saturating_mul(2));
        for iz in 0..cells_z {
            for ix in 0..cells_x {
                let v00 = iz * stride + ix;
                let v10 = v00 + 1;
                let v01 = v00 + stride;
                let v11 = v01 + 1;
                faces.push([v00, v01, v10]);
                faces.push([v10, v01, v11]);
            }
        }

        Ok(Self { vertices, faces })
    }

    fn triangle(&self, face: [u32; 3]) -> Option<[Point3<f64>; 3]> {
        let vertex = |i: u32| self.vertices.get(i as usize).copied();
        Some([vertex(face[0])?, vertex(face[1])?, vertex(face[2])?])
    }
}

/// A raycast target primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Infinite plane through `point` with normal `normal`. Hit from both sides.
    Plane {
        /// Any point on the plane.
        point: Point3<f64>,
        /// Plane normal (need not be unit length).
        normal: Vector3<f64>,
    },
    /// Solid sphere.
    Sphere {
        /// Sphere center.
        center: Point3<f64>,
        /// Sphere radius.
        radius: f64,
    },
    /// Solid axis-aligned box.
    Aabb {
        /// Minimum corner.
        min: Point3<f64>,
        /// Maximum corner.
        max: Point3<f64>,
    },
    /// Single triangle, hit from both sides.
    Triangle {
        /// First vertex.
        a: Point3<f64>,
        /// Second vertex.
        b: Point3<f64>,
        /// Third vertex.
        c: Point3<f64>,
    },
    /// Triangle mesh, hit from both sides.
    Mesh(TriangleMesh),
}

impl Surface {
    /// Creates a plane surface.
    #[must_use]
    pub const fn plane(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self::Plane { point, normal }
    }

    /// Creates a horizontal plane at height `y`.
    #[must_use]
    pub fn ground(y: f64) -> Self {
        Self::plane(Point3::new(0.0, y, 0.0), Vector3::y())
    }

    /// Creates a sphere surface.
    #[must_use]
    pub const fn sphere(center: Point3<f64>, radius: f64) -> Self {
        Self::Sphere { center, radius }
    }

    /// Creates a box from two corners in any order.
    #[must_use]
    pub fn aabb(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self::Aabb {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates a triangle surface.
    #[must_use]
    pub const fn triangle(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        Self::Triangle { a, b, c }
    }

    fn raycast(&self, origin: Point3<f64>, dir: Vector3<f64>, max_distance: f64) -> Option<LocalHit> {
        match self {
            Self::Plane { point, normal } => raycast_plane(point, normal, origin, dir, max_distance),
            Self::Sphere { center, radius } => {
                raycast_sphere(*center, *radius, origin, dir, max_distance)
            }
            Self::Aabb { min, max } => raycast_aabb(min, max, origin, dir, max_distance),
            Self::Triangle { a, b, c } => {
                raycast_triangle(origin, dir, *a, *b, *c, max_distance)
            }
            Self::Mesh(mesh) => mesh
                .faces
                .iter()
                .filter_map(|&face| mesh.triangle(face))
                .filter_map(|[a, b, c]| raycast_triangle(origin, dir, a, b, c, max_distance))
                .fold(None, nearest),
        }
    }
}

impl From<TriangleMesh> for Surface {
    fn from(mesh: TriangleMesh) -> Self {
        Self::Mesh(mesh)
    }
}

/// A surface assigned to a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEntry {
    /// The primitive.
    pub surface: Surface,
    /// Layer the primitive lives on, in `0..32`.
    pub layer: u32,
}

/// A layered collection of analytic surfaces answering [`SurfaceQuery`].
///
/// # Example
///
/// ```
/// use spot_conform::{Ray, Surface, SurfaceQuery, SurfaceSet};
/// use spot_types::LayerMask;
/// use nalgebra::{Point3, Vector3};
///
/// let scene = SurfaceSet::new()
///     .with_surface(Surface::ground(0.0), 0)?
///     .with_surface(Surface::ground(2.0), 5)?;
///
/// let ray = Ray::new(Point3::new(0.0, 5.0, 0.0), -Vector3::y());
///
/// // Only layer 0 is eligible, so the closer plane on layer 5 is ignored
/// let hit = scene.raycast(&ray, 200.0, LayerMask::DEFAULT).unwrap();
/// assert_eq!(hit.distance, 5.0);
/// assert_eq!(hit.layer, 0);
///
/// let hit = scene.raycast(&ray, 200.0, LayerMask::ALL).unwrap();
/// assert_eq!(hit.distance, 3.0);
/// # Ok::<(), spot_conform::ConformError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceSet {
    entries: Vec<SurfaceEntry>,
}

impl SurfaceSet {
    /// Creates an empty set. Every raycast against it misses.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a surface on `layer`.
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::Spot`] if `layer >= 32`.
    pub fn add(&mut self, surface: impl Into<Surface>, layer: u32) -> Result<()> {
        LayerMask::layer(layer)?;
        self.entries.push(SurfaceEntry {
            surface: surface.into(),
            layer,
        });
        Ok(())
    }

    /// Builder form of [`Self::add`].
    ///
    /// # Errors
    ///
    /// Returns [`ConformError::Spot`] if `layer >= 32`.
    pub fn with_surface(
        mut self,
        surface: impl Into<Surface>,
        layer: u32,
    ) -> Result<Self> {
        self.add(surface, layer)?;
        Ok(self)
    }

    /// Removes every surface on `layer`, returning how many were removed.
    pub fn remove_layer(&mut self, layer: u32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.layer != layer);
        before - self.entries.len()
    }

    /// Removes all surfaces.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the set has no surfaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the surfaces in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SurfaceEntry> {
        self.entries.iter()
    }

    /// Mask of every layer that holds at least one surface.
    #[must_use]
    pub fn occupied_layers(&self) -> LayerMask {
        self.entries
            .iter()
            .fold(LayerMask::NONE, |mask, entry| {
                mask | LayerMask::from_bits(1 << entry.layer)
            })
    }
}

impl SurfaceQuery for SurfaceSet {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        let dir = ray.unit_direction()?;
        // NaN fails the comparison and so never hits
        if !(max_distance >= 0.0) {
            return None;
        }

        let mut best: Option<SurfaceHit> = None;
        for entry in self.entries.iter().filter(|e| layers.contains(e.layer)) {
            if let Some(hit) = entry.surface.raycast(ray.origin, dir, max_distance) {
                // Ties keep the surface added first
                if best.is_none_or(|b| hit.distance < b.distance) {
                    best = Some(SurfaceHit::new(hit.distance, hit.point, hit.normal, entry.layer));
                }
            }
        }
        best
    }
}

fn nearest(best: Option<LocalHit>, hit: LocalHit) -> Option<LocalHit> {
    match best {
        Some(b) if b.distance <= hit.distance => Some(b),
        _ => Some(hit),
    }
}

/// Safe vector normalization with fallback.
#[inline]
fn safe_normalize(v: &Vector3<f64>, fallback: Vector3<f64>) -> Vector3<f64> {
    let n = v.norm();
    if n > EPSILON { v / n } else { fallback }
}

fn raycast_plane(
    plane_point: &Point3<f64>,
    plane_normal: &Vector3<f64>,
    origin: Point3<f64>,
    dir: Vector3<f64>,
    max_distance: f64,
) -> Option<LocalHit> {
    let normal = plane_normal.try_normalize(EPSILON)?;
    let denom = normal.dot(&dir);

    // Parallel to plane (or NaN)
    if !(denom.abs() >= EPSILON) {
        return None;
    }

    let t = (plane_point - origin).dot(&normal) / denom;
    if t < 0.0 || t > max_distance {
        return None;
    }

    Some(LocalHit {
        distance: t,
        point: origin + dir * t,
        // Facing the ray origin
        normal: if denom > 0.0 { -normal } else { normal },
    })
}

fn raycast_sphere(
    center: Point3<f64>,
    radius: f64,
    origin: Point3<f64>,
    dir: Vector3<f64>,
    max_distance: f64,
) -> Option<LocalHit> {
    if !(radius > 0.0) {
        return None;
    }

    let oc = origin - center;
    let c = oc.dot(&oc) - radius * radius;
    if c < 0.0 {
        return None;
    }

    // Quadratic: t^2 + 2*b*t + c = 0 where b = oc·dir, c = oc·oc - r²
    let b = oc.dot(&dir);
    let discriminant = b * b - c;
    if !(discriminant >= 0.0) {
        return None;
    }

    let t = -b - discriminant.sqrt();
    if t < 0.0 || t > max_distance {
        return None;
    }

    let point = origin + dir * t;
    Some(LocalHit {
        distance: t,
        point,
        normal: safe_normalize(&(point - center), -dir),
    })
}

fn raycast_aabb(
    min: &Point3<f64>,
    max: &Point3<f64>,
    origin: Point3<f64>,
    dir: Vector3<f64>,
    max_distance: f64,
) -> Option<LocalHit> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = max_distance;
    let mut hit_normal = Vector3::zeros();

    // Test each slab
    for i in 0..3 {
        if dir[i].abs() < EPSILON {
            // Ray parallel to slab
            if origin[i] < min[i] || origin[i] > max[i] {
                return None;
            }
            continue;
        }

        let inv_dir = 1.0 / dir[i];
        let t1 = (min[i] - origin[i]) * inv_dir;
        let t2 = (max[i] - origin[i]) * inv_dir;
        let (t_near, t_far, sign) = if t1 < t2 { (t1, t2, -1.0) } else { (t2, t1, 1.0) };

        if t_near > t_min {
            t_min = t_near;
            hit_normal = Vector3::zeros();
            hit_normal[i] = sign;
        }
        t_max = t_max.min(t_far);

        if t_min > t_max {
            return None;
        }
    }

    // Origin inside the box (or every axis parallel, which also means inside)
    if t_min < 0.0 || t_min > max_distance {
        return None;
    }

    Some(LocalHit {
        distance: t_min,
        point: origin + dir * t_min,
        normal: hit_normal,
    })
}

/// Möller–Trumbore ray-triangle intersection.
fn raycast_triangle(
    origin: Point3<f64>,
    dir: Vector3<f64>,
    v0: Point3<f64>,
    v1: Point3<f64>,
    v2: Point3<f64>,
    max_distance: f64,
) -> Option<LocalHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel to the triangle, or a degenerate triangle
    if !(a.abs() >= EPSILON) {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t < 0.0 || t > max_distance {
        return None;
    }

    let normal = safe_normalize(&edge1.cross(&edge2), -dir);
    Some(LocalHit {
        distance: t,
        point: origin + dir * t,
        normal: if normal.dot(&dir) > 0.0 { -normal } else { normal },
    })
}
