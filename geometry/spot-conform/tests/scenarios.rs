//! End-to-end projection scenarios against analytic scenes.
//!
//! Run with: cargo test -p spot-conform --test scenarios

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::cell::Cell;

use approx::assert_relative_eq;
use nalgebra::{Point3, UnitQuaternion, Vector3};
use spot_conform::{
    ConformSpots, LayerMask, ProjectionConfig, Ray, RecomputeContext, RecomputeGate, Spot,
    SpotSet, Surface, SurfaceHit, SurfaceQuery, SurfaceSet, TriangleMesh, project,
};

/// Wraps a query and counts how many raycasts go through it.
struct Counted<Q> {
    inner: Q,
    calls: Cell<usize>,
}

impl<Q> Counted<Q> {
    fn new(inner: Q) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<Q: SurfaceQuery> SurfaceQuery for Counted<Q> {
    fn raycast(&self, ray: &Ray, max_distance: f64, layers: LayerMask) -> Option<SurfaceHit> {
        self.calls.set(self.calls.get() + 1);
        self.inner.raycast(ray, max_distance, layers)
    }
}

fn flat_ground() -> Counted<SurfaceSet> {
    Counted::new(
        SurfaceSet::new()
            .with_surface(Surface::ground(0.0), 0)
            .expect("layer 0 is valid"),
    )
}

fn three_identical() -> SpotSet {
    (0..3)
        .map(|i| Spot::at(i, Point3::new(0.0, 5.0, 0.0)))
        .collect()
}

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn scenario_a_identical_spots_land_on_ground() {
    let scene = flat_ground();
    let config = ProjectionConfig::default();

    let result = project(&three_identical(), &config, &scene);

    assert_eq!(result.output().len(), 3);
    for spot in result.output() {
        assert_relative_eq!(spot.position, Point3::origin(), epsilon = 1e-12);
    }
    assert_eq!(result.output().indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(scene.calls.get(), 3);
}

#[test]
fn scenario_b_offset_moves_further_along_direction() {
    let scene = flat_ground();
    let config = ProjectionConfig::default().with_offset(1.0);

    let result = project(&three_identical(), &config, &scene);

    // (0,5,0) + (0,-1,0) * (5 + 1)
    assert_eq!(result.output().len(), 3);
    for spot in result.output() {
        assert_relative_eq!(spot.position, Point3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }
}

#[test]
fn scenario_c_short_ray_drops_spot() {
    let scene = flat_ground();
    let config = ProjectionConfig::default().with_max_distance(3.0);
    let input = SpotSet::from_spots(vec![Spot::at(0, Point3::new(0.0, 5.0, 0.0))]);

    let result = project(&input, &config, &scene);

    assert!(result.output().is_empty());
    assert!(result.simulated().is_empty());
    assert_eq!(result.stats().dropped, 1);
    assert_eq!(scene.calls.get(), 1);
}

#[test]
fn scenario_d_empty_input_issues_no_queries() {
    let scene = flat_ground();

    let result = project(&SpotSet::new(), &ProjectionConfig::default(), &scene);

    assert!(result.output().is_empty());
    assert!(result.simulated().is_empty());
    assert_eq!(scene.calls.get(), 0);
}

// =============================================================================
// Scenes
// =============================================================================

#[test]
fn layer_mask_selects_surfaces() {
    let scene = SurfaceSet::new()
        .with_surface(Surface::aabb(Point3::new(-1.0, 0.0, -1.0), Point3::new(1.0, 2.0, 1.0)), 8)
        .unwrap()
        .with_surface(Surface::ground(0.0), 0)
        .unwrap();
    let input = SpotSet::from_spots(vec![Spot::at(0, Point3::new(0.0, 5.0, 0.0))]);

    let ground_only = project(&input, &ProjectionConfig::default(), &scene);
    assert_relative_eq!(ground_only.output()[0].position.y, 0.0, epsilon = 1e-12);

    let with_props = ProjectionConfig::default()
        .with_layer_mask(LayerMask::DEFAULT.with_layer(8).unwrap());
    let on_box = project(&input, &with_props, &scene);
    assert_relative_eq!(on_box.output()[0].position.y, 2.0, epsilon = 1e-12);

    let nothing = ProjectionConfig::default().with_layer_mask(LayerMask::NONE);
    assert!(project(&input, &nothing, &scene).output().is_empty());
}

#[test]
fn spots_follow_uneven_terrain() {
    let terrain = TriangleMesh::height_grid(Point3::new(-10.0, 0.0, -10.0), 20, 20, 1.0, |x, z| {
        0.25 * x + 0.5 * z
    })
    .unwrap();
    let scene = SurfaceSet::new().with_surface(terrain, 0).unwrap();
    let input: SpotSet = [(-3.3, 2.7), (0.4, 0.3), (5.1, -8.2), (30.0, 0.0)]
        .iter()
        .enumerate()
        .map(|(i, &(x, z))| Spot::at(i, Point3::new(x, 50.0, z)))
        .collect();

    let result = project(&input, &ProjectionConfig::default(), &scene);

    // The last spot is outside the terrain and has nothing below it
    assert_eq!(result.output().indices().collect::<Vec<_>>(), vec![0, 1, 2]);
    for spot in result.output() {
        let expected = 0.25 * spot.position.x + 0.5 * spot.position.z;
        assert_relative_eq!(spot.position.y, expected, epsilon = 1e-9);
    }
}

#[test]
fn sideways_projection_onto_wall() {
    let wall = Surface::plane(Point3::new(10.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
    let scene = SurfaceSet::new().with_surface(wall, 2).unwrap();
    let config = ProjectionConfig::along(Vector3::x())
        .with_offset(-0.5)
        .with_layer_mask(LayerMask::layer(2).unwrap());
    let rotation = UnitQuaternion::from_euler_angles(0.0, 1.0, 0.0);
    let input = SpotSet::from_spots(vec![Spot::new(5, Point3::new(0.0, 3.0, 4.0), rotation)]);

    let result = project(&input, &config, &scene);
    let spot = result.output()[0];

    assert_relative_eq!(spot.position, Point3::new(9.5, 3.0, 4.0), epsilon = 1e-12);
    assert_eq!(spot.rotation, rotation);
    assert_eq!(spot.index, 5);
}

// =============================================================================
// Module lifecycle
// =============================================================================

#[test]
fn module_recomputes_when_scene_input_revision_moves() {
    let mut scene = SurfaceSet::new()
        .with_surface(Surface::ground(0.0), 0)
        .unwrap();
    let spots = three_identical();
    let mut module = ConformSpots::new();
    let mut gate = RecomputeGate::new();

    {
        let ctx = RecomputeContext::new(Some(&spots), 1, &scene);
        let output = module.refresh_if_needed(&mut gate, &ctx).unwrap();
        assert_relative_eq!(output[0].position.y, 0.0, epsilon = 1e-12);
    }

    // Terrain edited: the orchestrator bumps the input revision
    scene.add(Surface::ground(1.5), 0).unwrap();
    let ctx = RecomputeContext::new(Some(&spots), 2, &scene);
    let output = module.refresh_if_needed(&mut gate, &ctx).unwrap();
    assert_relative_eq!(output[0].position.y, 1.5, epsilon = 1e-12);

    let markers: Vec<_> = module.simulated().markers().collect();
    assert_eq!(markers.len(), 3);
    assert_eq!(markers[2].label, "2");
    assert_relative_eq!(markers[0].position.y, 1.5, epsilon = 1e-12);
}

#[test]
fn module_disabled_then_reset() {
    let scene = flat_ground();
    let spots = three_identical();
    let mut module = ConformSpots::new();

    module.set_direction(Vector3::zeros());
    let output = module.refresh(&RecomputeContext::new(Some(&spots), 0, &scene));
    assert!(output.is_empty());
    assert_eq!(scene.calls.get(), 0);

    module.reset();
    let output = module.refresh(&RecomputeContext::new(Some(&spots), 0, &scene));
    assert_eq!(output.len(), 3);
    assert_eq!(module.count(), 3);
    assert_eq!(scene.calls.get(), 3);
}
