use super::*;
use crate::channel::{build_channel, CellPolygon, Tolerances, VERTEX_COUNT};
use crate::error::ReconError;
use crate::itinerary::EdgeId;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;
use std::f64::consts::FRAC_PI_2;

fn edge(i: usize) -> EdgeId {
    EdgeId::new(i).unwrap()
}

#[test]
fn reflection_keeps_edge_endpoints() {
    let ch = build_channel(0.7, 1.2).unwrap();
    let tol = Tolerances::default();
    for e in EdgeId::all() {
        let r = reflect_about_edge(ch.polygon(), e, tol);
        let (a0, b0) = ch.polygon().edge(e);
        let (a1, b1) = r.edge(e);
        assert_eq!(a0, a1);
        assert_eq!(b0, b1);
    }
}

#[test]
fn reflection_is_an_isometry() {
    let ch = build_channel(0.9, 2.1).unwrap();
    let tol = Tolerances::default();
    let r = reflect_about_edge(ch.polygon(), edge(1), tol);
    for i in 0..VERTEX_COUNT - 1 {
        let before = (ch.vertex(i + 1) - ch.vertex(i)).norm();
        let after = (r.v[i + 1] - r.v[i]).norm();
        assert!((before - after).abs() < 1e-12, "edge {i}: {before} vs {after}");
    }
}

#[test]
fn vertical_edge_mirrors_in_x() {
    // Edge 2 is the right period boundary x = 1.
    let ch = build_channel(0.5, FRAC_PI_2).unwrap();
    let r = reflect_about_edge(ch.polygon(), edge(2), Tolerances::default());
    for i in [0usize, 1, 4, 5, 6] {
        assert!((r.v[i].x - (2.0 - ch.vertex(i).x)).abs() < 1e-15);
        assert_eq!(r.v[i].y, ch.vertex(i).y);
    }
}

#[test]
fn near_vertical_edge_takes_vertical_branch() {
    let ch = build_channel(0.5, FRAC_PI_2).unwrap();
    let mut p = *ch.polygon();
    p.v[3].x = 1.0 + 1e-14;
    let r = reflect_about_edge(&p, edge(2), Tolerances::default());
    assert!(r.v.iter().all(|q| q.x.is_finite() && q.y.is_finite()));
    assert!((r.v[0].x - 2.0).abs() < 1e-12);
    assert_eq!(r.v[0].y, 0.0);
}

#[test]
fn intersect_sloped_and_vertical_edges() {
    let ch = build_channel(0.5, FRAC_PI_2).unwrap();
    let tol = Tolerances::default();
    // Edge 0 lies on y = x.
    let p = intersect_ray_with_edge(ch.polygon(), 0.1, 0.0, edge(0), tol).unwrap();
    assert!((p - vector![0.1, 0.1]).norm() < 1e-12);
    // Edge 2 lies on x = 1.
    let q = intersect_ray_with_edge(ch.polygon(), 0.1, 0.2f64.atan(), edge(2), tol).unwrap();
    assert!((q - vector![1.0, 0.3]).norm() < 1e-12);
}

#[test]
fn intersect_near_vertical_edge() {
    let ch = build_channel(0.5, FRAC_PI_2).unwrap();
    let tol = Tolerances::default();
    let theta = 0.2f64.atan();
    // Within tolerance of x = 1: solved as a vertical line.
    let mut p = *ch.polygon();
    p.v[3].x = 1.0 + 1e-14;
    let q = intersect_ray_with_edge(&p, 0.1, theta, edge(2), tol).unwrap();
    assert!((q - vector![1.0, 0.3]).norm() < 1e-12, "{q}");
    // Outside tolerance: the steep slope form still lands next to the line.
    p.v[3].x = 1.0 + 1e-6;
    let q = intersect_ray_with_edge(&p, 0.1, theta, edge(2), tol).unwrap();
    assert!(q.x.is_finite() && q.y.is_finite());
    assert!((q - vector![1.0, 0.3]).norm() < 1e-6, "{q}");
}

#[test]
fn parallel_ray_is_degenerate() {
    let ch = build_channel(0.5, FRAC_PI_2).unwrap();
    let err = intersect_ray_with_edge(
        ch.polygon(),
        0.1,
        std::f64::consts::FRAC_PI_4,
        edge(0),
        Tolerances::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ReconError::DegenerateRay { edge: 0, .. }));
}

#[test]
fn mapping_on_canonical_cell_is_identity() {
    let ch = build_channel(0.6, 1.4).unwrap();
    for e in EdgeId::all() {
        let (a, b) = ch.polygon().edge(e);
        let p = a + (b - a) * 0.3;
        let q = map_point_to_cell(&ch, ch.polygon(), p, e);
        assert!((p - q).norm() < 1e-12);
    }
}

#[test]
fn mapping_after_reflection_preserves_arc_position() {
    let ch = build_channel(0.6, 1.4).unwrap();
    let tol = Tolerances::default();
    // Two reflections move edge 4 away from its canonical place.
    let r = reflect_about_edge(ch.polygon(), edge(0), tol);
    let r = reflect_about_edge(&r, edge(4), tol);
    let (a, b) = r.edge(edge(4));
    let p = a + (b - a) * 0.25;
    let q = map_point_to_cell(&ch, &r, p, edge(4));
    let (ca, cb) = ch.polygon().edge(edge(4));
    let expected: Vector2<f64> = ca + (cb - ca) * 0.25;
    assert!((q - expected).norm() < 1e-12);
}

fn unfold_prefix(p: &CellPolygon, prefix: &[usize], tol: Tolerances) -> CellPolygon {
    prefix
        .iter()
        .fold(*p, |acc, &e| reflect_about_edge(&acc, edge(e), tol))
}

proptest! {
    #[test]
    fn double_reflection_restores_polygon(
        width in 0.05f64..3.0,
        alpha in 0.1f64..3.0,
        e in 0usize..6,
        prefix in proptest::collection::vec(0usize..6, 0..4),
    ) {
        let ch = build_channel(width, alpha).unwrap();
        let tol = Tolerances::default();
        let start = unfold_prefix(ch.polygon(), &prefix, tol);
        let once = reflect_about_edge(&start, edge(e), tol);
        let twice = reflect_about_edge(&once, edge(e), tol);
        let scale = start.v.iter().map(|p| p.amax()).fold(1.0, f64::max);
        prop_assert!(twice.max_abs_diff(&start) <= 1e-9 * scale);
    }
}
