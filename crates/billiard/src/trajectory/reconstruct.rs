use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::channel::{PolygonalChannel, Tolerances};
use crate::error::ReconError;
use crate::itinerary::{EdgeId, Itinerary};
use crate::unfold::{intersect_ray_with_edge, map_point_to_cell, reflect_about_edge};

use super::ensemble::TrajectoryView;

/// Collision points on the elementary cell for the ray `(h, theta)` following
/// `itinerary`, with default tolerances.
///
/// `theta` is expected in (-π/2, π/2); see [`fold_angle`].
pub fn reconstruct_trajectory(
    channel: &PolygonalChannel,
    h: f64,
    theta: f64,
    itinerary: &[EdgeId],
) -> Result<(Vec<f64>, Vec<f64>), ReconError> {
    reconstruct_trajectory_with(channel, h, theta, itinerary, Tolerances::default())
}

/// [`reconstruct_trajectory`] with explicit tolerances.
///
/// Each step reflects the previous step's polygon about the next edge, meets the
/// ray with that edge, and maps the hit back to the canonical cell.
pub fn reconstruct_trajectory_with(
    channel: &PolygonalChannel,
    h: f64,
    theta: f64,
    itinerary: &[EdgeId],
    tol: Tolerances,
) -> Result<(Vec<f64>, Vec<f64>), ReconError> {
    let init = (
        *channel.polygon(),
        Vec::with_capacity(itinerary.len()),
        Vec::with_capacity(itinerary.len()),
    );
    let (_, xs, ys) = itinerary
        .iter()
        .try_fold(init, |(poly, mut xs, mut ys), &edge| {
            let unfolded = reflect_about_edge(&poly, edge, tol);
            let hit = intersect_ray_with_edge(&unfolded, h, theta, edge, tol)?;
            let p = map_point_to_cell(channel, &unfolded, hit, edge);
            xs.push(p.x);
            ys.push(p.y);
            Ok::<_, ReconError>((unfolded, xs, ys))
        })?;
    Ok((xs, ys))
}

/// Fold an incidence angle into (-π/2, π/2).
///
/// Returns `(theta', sign)`: angles outside the open interval are mapped to
/// `π - theta` (wrapped into (-π, π]) and `sign = -1` mirrors the local x
/// coordinates of the reconstruction.
pub fn fold_angle(theta: f64) -> (f64, f64) {
    if theta > -FRAC_PI_2 && theta < FRAC_PI_2 {
        (theta, 1.0)
    } else {
        (wrap_angle(PI - theta), -1.0)
    }
}

#[inline]
fn wrap_angle(a: f64) -> f64 {
    let x = (a + PI).rem_euclid(TAU) - PI;
    if x <= -PI {
        x + TAU
    } else {
        x
    }
}

/// Number of points in the lifted path for the given (parsed) itineraries:
/// one start point plus, for every segment but the last, its interior
/// collisions and its end point.
pub fn lifted_len(itineraries: &[Itinerary]) -> usize {
    match itineraries.split_last() {
        None => 0,
        Some((_, head)) => 1 + head.iter().map(|it| it.len() + 1).sum::<usize>(),
    }
}

/// Lifted (period-unwrapped) path of one particle, with default tolerances.
pub fn reconstruct_lifted_trajectory(
    channel: &PolygonalChannel,
    traj: &TrajectoryView<'_>,
) -> Result<(Vec<f64>, Vec<f64>), ReconError> {
    reconstruct_lifted_trajectory_with(channel, traj, Tolerances::default())
}

/// [`reconstruct_lifted_trajectory`] with explicit tolerances.
///
/// The path starts at `(Positions[0], H[0])`; segment `i` contributes its
/// interior collisions shifted by `Positions[i]` followed by
/// `(Positions[i+1], H[i+1])`. Every itinerary is validated before any
/// geometry runs.
pub fn reconstruct_lifted_trajectory_with(
    channel: &PolygonalChannel,
    traj: &TrajectoryView<'_>,
    tol: Tolerances,
) -> Result<(Vec<f64>, Vec<f64>), ReconError> {
    traj.check()?;
    if traj.is_empty() {
        return Err(ReconError::InconsistentEnsemble(
            "trajectory has no recorded steps".into(),
        ));
    }
    let itineraries = traj
        .itineraries
        .iter()
        .map(|s| Itinerary::parse(s))
        .collect::<Result<Vec<_>, _>>()?;

    let n = lifted_len(&itineraries);
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    xs.push(traj.positions[0] as f64);
    ys.push(traj.h[0]);
    for (i, it) in itineraries[..itineraries.len() - 1].iter().enumerate() {
        let (theta, sign) = fold_angle(traj.theta[i]);
        let (lx, ly) = reconstruct_trajectory_with(channel, traj.h[i], theta, &it.edges, tol)?;
        let offset = traj.positions[i] as f64;
        xs.extend(lx.iter().map(|x| sign * x + offset));
        ys.extend(ly);
        xs.push(traj.positions[i + 1] as f64);
        ys.push(traj.h[i + 1]);
    }
    debug_assert_eq!(xs.len(), n);
    Ok((xs, ys))
}
