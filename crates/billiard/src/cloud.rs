//! Ensemble clouds: every particle reconstructed and resampled onto a common
//! frame grid, ready for frame-by-frame animation.
//!
//! Particles are independent, so the per-particle work runs on the rayon pool;
//! the channel is shared read-only and each reconstruction owns its polygon.

use nalgebra::DMatrix;
use rayon::prelude::*;

use crate::channel::{PolygonalChannel, Tolerances};
use crate::error::ReconError;
use crate::interp::{get_interpolated_trajectory, InterpCfg, Interpolated};
use crate::trajectory::{reconstruct_lifted_trajectory_with, Ensemble};

/// Marker in `Cloud::ends` for region slots a particle never reached.
pub const NO_REGION: i64 = -2;

/// Frame-major arrays, shape (frames, particles).
#[derive(Clone, Debug)]
pub struct Cloud {
    pub x: DMatrix<f64>,
    pub y: DMatrix<f64>,
    pub labels: DMatrix<i32>,
    /// Column `j` lists the frames at which particle `j` entered each region,
    /// padded with [`NO_REGION`].
    pub ends: DMatrix<i64>,
}

impl Cloud {
    #[inline]
    pub fn n_frames(&self) -> usize {
        self.x.nrows()
    }

    #[inline]
    pub fn n_particles(&self) -> usize {
        self.x.ncols()
    }
}

/// Build a cloud with default tolerances.
///
/// Without `max_frames` the frame count is `floor(min total dwell / step)`,
/// so the particle with the shortest recorded history still fills every frame.
pub fn build_cloud(
    channel: &PolygonalChannel,
    ensemble: &Ensemble,
    step: f64,
    max_frames: Option<usize>,
) -> Result<Cloud, ReconError> {
    build_cloud_with(
        channel,
        ensemble,
        step,
        max_frames,
        Tolerances::default(),
        InterpCfg::default(),
    )
}

/// [`build_cloud`] with explicit geometry tolerances and resampling options.
pub fn build_cloud_with(
    channel: &PolygonalChannel,
    ensemble: &Ensemble,
    step: f64,
    max_frames: Option<usize>,
    tol: Tolerances,
    cfg: InterpCfg,
) -> Result<Cloud, ReconError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(ReconError::InvalidStep(step));
    }
    let frames = match max_frames {
        Some(f) => f,
        None => {
            let dwell = ensemble.min_total_dwell().ok_or_else(|| {
                ReconError::InconsistentEnsemble("cannot derive frame count of an empty ensemble".into())
            })?;
            (dwell / step).floor().max(0.0) as usize
        }
    };
    let n = ensemble.n_particles();
    tracing::debug!(particles = n, frames, step, "building cloud");

    let results: Vec<Result<Interpolated, ReconError>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let traj = ensemble.trajectory(i).ok_or_else(|| {
                ReconError::InconsistentEnsemble("particle index out of range".into())
            })?;
            let (xs, ys) = reconstruct_lifted_trajectory_with(channel, &traj, tol)?;
            get_interpolated_trajectory(&xs, &ys, traj.labels, frames, step, cfg)
        })
        .collect();
    // Lowest failing index wins, independent of scheduling.
    let per_particle = results
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.map_err(|e| e.in_particle(i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cloud = Cloud {
        x: DMatrix::zeros(frames, n),
        y: DMatrix::zeros(frames, n),
        labels: DMatrix::zeros(frames, n),
        ends: DMatrix::from_element(frames, n, NO_REGION),
    };
    for (j, p) in per_particle.iter().enumerate() {
        if p.len() < frames {
            tracing::warn!(
                particle = j,
                got = p.len(),
                frames,
                "path shorter than frame count; holding final position"
            );
        }
        let Some(last) = p.len().checked_sub(1) else {
            continue;
        };
        for f in 0..frames {
            let k = f.min(last);
            cloud.x[(f, j)] = p.x[k];
            cloud.y[(f, j)] = p.y[k];
            cloud.labels[(f, j)] = p.labels[k];
        }
        for (f, &e) in p.ends.iter().take(frames).enumerate() {
            cloud.ends[(f, j)] = e as i64;
        }
    }
    Ok(cloud)
}
