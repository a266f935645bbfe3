//! Struct-of-arrays ensemble (N particles × M steps) and borrowed per-particle rows.

use crate::error::ReconError;

/// One particle's scattering-map series, borrowed from an [`Ensemble`] or
/// from caller-owned arrays. All slices have the same length M.
#[derive(Clone, Copy, Debug)]
pub struct TrajectoryView<'a> {
    pub h: &'a [f64],
    pub theta: &'a [f64],
    pub tau: &'a [f64],
    pub positions: &'a [i64],
    pub itineraries: &'a [String],
    pub labels: &'a [i32],
}

impl<'a> TrajectoryView<'a> {
    /// Bundle parallel slices; fails unless they all have the same length.
    pub fn new(
        h: &'a [f64],
        theta: &'a [f64],
        tau: &'a [f64],
        positions: &'a [i64],
        itineraries: &'a [String],
        labels: &'a [i32],
    ) -> Result<Self, ReconError> {
        let view = Self {
            h,
            theta,
            tau,
            positions,
            itineraries,
            labels,
        };
        view.check()?;
        Ok(view)
    }

    /// Verify that every field has `len()` entries.
    pub fn check(&self) -> Result<(), ReconError> {
        let m = self.h.len();
        let lens = [
            ("Theta", self.theta.len()),
            ("Tau", self.tau.len()),
            ("Positions", self.positions.len()),
            ("Itineraries", self.itineraries.len()),
            ("Labels", self.labels.len()),
        ];
        for (name, len) in lens {
            if len != m {
                return Err(ReconError::InconsistentEnsemble(format!(
                    "{name} has {len} steps, H has {m}"
                )));
            }
        }
        Ok(())
    }

    /// Number of recorded steps M.
    #[inline]
    pub fn len(&self) -> usize {
        self.h.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.h.is_empty()
    }

    /// Sum of dwell lengths.
    pub fn total_dwell(&self) -> f64 {
        self.tau.iter().sum()
    }
}

/// Scattering-map data for N particles, each field stored row-major (N × M).
#[derive(Clone, Debug, Default)]
pub struct Ensemble {
    n: usize,
    m: usize,
    h: Vec<f64>,
    theta: Vec<f64>,
    tau: Vec<f64>,
    positions: Vec<i64>,
    itineraries: Vec<String>,
    labels: Vec<i32>,
}

impl Ensemble {
    /// Build from flat row-major buffers of `n * m` entries each.
    #[allow(clippy::too_many_arguments)]
    pub fn from_flat(
        n: usize,
        m: usize,
        h: Vec<f64>,
        theta: Vec<f64>,
        tau: Vec<f64>,
        positions: Vec<i64>,
        itineraries: Vec<String>,
        labels: Vec<i32>,
    ) -> Result<Self, ReconError> {
        let want = n * m;
        let lens = [
            ("H", h.len()),
            ("Theta", theta.len()),
            ("Tau", tau.len()),
            ("Positions", positions.len()),
            ("Itineraries", itineraries.len()),
            ("Labels", labels.len()),
        ];
        for (name, len) in lens {
            if len != want {
                return Err(ReconError::InconsistentEnsemble(format!(
                    "{name} has {len} entries, expected {n} x {m} = {want}"
                )));
            }
        }
        Ok(Self {
            n,
            m,
            h,
            theta,
            tau,
            positions,
            itineraries,
            labels,
        })
    }

    /// Build from per-particle rows; the shape is taken from `h`.
    pub fn from_rows(
        h: Vec<Vec<f64>>,
        theta: Vec<Vec<f64>>,
        tau: Vec<Vec<f64>>,
        positions: Vec<Vec<i64>>,
        itineraries: Vec<Vec<String>>,
        labels: Vec<Vec<i32>>,
    ) -> Result<Self, ReconError> {
        let n = h.len();
        let m = h.first().map_or(0, Vec::len);
        Self::from_flat(
            n,
            m,
            flatten("H", h, n, m)?,
            flatten("Theta", theta, n, m)?,
            flatten("Tau", tau, n, m)?,
            flatten("Positions", positions, n, m)?,
            flatten("Itineraries", itineraries, n, m)?,
            flatten("Labels", labels, n, m)?,
        )
    }

    /// Number of particles N.
    #[inline]
    pub fn n_particles(&self) -> usize {
        self.n
    }

    /// Number of steps M per particle.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.m
    }

    /// Borrowed row `i`, or `None` when out of range.
    pub fn trajectory(&self, i: usize) -> Option<TrajectoryView<'_>> {
        if i >= self.n {
            return None;
        }
        let r = i * self.m..(i + 1) * self.m;
        Some(TrajectoryView {
            h: &self.h[r.clone()],
            theta: &self.theta[r.clone()],
            tau: &self.tau[r.clone()],
            positions: &self.positions[r.clone()],
            itineraries: &self.itineraries[r.clone()],
            labels: &self.labels[r],
        })
    }

    /// All rows in particle order.
    pub fn trajectories(&self) -> impl Iterator<Item = TrajectoryView<'_>> + '_ {
        (0..self.n).filter_map(move |i| self.trajectory(i))
    }

    /// Smallest total dwell length over all particles (`None` when empty).
    pub fn min_total_dwell(&self) -> Option<f64> {
        self.trajectories()
            .map(|t| t.total_dwell())
            .min_by(|a, b| a.total_cmp(b))
    }
}

fn flatten<T>(name: &str, rows: Vec<Vec<T>>, n: usize, m: usize) -> Result<Vec<T>, ReconError> {
    if rows.len() != n {
        return Err(ReconError::InconsistentEnsemble(format!(
            "{name} has {} rows, expected {n}",
            rows.len()
        )));
    }
    let mut out = Vec::with_capacity(n * m);
    for (i, row) in rows.into_iter().enumerate() {
        if row.len() != m {
            return Err(ReconError::InconsistentEnsemble(format!(
                "{name} row {i} has {} steps, expected {m}",
                row.len()
            )));
        }
        out.extend(row);
    }
    Ok(out)
}
