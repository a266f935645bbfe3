//! Fixed arc-length resampling of reconstructed paths.
//!
//! The sampler walks the polyline once, carrying the distance already covered
//! since the last sample (`leftover`) across vertices, so sample spacing is
//! continuous over segment joins. After a segment that produced samples the
//! carry is re-measured from the last sample to the vertex, which keeps
//! rounding from accumulating along long paths.
//!
//! Region labels advance on crossing events, not on sample counts: a vertex at
//! an integer x coordinate is a period-boundary crossing and bumps the label
//! even if no sample falls on it. `ends[k]` is the first frame of region `k`;
//! a crossing after the last emitted frame opens no region and is dropped.

use crate::error::ReconError;

/// Upper bound on the up-front buffer reservation; longer outputs grow on demand.
const RESERVE_LIMIT: usize = 1 << 16;

/// Resampling options.
#[derive(Clone, Copy, Debug)]
pub struct InterpCfg {
    /// Distance to the nearest integer under which a vertex x coordinate
    /// counts as a period-boundary crossing.
    pub crossing_tol: f64,
}

impl Default for InterpCfg {
    fn default() -> Self {
        Self { crossing_tol: 1e-9 }
    }
}

/// Uniform-step frames of one path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpolated {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Region label of each frame.
    pub labels: Vec<i32>,
    /// Frame index at which each region was entered (`ends[0] == 0`).
    /// Every entry is `< len()`.
    pub ends: Vec<usize>,
}

impl Interpolated {
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    fn push(&mut self, x: f64, y: f64, label: i32) {
        self.x.push(x);
        self.y.push(y);
        self.labels.push(label);
    }

    fn finish(mut self) -> Self {
        let n = self.len();
        self.ends.retain(|&e| e < n);
        self
    }
}

/// [`get_interpolated_trajectory`] with the default [`InterpCfg`].
pub fn interpolate(
    x: &[f64],
    y: &[f64],
    labels: &[i32],
    max_frames: usize,
    step: f64,
) -> Result<Interpolated, ReconError> {
    get_interpolated_trajectory(x, y, labels, max_frames, step, InterpCfg::default())
}

/// Resample the polyline `(x, y)` every `step` units of arc length, producing
/// at most `max_frames` frames.
///
/// `labels[k]` is the label of the k-th region along the path; labels past the
/// end of the slice hold the last one. Reaching `max_frames` ends the walk
/// early and is not an error.
pub fn get_interpolated_trajectory(
    x: &[f64],
    y: &[f64],
    labels: &[i32],
    max_frames: usize,
    step: f64,
    cfg: InterpCfg,
) -> Result<Interpolated, ReconError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(ReconError::InvalidStep(step));
    }
    if x.len() != y.len() {
        return Err(ReconError::InconsistentEnsemble(format!(
            "polyline has {} x and {} y coordinates",
            x.len(),
            y.len()
        )));
    }
    if x.iter().chain(y).any(|v| !v.is_finite()) {
        return Err(ReconError::InconsistentEnsemble(
            "polyline has non-finite coordinates".into(),
        ));
    }
    let mut out = Interpolated::default();
    if x.is_empty() || max_frames == 0 {
        return Ok(out);
    }
    let Some(&last_label) = labels.last() else {
        return Err(ReconError::InconsistentEnsemble(
            "no region labels for a non-empty polyline".into(),
        ));
    };
    let label_at = |k: usize| labels.get(k).copied().unwrap_or(last_label);

    let total: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(wx, wy)| (wx[1] - wx[0]).hypot(wy[1] - wy[0]))
        .sum();
    let cap = ((total / step) as usize)
        .saturating_add(1)
        .min(max_frames)
        .min(RESERVE_LIMIT);
    out.x.reserve(cap);
    out.y.reserve(cap);
    out.labels.reserve(cap);

    out.push(x[0], y[0], labels[0]);
    out.ends.push(0);
    let mut region = 0usize;
    let mut leftover = 0.0;
    for i in 0..x.len() - 1 {
        let (x0, y0, x1, y1) = (x[i], y[i], x[i + 1], y[i + 1]);
        let len = (x1 - x0).hypot(y1 - y0);
        let fits = if len > 0.0 {
            ((len + leftover) / step).floor() as usize
        } else {
            0
        };
        if fits > 0 {
            let (ux, uy) = ((x1 - x0) / len, (y1 - y0) / len);
            let label = label_at(region);
            for k in 1..=fits {
                if out.len() >= max_frames {
                    return Ok(out.finish());
                }
                let d = k as f64 * step - leftover;
                out.push(x0 + d * ux, y0 + d * uy, label);
            }
        }

        if is_crossing(x1, cfg.crossing_tol) {
            region += 1;
            out.ends.push(out.len());
        }

        leftover = match (out.x.last(), out.y.last()) {
            (Some(&lx), Some(&ly)) if fits > 0 => (x1 - lx).hypot(y1 - ly),
            _ => leftover + len,
        };
        if out.len() >= max_frames {
            break;
        }
    }
    Ok(out.finish())
}

#[inline]
fn is_crossing(x: f64, tol: f64) -> bool {
    (x - x.round()).abs() <= tol
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min_dist_to_samples(px: f64, py: f64, out: &Interpolated) -> f64 {
        out.x
            .iter()
            .zip(out.y.iter())
            .map(|(x, y)| (x - px).hypot(y - py))
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn step_longer_than_path_gives_start_only() {
        let out = interpolate(&[0.2, 0.5, 0.7], &[0.0, 0.3, 0.1], &[1], usize::MAX, 5.0).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!((out.x[0], out.y[0], out.labels[0]), (0.2, 0.0, 1));
        assert_eq!(out.ends, vec![0]);
    }

    #[test]
    fn spacing_is_continuous_across_vertices() {
        // Collinear pieces of uneven length: samples must sit at multiples of the step.
        let x = [0.0, 0.37, 0.41, 0.9, 1.33, 2.9];
        let y = [0.0; 6];
        let out = interpolate(&x, &y, &[0, 1, 2], usize::MAX, 0.125).unwrap();
        assert_eq!(out.len(), (2.9f64 / 0.125) as usize + 1);
        for (k, xs) in out.x.iter().enumerate() {
            assert!((xs - k as f64 * 0.125).abs() < 1e-9, "sample {k} at {xs}");
        }
    }

    #[test]
    fn crossing_at_vertex_bumps_label_without_a_sample() {
        let x = [0.25, 1.0, 1.5];
        let y = [0.0; 3];
        let out = interpolate(&x, &y, &[3, 4], usize::MAX, 0.5).unwrap();
        assert_eq!(out.x, vec![0.25, 0.75, 1.25]);
        assert_eq!(out.labels, vec![3, 3, 4]);
        assert_eq!(out.ends, vec![0, 2]);
    }

    #[test]
    fn crossing_detection_tolerates_rounding() {
        let x = [0.25, 1.0 + 1e-12, 1.5];
        let y = [0.0; 3];
        let out = interpolate(&x, &y, &[3, 4], usize::MAX, 0.5).unwrap();
        assert_eq!(out.labels.last(), Some(&4));
        let strict = InterpCfg { crossing_tol: 0.0 };
        let out = get_interpolated_trajectory(&x, &y, &[3, 4], usize::MAX, 0.5, strict).unwrap();
        assert_eq!(out.ends, vec![0]);
    }

    #[test]
    fn short_segments_accumulate_leftover() {
        let x = [0.0, 0.1, 0.2, 1.2];
        let y = [0.0; 4];
        let out = interpolate(&x, &y, &[0], usize::MAX, 0.5).unwrap();
        assert_eq!(out.len(), 3);
        assert!((out.x[1] - 0.5).abs() < 1e-12);
        assert!((out.x[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn repeated_vertex_is_harmless() {
        let x = [0.0, 0.3, 0.3, 0.9];
        let y = [0.0, 0.0, 0.0, 0.0];
        let out = interpolate(&x, &y, &[0], usize::MAX, 0.25).unwrap();
        assert!(out.x.iter().all(|v| v.is_finite()));
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn refining_step_adds_samples_and_covers_vertices() {
        let x = [0.0, 0.3, 0.8, 1.0, 1.7, 2.0];
        let y = [0.1, 0.45, 0.05, 0.3, 0.6, 0.2];
        let mut prev = 0usize;
        for step in [0.2, 0.1, 0.05, 0.025] {
            let out = interpolate(&x, &y, &[0, 1, 2], usize::MAX, step).unwrap();
            assert!(out.len() > prev, "step {step}: {} <= {prev}", out.len());
            prev = out.len();
            for (px, py) in x.iter().zip(y.iter()) {
                assert!(min_dist_to_samples(*px, *py, &out) <= step + 1e-12);
            }
        }
    }

    #[test]
    fn stops_at_max_frames() {
        let x = [0.0, 0.5, 1.0, 1.5, 2.0];
        let y = [0.0; 5];
        let out = interpolate(&x, &y, &[0, 1, 2], 3, 0.25).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.labels.len(), 3);
        // The crossing at x = 1 lies beyond the third frame.
        assert_eq!(out.ends, vec![0]);
        assert!(interpolate(&x, &y, &[0], 0, 0.25).unwrap().is_empty());
    }

    #[test]
    fn labels_past_the_end_hold_last() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0; 4];
        let out = interpolate(&x, &y, &[5], usize::MAX, 0.5).unwrap();
        assert!(out.labels.iter().all(|&l| l == 5));
        // The sample landing on x = 1 still belongs to the region being left;
        // the crossing at the final vertex opens nothing.
        assert_eq!(out.ends, vec![0, 3, 5]);
    }

    #[test]
    fn ends_never_point_past_the_last_frame() {
        // Frame limit reached exactly at the crossing.
        let out = interpolate(&[0.0, 0.5, 1.0], &[0.0; 3], &[0, 1], 5, 0.25).unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(out.ends, vec![0]);
        // Crossing at an interior vertex followed by a segment too short to sample.
        let out = interpolate(&[0.0, 1.0, 1.1], &[0.0; 3], &[0, 1], usize::MAX, 0.5).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out.ends, vec![0]);
        assert!(out.ends.iter().all(|&e| e < out.len()));
    }

    #[test]
    fn tiny_step_with_frame_cap() {
        let out = interpolate(&[0.0, 1.0], &[0.0, 0.0], &[0], 100_000, 1e-300).unwrap();
        assert_eq!(out.len(), 100_000);
        assert!((out.x[99_999] - 99_999.0e-300).abs() < 1e-305);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(matches!(
            interpolate(&[0.0, f64::INFINITY], &[0.0, 0.0], &[0], usize::MAX, 0.1),
            Err(ReconError::InconsistentEnsemble(_))
        ));
        assert!(matches!(
            interpolate(&[0.0, 1.0], &[f64::NAN, 0.0], &[0], 10, 0.1),
            Err(ReconError::InconsistentEnsemble(_))
        ));
        assert!(matches!(
            interpolate(&[0.0, 1.0], &[0.0, 0.0], &[0], 10, 0.0),
            Err(ReconError::InvalidStep(_))
        ));
        assert!(matches!(
            interpolate(&[0.0, 1.0], &[0.0, 0.0], &[0], 10, f64::NAN),
            Err(ReconError::InvalidStep(_))
        ));
        assert!(matches!(
            interpolate(&[0.0, 1.0], &[0.0], &[0], 10, 0.1),
            Err(ReconError::InconsistentEnsemble(_))
        ));
        assert!(matches!(
            interpolate(&[0.0, 1.0], &[0.0, 0.0], &[], 10, 0.1),
            Err(ReconError::InconsistentEnsemble(_))
        ));
        assert!(interpolate(&[], &[], &[], 10, 0.1).unwrap().is_empty());
    }
}
