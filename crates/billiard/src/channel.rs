//! The elementary cell of the periodic polygonal channel.
//!
//! - `PolygonalChannel`: immutable cell built from `(width, alpha)` with its
//!   edge lengths and cumulative arc length from vertex 0.
//! - `CellPolygon`: seven vertices (closing duplicate included) of the cell or
//!   of any reflected copy of it.
//! - `Tolerances`: relative + absolute closeness used by the unfolding code.
//!
//! Vertex layout (`dx = 1/2`, `dy = dx / tan(alpha/2)`):
//!
//! ```text
//! x = [0, dx, 2dx, 2dx, dx,   0, 0]
//! y = [0, dy, 0,   d,   d+dy, d, 0]
//! ```
//!
//! Edges 0,1 form the lower wedge, 3,4 the upper wedge, and edges 2 (`x = 1`)
//! and 5 (`x = 0`) are the period boundaries shared with neighbouring cells.

use std::ops::RangeInclusive;

use nalgebra::Vector2;

use crate::error::ReconError;
use crate::itinerary::EdgeId;

/// Number of stored vertices (six edges plus the closing duplicate).
pub const VERTEX_COUNT: usize = 7;
/// Number of boundary edges of the cell.
pub const EDGE_COUNT: usize = VERTEX_COUNT - 1;

/// Closeness thresholds for geometric predicates.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub rel: f64,
    pub abs: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            rel: 1e-12,
            abs: 1e-12,
        }
    }
}

impl Tolerances {
    /// `|a - b| <= max(rel * max(|a|, |b|), abs)`.
    #[inline]
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= (self.rel * a.abs().max(b.abs())).max(self.abs)
    }
}

/// Vertices of the cell or of one of its reflected copies.
///
/// Invariant: `v[0] == v[6]` up to floating-point error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPolygon {
    pub v: [Vector2<f64>; VERTEX_COUNT],
}

impl CellPolygon {
    /// Endpoints `(v[e], v[e+1])` of edge `e`.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> (Vector2<f64>, Vector2<f64>) {
        let i = e.index();
        (self.v[i], self.v[i + 1])
    }

    pub fn xs(&self) -> [f64; VERTEX_COUNT] {
        self.v.map(|p| p.x)
    }

    pub fn ys(&self) -> [f64; VERTEX_COUNT] {
        self.v.map(|p| p.y)
    }

    /// Largest coordinate-wise distance to `other` (max-abs metric).
    pub fn max_abs_diff(&self, other: &CellPolygon) -> f64 {
        self.v
            .iter()
            .zip(other.v.iter())
            .map(|(a, b)| (a - b).amax())
            .fold(0.0, f64::max)
    }
}

/// One period of the channel.
#[derive(Clone, Debug)]
pub struct PolygonalChannel {
    width: f64,
    alpha: f64,
    poly: CellPolygon,
    edge_len: [f64; EDGE_COUNT],
    cum_len: [f64; VERTEX_COUNT],
}

/// Shorthand for [`PolygonalChannel::new`].
#[inline]
pub fn build_channel(width: f64, alpha: f64) -> Result<PolygonalChannel, ReconError> {
    PolygonalChannel::new(width, alpha)
}

impl PolygonalChannel {
    /// Build the cell for channel width `width` and wedge angle `alpha`.
    ///
    /// Fails with `InvalidGeometry` unless `width > 0` and `0 < alpha < π`.
    pub fn new(width: f64, alpha: f64) -> Result<Self, ReconError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ReconError::InvalidGeometry(format!(
                "width must be finite and > 0, got {width}"
            )));
        }
        if !alpha.is_finite() || alpha <= 0.0 || alpha >= std::f64::consts::PI {
            return Err(ReconError::InvalidGeometry(format!(
                "wedge angle must lie in (0, pi), got {alpha}"
            )));
        }
        let dx = 0.5;
        let dy = dx / (alpha / 2.0).tan();
        let xs = [0.0, dx, 2.0 * dx, 2.0 * dx, dx, 0.0, 0.0];
        let ys = [0.0, dy, 0.0, width, width + dy, width, 0.0];
        let poly = CellPolygon {
            v: std::array::from_fn(|i| Vector2::new(xs[i], ys[i])),
        };
        let edge_len: [f64; EDGE_COUNT] = std::array::from_fn(|i| (poly.v[i + 1] - poly.v[i]).norm());
        let mut cum_len = [0.0; VERTEX_COUNT];
        for i in 1..VERTEX_COUNT {
            cum_len[i] = cum_len[i - 1] + edge_len[i - 1];
        }
        Ok(Self {
            width,
            alpha,
            poly,
            edge_len,
            cum_len,
        })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The canonical (un-reflected) cell.
    #[inline]
    pub fn polygon(&self) -> &CellPolygon {
        &self.poly
    }

    #[inline]
    pub fn vertex(&self, i: usize) -> Vector2<f64> {
        self.poly.v[i]
    }

    #[inline]
    pub fn edge_len(&self, e: EdgeId) -> f64 {
        self.edge_len[e.index()]
    }

    /// Arc length from vertex 0 to vertex `i` (`i` in `0..=6`).
    #[inline]
    pub fn cum_len(&self, i: usize) -> f64 {
        self.cum_len[i]
    }

    pub fn edge_lengths(&self) -> &[f64; EDGE_COUNT] {
        &self.edge_len
    }

    pub fn cumulative_lengths(&self) -> &[f64; VERTEX_COUNT] {
        &self.cum_len
    }

    #[inline]
    pub fn perimeter(&self) -> f64 {
        self.cum_len[EDGE_COUNT]
    }

    /// Canonical point at absolute arc length `s` (from vertex 0), interpolated
    /// along edge `e`. Values of `s` outside the edge's arc range extrapolate
    /// along the edge's line.
    pub fn point_on_edge_at_arc(&self, e: EdgeId, s: f64) -> Vector2<f64> {
        let (a, b) = self.poly.edge(e);
        let u = (s - self.cum_len[e.index()]) / self.edge_len[e.index()];
        a + (b - a) * u
    }

    /// Lower wall (vertices 0..=2) and upper wall (vertices 5, 4, 3) of every
    /// cell offset in `cells`, each as one left-to-right polyline.
    ///
    /// Shared endpoints between neighbouring cells appear once.
    pub fn tiled_walls(&self, cells: RangeInclusive<i64>) -> (Vec<Vector2<f64>>, Vec<Vector2<f64>>) {
        let mut lower = Vec::new();
        let mut upper = Vec::new();
        for (k, c) in cells.enumerate() {
            let shift = Vector2::new(c as f64, 0.0);
            let skip = usize::from(k > 0);
            lower.extend([0, 1, 2].iter().skip(skip).map(|&i| self.poly.v[i] + shift));
            upper.extend([5, 4, 3].iter().skip(skip).map(|&i| self.poly.v[i] + shift));
        }
        (lower, upper)
    }
}
