use nalgebra::Vector2;

use crate::channel::{CellPolygon, PolygonalChannel, Tolerances};
use crate::error::ReconError;
use crate::itinerary::EdgeId;

/// Intersection of the ray `y = h + x tan(theta)` with the line through `edge`.
///
/// Pre: the itinerary is geometrically valid, so the intersection exists.
/// A ray parallel to the edge (or a non-finite solution) is `DegenerateRay`.
pub fn intersect_ray_with_edge(
    poly: &CellPolygon,
    h: f64,
    theta: f64,
    edge: EdgeId,
    tol: Tolerances,
) -> Result<Vector2<f64>, ReconError> {
    let degenerate = || ReconError::DegenerateRay {
        h,
        theta,
        edge: edge.index(),
    };
    let (a, b) = poly.edge(edge);
    let slope_ray = theta.tan();
    let p = if tol.is_close(a.x, b.x) {
        let x = 0.5 * (a.x + b.x);
        Vector2::new(x, h + x * slope_ray)
    } else {
        let m = (b.y - a.y) / (b.x - a.x);
        if tol.is_close(m, slope_ray) {
            return Err(degenerate());
        }
        let x = (h - a.y + m * a.x) / (m - slope_ray);
        Vector2::new(x, h + x * slope_ray)
    };
    if p.x.is_finite() && p.y.is_finite() {
        Ok(p)
    } else {
        Err(degenerate())
    }
}

/// Map `point` (on `edge` of the unfolded `reflected` cell) to the canonical cell.
///
/// The fractional position along the reflected edge becomes an absolute arc
/// length, which is then looked up on the same edge of the canonical boundary.
pub fn map_point_to_cell(
    channel: &PolygonalChannel,
    reflected: &CellPolygon,
    point: Vector2<f64>,
    edge: EdgeId,
) -> Vector2<f64> {
    let (a, b) = reflected.edge(edge);
    let d = b - a;
    let t = (point - a).dot(&d) / d.norm_squared();
    let arc = channel.cum_len(edge.index()) + t * channel.edge_len(edge);
    channel.point_on_edge_at_arc(edge, arc)
}
